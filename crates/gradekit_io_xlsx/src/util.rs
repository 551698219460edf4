//! Stateless helper utilities used by the workbook reader and writer.

use std::collections::BTreeSet;

use crate::conf::{C_HEADER_UNNAMED_PREFIX, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{EnumXlsxIoError, SpecAutofitCellsPolicy};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Derive unique DataFrame column names from header texts.
///
/// Blank cells become `Unnamed: {idx}`; repeats get `.1`, `.2`, ... suffixes.
pub fn derive_header_names(header: &[String]) -> Vec<String> {
    let mut set_names_seen = BTreeSet::new();
    let mut l_names = Vec::with_capacity(header.len());

    for (n_idx, c_text) in header.iter().enumerate() {
        let c_base = if c_text.trim().is_empty() {
            format!("{C_HEADER_UNNAMED_PREFIX}{n_idx}")
        } else {
            c_text.clone()
        };

        let mut c_name = c_base.clone();
        let mut n_dup = 1usize;
        while set_names_seen.contains(&c_name) {
            c_name = format!("{c_base}.{n_dup}");
            n_dup += 1;
        }
        set_names_seen.insert(c_name.clone());
        l_names.push(c_name);
    }

    l_names
}

/// Map `Unnamed: {idx}` placeholders back to blank header text.
pub fn derive_header_text(name: &str) -> String {
    match name.strip_prefix(C_HEADER_UNNAMED_PREFIX) {
        Some(c_idx) if c_idx.parse::<usize>().is_ok() => String::new(),
        _ => name.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnWidth

/// Display width of the widest line; non-ASCII chars count as 1.6 units.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    s.lines()
        .map(|line| {
            let n_ascii = line.chars().filter(|chr| chr.is_ascii()).count();
            let n_non_ascii = line.chars().count().saturating_sub(n_ascii);
            n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
        })
        .max()
        .unwrap_or(0)
}

/// Final column width from recorded header/body widths and the policy.
pub fn calculate_column_width(
    width_header: usize,
    width_body: usize,
    policy: &SpecAutofitCellsPolicy,
) -> Option<usize> {
    if !policy.if_enabled {
        return None;
    }
    let n_width_recorded = usize::max(width_header, width_body);

    let n_min = usize::max(1, policy.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy.width_cell_max));
    Some(usize::min(
        n_max,
        usize::max(n_min, n_width_recorded + policy.width_cell_padding),
    ))
}

pub fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), EnumXlsxIoError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(EnumXlsxIoError::Invalid(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(EnumXlsxIoError::Invalid(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

pub fn cast_row_num(value: usize) -> Result<u32, EnumXlsxIoError> {
    u32::try_from(value).map_err(|_| EnumXlsxIoError::Invalid(format!("row index overflow: {value}")))
}

pub fn cast_col_num(value: usize) -> Result<u16, EnumXlsxIoError> {
    u16::try_from(value)
        .map_err(|_| EnumXlsxIoError::Invalid(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn test_derive_header_names_fills_blanks_and_dedups() {
        let l_header = vec![
            "序号".to_string(),
            "".to_string(),
            "姓名".to_string(),
            "姓名".to_string(),
            "姓名".to_string(),
        ];
        assert_eq!(
            derive_header_names(&l_header),
            vec!["序号", "Unnamed: 1", "姓名", "姓名.1", "姓名.2"]
        );
        assert_eq!(derive_header_text("Unnamed: 1"), "");
        assert_eq!(derive_header_text("Unnamed: x"), "Unnamed: x");
        assert_eq!(derive_header_text("姓名.1"), "姓名.1");
    }

    #[test]
    fn test_estimate_width_uses_widest_line() {
        assert_eq!(estimate_unicode_string_width("abc"), 3);
        assert_eq!(estimate_unicode_string_width("ab\nabcdef"), 6);
        assert_eq!(estimate_unicode_string_width("数据结构"), 6);
        assert_eq!(estimate_unicode_string_width(""), 0);
    }

    #[test]
    fn test_calculate_column_width_clamps() {
        let policy = SpecAutofitCellsPolicy::default();
        assert_eq!(calculate_column_width(0, 0, &policy), Some(8));
        assert_eq!(calculate_column_width(10, 20, &policy), Some(22));
        assert_eq!(calculate_column_width(10, 200, &policy), Some(60));

        let policy_off = SpecAutofitCellsPolicy {
            if_enabled: false,
            ..Default::default()
        };
        assert_eq!(calculate_column_width(10, 20, &policy_off), None);
    }
}
