//! Stateless helpers for cell text, scores and fixed-width dates.

use chrono::NaiveDate;

////////////////////////////////////////////////////////////////////////////////
// #region NumberText

/// Render a number the way a spreadsheet cell shows it (`201909.0` -> `201909`).
pub fn format_number_text(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        return format!("{}", x as i64);
    }
    x.to_string()
}

/// Render a credit value, always with a fractional part (`3` -> `3.0`).
pub fn format_credit(x: f64) -> String {
    format!("{x:?}")
}

/// Check that `s` is non-empty and made of ASCII digits only.
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ScoreText

/// Remove the first occurrence of `marker`, wherever it is.
pub fn strip_retake_marker(score: &str, marker: char) -> String {
    score.replacen(marker, "", 1)
}

/// Numeric score after marker stripping; `None` for placeholders.
///
/// Digit strings beyond `u32` are `None` as well: they cannot be below any threshold.
pub fn parse_score(score: &str, marker: char) -> Option<u32> {
    let c_score = strip_retake_marker(score, marker);
    if !is_all_digits(&c_score) {
        return None;
    }
    c_score.parse::<u32>().ok()
}

/// Numeric score without marker stripping, used by the diagnostic pass.
pub fn parse_score_unmarked(score: &str) -> Option<u32> {
    if !is_all_digits(score) {
        return None;
    }
    score.parse::<u32>().ok()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FixedWidthDates

fn split_fixed_digits(text: &str, width: usize) -> Option<&str> {
    let c_text = text.trim();
    if c_text.len() != width || !is_all_digits(c_text) {
        return None;
    }
    Some(c_text)
}

/// Parse `YYYYMM` into the first day of that month.
pub fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let c_text = split_fixed_digits(text, 6)?;
    let n_year = c_text[0..4].parse::<i32>().ok()?;
    let n_month = c_text[4..6].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(n_year, n_month, 1)
}

/// Parse `YYYYMMDD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let c_text = split_fixed_digits(text, 8)?;
    let n_year = c_text[0..4].parse::<i32>().ok()?;
    let n_month = c_text[4..6].parse::<u32>().ok()?;
    let n_day = c_text[6..8].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(n_year, n_month, n_day)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
