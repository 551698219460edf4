//! Workbook reader: first worksheet into the positional grid model.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use gradekit_record::{EnumCellValue, SpecRawTable, SpecSummaryTable};
use tracing::info;

use crate::spec::EnumXlsxIoError;

/// Convert one calamine cell into the grid cell model.
pub fn derive_cell_value_from_data(value: &Data) -> EnumCellValue {
    match value {
        Data::Empty => EnumCellValue::Empty,
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::String(val) => EnumCellValue::from(val.as_str()),
        Data::Bool(val) => EnumCellValue::Text(if *val { "True" } else { "False" }.to_string()),
        Data::DateTime(val) => EnumCellValue::Number(val.as_f64()),
        Data::DateTimeIso(val) => EnumCellValue::from(val.as_str()),
        Data::DurationIso(val) => EnumCellValue::from(val.as_str()),
        Data::Error(_) => EnumCellValue::Empty,
    }
}

/// Rows of `range` in absolute worksheet coordinates.
///
/// calamine ranges start at the first used cell; leading rows/columns are
/// restored as empty cells so layout offsets stay absolute.
fn derive_absolute_rows(range: &Range<Data>) -> Vec<Vec<EnumCellValue>> {
    let Some((n_row_start, n_col_start)) = range.start() else {
        return vec![];
    };
    let (n_height, n_width) = range.get_size();
    let n_row_start = n_row_start as usize;
    let n_col_start = n_col_start as usize;

    let mut l_rows = vec![vec![EnumCellValue::Empty; n_col_start + n_width]; n_row_start + n_height];
    for (n_row, n_col, value) in range.used_cells() {
        l_rows[n_row_start + n_row][n_col_start + n_col] = derive_cell_value_from_data(value);
    }
    l_rows
}

/// Read every row of the first worksheet, header rows included.
pub fn read_sheet_rows(path: &Path) -> Result<Vec<Vec<EnumCellValue>>, EnumXlsxIoError> {
    let err_read = |source| EnumXlsxIoError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(err_read)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EnumXlsxIoError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(err_read)?;

    Ok(derive_absolute_rows(&range))
}

/// Read the grade-card grid, dropping the first `n_rows_header` worksheet rows.
pub fn read_raw_table(path: &Path, n_rows_header: usize) -> Result<SpecRawTable, EnumXlsxIoError> {
    let l_rows: Vec<_> = read_sheet_rows(path)?
        .into_iter()
        .skip(n_rows_header)
        .collect();
    let table = SpecRawTable::from_rows(l_rows);
    info!(
        path = %path.display(),
        n_rows = table.height(),
        n_cols = table.width(),
        "read grade-card sheet"
    );
    Ok(table)
}

/// Read the summary workbook: first row as header, the rest as data rows.
pub fn read_summary_table(path: &Path) -> Result<SpecSummaryTable, EnumXlsxIoError> {
    let mut l_rows = read_sheet_rows(path)?.into_iter();
    let l_header = l_rows
        .next()
        .map(|row| row.iter().map(EnumCellValue::to_text).collect())
        .unwrap_or_default();
    let table = SpecSummaryTable::new(l_header, l_rows.collect());
    info!(path = %path.display(), n_rows = table.height(), "read summary sheet");
    Ok(table)
}
