//! Summary workbook writer: summary table -> DataFrame -> xlsx.

use std::path::PathBuf;

use gradekit_record::{EnumCellValue, SpecSummaryTable};
use polars::prelude::{AnyValue, Column, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

use crate::conf::derive_default_summary_formats;
use crate::spec::{
    EnumCellAlign, EnumXlsxIoError, SpecCellFormat, SpecSummaryFormats, SpecSummaryWriteOptions,
};
use crate::util::{
    calculate_column_width, cast_col_num, cast_row_num, derive_header_names, derive_header_text,
    estimate_unicode_string_width, sanitize_sheet_name, validate_policy_autofit,
};

/// Value kind of one summary column after type inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumColumnKind {
    Text,
    Integer,
    Decimal,
}

/// Stateful summary workbook writer.
///
/// The workbook is buffered in memory until [`Self::close`] is called, so a
/// failed run leaves the file on disk untouched.
pub struct SummaryXlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats: SpecSummaryFormats,
    write_options: SpecSummaryWriteOptions,
    if_closed: bool,
}

impl SummaryXlsxWriter {
    /// Create writer with default formats.
    pub fn new(path_file_out: PathBuf, write_options: SpecSummaryWriteOptions) -> Self {
        Self::with_formats(path_file_out, derive_default_summary_formats(), write_options)
    }

    pub fn with_formats(
        path_file_out: PathBuf,
        formats: SpecSummaryFormats,
        write_options: SpecSummaryWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formats,
            write_options,
            if_closed: false,
        }
    }

    /// Destination path, lossily rendered.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Save the buffered workbook; later calls are no-ops.
    pub fn close(&mut self) -> Result<(), EnumXlsxIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        info!(path = %self.path_file_out.display(), "saved summary workbook");
        Ok(())
    }

    /// Write the summary table as one sheet.
    ///
    /// Row 0 carries the table's header texts verbatim, repeats included; the
    /// unique DataFrame column names never reach the sheet.
    pub fn write_summary(&mut self, table: &SpecSummaryTable) -> Result<(), EnumXlsxIoError> {
        let df = derive_dataframe_from_summary(table)?;
        self.write_sheet(&df, table.header())
    }

    /// Write one sheet from an in-memory dataframe; column names form the header row.
    pub fn write_sheet_from_dataframe(&mut self, df: &DataFrame) -> Result<(), EnumXlsxIoError> {
        let l_header: Vec<String> = df
            .get_column_names_str()
            .into_iter()
            .map(derive_header_text)
            .collect();
        self.write_sheet(df, &l_header)
    }

    fn write_sheet(&mut self, df: &DataFrame, header: &[String]) -> Result<(), EnumXlsxIoError> {
        if header.len() != df.width() {
            return Err(EnumXlsxIoError::Invalid(format!(
                "header has {} cells, frame has {} columns.",
                header.len(),
                df.width()
            )));
        }
        if self.if_closed {
            return Err(EnumXlsxIoError::Invalid(
                "Cannot write after close().".to_string(),
            ));
        }
        validate_policy_autofit(&self.write_options.policy_autofit)?;

        let l_kinds: Vec<EnumColumnKind> = df
            .get_columns()
            .iter()
            .map(derive_column_kind)
            .collect::<Result<_, _>>()?;

        let fmt_header = derive_rust_xlsx_format(&self.formats.header);
        let l_fmt_by_col: Vec<Format> = l_kinds
            .iter()
            .map(|kind| {
                derive_rust_xlsx_format(match kind {
                    EnumColumnKind::Text => &self.formats.text,
                    EnumColumnKind::Integer => &self.formats.integer,
                    EnumColumnKind::Decimal => &self.formats.decimal,
                })
            })
            .collect();

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(sanitize_sheet_name(&self.write_options.sheet_name, "_"))?;

        let mut l_width_header = vec![0usize; header.len()];
        let mut l_width_body = vec![0usize; header.len()];

        for (n_idx_col, c_text) in header.iter().enumerate() {
            l_width_header[n_idx_col] = estimate_unicode_string_width(c_text);
            write_cell_with_format(
                worksheet,
                0,
                n_idx_col,
                &EnumCellValue::from(c_text.as_str()),
                &fmt_header,
            )?;
        }

        for (n_idx_col, col) in df.get_columns().iter().enumerate() {
            for n_row in 0..df.height() {
                let value = derive_cell_value_from_any_value(col.get(n_row)?);
                l_width_body[n_idx_col] = usize::max(
                    l_width_body[n_idx_col],
                    estimate_width_len(&value, l_kinds[n_idx_col]),
                );
                write_cell_with_format(
                    worksheet,
                    1 + n_row,
                    n_idx_col,
                    &value,
                    &l_fmt_by_col[n_idx_col],
                )?;
            }
        }

        if self.write_options.if_freeze_header {
            worksheet.set_freeze_panes(1, 0)?;
        }

        for n_idx_col in 0..header.len() {
            if let Some(n_width) = calculate_column_width(
                l_width_header[n_idx_col],
                l_width_body[n_idx_col],
                &self.write_options.policy_autofit,
            ) {
                worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width as f64)?;
            }
        }

        info!(
            n_rows = df.height(),
            n_cols = df.width(),
            "wrote summary sheet"
        );
        Ok(())
    }
}

/// Build a DataFrame from the summary table.
///
/// Columns holding only numbers (or blanks) become `Float64`; any text makes the
/// whole column `String`, with numbers rendered as text.
pub fn derive_dataframe_from_summary(table: &SpecSummaryTable) -> Result<DataFrame, EnumXlsxIoError> {
    let l_names = derive_header_names(table.header());
    let mut l_columns = Vec::with_capacity(l_names.len());

    for (n_idx_col, c_name) in l_names.into_iter().enumerate() {
        let l_cells: Vec<&EnumCellValue> = table.rows().iter().map(|row| &row[n_idx_col]).collect();
        let if_is_numeric = l_cells
            .iter()
            .all(|cell| matches!(cell, EnumCellValue::Number(_) | EnumCellValue::Empty));

        let column = if if_is_numeric {
            let l_values: Vec<Option<f64>> = l_cells.iter().map(|cell| cell.to_f64()).collect();
            Column::new(c_name.into(), l_values)
        } else {
            let l_values: Vec<Option<String>> = l_cells
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_text()))
                .collect();
            Column::new(c_name.into(), l_values)
        };
        l_columns.push(column);
    }

    Ok(DataFrame::new(l_columns)?)
}

fn derive_column_kind(col: &Column) -> Result<EnumColumnKind, EnumXlsxIoError> {
    if !col.dtype().is_numeric() {
        return Ok(EnumColumnKind::Text);
    }
    for n_row in 0..col.len() {
        if let Some(n_value) = derive_f64_from_any_value(col.get(n_row)?)
            && n_value.fract() != 0.0
        {
            return Ok(EnumColumnKind::Decimal);
        }
    }
    Ok(EnumColumnKind::Integer)
}

/// Summary frames only carry `Float64` numerics.
fn derive_f64_from_any_value(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Float64(val) if val.is_finite() => Some(val),
        _ => None,
    }
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::Empty,
        AnyValue::String(val) => EnumCellValue::from(val),
        AnyValue::StringOwned(val) => EnumCellValue::from(val.to_string()),
        other => match derive_f64_from_any_value(other.clone()) {
            Some(val) => EnumCellValue::Number(val),
            None => EnumCellValue::from(other.to_string()),
        },
    }
}

/// Estimate displayed width units for one cell value.
fn estimate_width_len(value: &EnumCellValue, kind: EnumColumnKind) -> usize {
    match (value, kind) {
        (EnumCellValue::Empty, _) => 0,
        (EnumCellValue::Number(n), EnumColumnKind::Integer) => (*n as i64).to_string().len(),
        (EnumCellValue::Number(n), _) => format!("{n:.1}").len(),
        (EnumCellValue::Text(s), _) => estimate_unicode_string_width(s),
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), EnumXlsxIoError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::Empty => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::Text(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(fmt_cell: &SpecCellFormat) -> Format {
    let mut format = Format::new()
        .set_font_name(fmt_cell.font_name.as_str())
        .set_font_size(fmt_cell.font_size)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::VerticalCenter)
        .set_align(match fmt_cell.align {
            EnumCellAlign::Left => FormatAlign::Left,
            EnumCellAlign::Center => FormatAlign::Center,
        });
    if fmt_cell.bold {
        format = format.set_bold();
    }
    if fmt_cell.text_wrap {
        format = format.set_text_wrap();
    }
    if let Some(c_num_format) = &fmt_cell.num_format {
        format = format.set_num_format(c_num_format.as_str());
    }
    format
}
