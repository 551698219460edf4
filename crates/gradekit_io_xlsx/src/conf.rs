//! Workbook constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecSummaryFormats};

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Worksheet rows consumed as header when reading.
pub const N_ROWS_HEADER: usize = 1;
/// Prefix for names of blank header cells (`Unnamed: 3`).
pub const C_HEADER_UNNAMED_PREFIX: &str = "Unnamed: ";
pub const C_FONT_NAME_SUMMARY: &str = "宋体";
pub const N_FONT_SIZE_SUMMARY: f64 = 11.0;

/// Default summary look: 宋体 11pt, wrapped text, centered integers.
pub fn derive_default_summary_formats() -> SpecSummaryFormats {
    let fmt_base = SpecCellFormat::new(C_FONT_NAME_SUMMARY, N_FONT_SIZE_SUMMARY);
    SpecSummaryFormats {
        text: fmt_base.clone().wrapped(),
        integer: fmt_base.clone().centered().with_num_format("0"),
        decimal: fmt_base.clone().with_num_format("0.0"),
        header: fmt_base.bold().centered(),
    }
}
