//! `gradekit_io_xlsx` v1:
//! Workbook boundary for the grade-card kernel.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : formats/options/errors
//! - `util`   : pure helper functions
//! - `reader` : calamine-backed grid reader
//! - `writer` : DataFrame-backed summary writer
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{N_ROWS_HEADER, derive_default_summary_formats};
pub use reader::{read_raw_table, read_sheet_rows, read_summary_table};
pub use spec::{
    EnumCellAlign, EnumXlsxIoError, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecSummaryFormats, SpecSummaryWriteOptions,
};
pub use writer::{SummaryXlsxWriter, derive_dataframe_from_summary};
