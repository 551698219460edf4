//! Workbook I/O specification models, options and errors.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Horizontal placement of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCellAlign {
    #[default]
    Left,
    Center,
}

/// Look of one class of summary cells. Every cell is bordered thin and
/// vertically centered.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecCellFormat {
    pub font_name: String,
    /// Points.
    pub font_size: f64,
    pub bold: bool,
    pub align: EnumCellAlign,
    pub text_wrap: bool,
    /// Excel number format code, e.g. `0.0`.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    pub fn new(font_name: impl Into<String>, font_size: f64) -> Self {
        Self {
            font_name: font_name.into(),
            font_size,
            bold: false,
            align: EnumCellAlign::Left,
            text_wrap: false,
            num_format: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = EnumCellAlign::Center;
        self
    }

    pub fn wrapped(mut self) -> Self {
        self.text_wrap = true;
        self
    }

    pub fn with_num_format(mut self, num_format: impl Into<String>) -> Self {
        self.num_format = Some(num_format.into());
        self
    }
}

/// One format per summary cell class.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSummaryFormats {
    /// Columns holding any text.
    pub text: SpecCellFormat,
    /// Numeric columns with integral values only (row number, id, year).
    pub integer: SpecCellFormat,
    pub decimal: SpecCellFormat,
    pub header: SpecCellFormat,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Column width fitting for the summary sheet.
///
/// Width is the widest header or body line plus `width_cell_padding`,
/// clamped to `[width_cell_min, width_cell_max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// When false, column widths are left at the Excel default.
    pub if_enabled: bool,
    pub width_cell_min: usize,
    pub width_cell_max: usize,
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            if_enabled: true,
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Options for persisting the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSummaryWriteOptions {
    /// Worksheet name, sanitized before use.
    pub sheet_name: String,
    pub if_freeze_header: bool,
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecSummaryWriteOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            if_freeze_header: true,
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Workbook read/write failures.
#[derive(Debug, Error)]
pub enum EnumXlsxIoError {
    /// Workbook could not be opened or a worksheet could not be read.
    #[error("failed to read workbook {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    /// Workbook holds no worksheet.
    #[error("workbook {} has no worksheet", path.display())]
    NoWorksheet { path: PathBuf },
    /// DataFrame assembly or access failed.
    #[error("summary DataFrame error: {0}")]
    Frame(#[from] PolarsError),
    /// Workbook serialization failed.
    #[error("xlsx write error: {0}")]
    Write(#[from] XlsxError),
    /// Invalid writer state, option or index.
    #[error("{0}")]
    Invalid(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
