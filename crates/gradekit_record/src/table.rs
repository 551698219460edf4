//! Read-only positional cell grid and row windows over it.

use crate::spec::EnumCellValue;

static CELL_EMPTY: EnumCellValue = EnumCellValue::Empty;

/// Dense row-major cell grid.
///
/// Reads outside the grid return [`EnumCellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRawTable {
    n_rows: usize,
    n_cols: usize,
    l_cells: Vec<EnumCellValue>,
}

impl SpecRawTable {
    /// Build from ragged rows; short rows are padded with empty cells.
    pub fn from_rows(rows: Vec<Vec<EnumCellValue>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut l_cells = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            let n_len_row = row.len();
            l_cells.extend(row.into_iter().map(EnumCellValue::normalized));
            l_cells.extend(std::iter::repeat_n(EnumCellValue::Empty, n_cols - n_len_row));
        }

        Self {
            n_rows,
            n_cols,
            l_cells,
        }
    }

    pub fn height(&self) -> usize {
        self.n_rows
    }

    pub fn width(&self) -> usize {
        self.n_cols
    }

    pub fn cell(&self, row: usize, col: usize) -> &EnumCellValue {
        if row >= self.n_rows || col >= self.n_cols {
            return &CELL_EMPTY;
        }
        &self.l_cells[row * self.n_cols + col]
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_empty()
    }

    /// Window over rows `[row_start, row_end)`, clamped to the grid.
    pub fn view_rows(&self, row_start: usize, row_end: usize) -> SpecTableView<'_> {
        let n_row_end = usize::min(row_end, self.n_rows);
        SpecTableView {
            table: self,
            row_start: usize::min(row_start, n_row_end),
            row_end: n_row_end,
        }
    }

    /// Window over the whole grid.
    pub fn view(&self) -> SpecTableView<'_> {
        self.view_rows(0, self.n_rows)
    }
}

/// Borrowed row window with window-relative addressing.
#[derive(Debug, Clone, Copy)]
pub struct SpecTableView<'a> {
    table: &'a SpecRawTable,
    row_start: usize,
    row_end: usize,
}

impl<'a> SpecTableView<'a> {
    pub fn height(&self) -> usize {
        self.row_end - self.row_start
    }

    /// Absolute row of the window's first row.
    pub fn row_start(&self) -> usize {
        self.row_start
    }

    pub fn cell(&self, row: usize, col: usize) -> &'a EnumCellValue {
        if row >= self.height() {
            return &CELL_EMPTY;
        }
        self.table.cell(self.row_start + row, col)
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_empty()
    }

    /// Sub-window over window-relative rows `[row_start, row_end)`, clamped.
    pub fn slice_rows(&self, row_start: usize, row_end: usize) -> SpecTableView<'a> {
        let n_row_end = self.row_start + usize::min(row_end, self.height());
        SpecTableView {
            table: self.table,
            row_start: usize::min(self.row_start + row_start, n_row_end),
            row_end: n_row_end,
        }
    }
}
