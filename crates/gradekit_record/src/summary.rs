//! In-memory summary table and remediation row formatting.

use tracing::{info, warn};

use crate::conf::{C_UNIT_CREDIT, N_ROW_NUMBER_MAX, N_SUMMARY_COLS};
use crate::spec::{EnumCellValue, EnumRecordError, SpecRiskReport};
use crate::util::format_credit;

/// Summary workbook content: header texts plus positional data rows.
///
/// Every row is exactly [`N_SUMMARY_COLS`] cells wide.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSummaryTable {
    header: Vec<String>,
    l_rows: Vec<Vec<EnumCellValue>>,
}

impl SpecSummaryTable {
    /// Build from existing content, fitting every row to the summary width.
    pub fn new(header: Vec<String>, rows: Vec<Vec<EnumCellValue>>) -> Self {
        let l_rows = rows
            .into_iter()
            .enumerate()
            .map(|(n_idx, mut row)| {
                if row.len() != N_SUMMARY_COLS {
                    if row[N_SUMMARY_COLS.min(row.len())..]
                        .iter()
                        .any(|cell| !cell.is_empty())
                    {
                        warn!(
                            row = n_idx,
                            n_cols = row.len(),
                            "summary row has extra non-empty columns, dropped"
                        );
                    }
                    row.resize(N_SUMMARY_COLS, EnumCellValue::Empty);
                }
                row
            })
            .collect();

        Self {
            header: fit_header(header),
            l_rows,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<EnumCellValue>] {
        &self.l_rows
    }

    pub fn height(&self) -> usize {
        self.l_rows.len()
    }

    /// Max numeric value of column 0 plus one; 1 for a table without numbered rows.
    ///
    /// Fails when the next number would exceed [`N_ROW_NUMBER_MAX`].
    pub fn next_row_number(&self) -> Result<u64, EnumRecordError> {
        let n_max = self
            .l_rows
            .iter()
            .filter_map(|row| row[0].to_f64())
            .filter(|n| *n >= 0.0)
            .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |m| m.max(n))));
        let Some(n_max) = n_max else {
            return Ok(1);
        };
        if n_max >= N_ROW_NUMBER_MAX as f64 {
            return Err(EnumRecordError::RowNumberOverflow {
                value: n_max,
                max: N_ROW_NUMBER_MAX,
            });
        }
        Ok(n_max.floor() as u64 + 1)
    }

    /// Append one row for a flagged student; returns its row number.
    pub fn append_report(
        &mut self,
        report: &SpecRiskReport<'_>,
    ) -> Result<Option<u64>, EnumRecordError> {
        if !report.is_flagged() {
            return Ok(None);
        }

        let n_row = self.next_row_number()?;
        self.l_rows.push(derive_summary_row(report, n_row));
        info!(
            row_number = n_row,
            student_id = report.student().student_id(),
            n_failed = report.failed_courses().len(),
            "appended summary row"
        );
        Ok(Some(n_row))
    }
}

fn fit_header(mut header: Vec<String>) -> Vec<String> {
    header.truncate(N_SUMMARY_COLS);
    header.resize(N_SUMMARY_COLS, String::new());
    header
}

/// Format one summary row (columns 0..=8) for `report`.
pub fn derive_summary_row(report: &SpecRiskReport<'_>, n_row: u64) -> Vec<EnumCellValue> {
    let student = report.student();

    let c_failed = report
        .failed_courses()
        .iter()
        .map(|c| format!("《{}》{}{C_UNIT_CREDIT}", c.name, format_credit(c.credit)))
        .collect::<Vec<_>>()
        .join("\n");
    let c_failed_credit = format!(
        "{}{C_UNIT_CREDIT}",
        format_credit(report.failed_credit_total())
    );
    let c_unprofessional = report
        .unprofessional_courses()
        .iter()
        .map(|c| format!("{} {}", c.name, c.score))
        .collect::<Vec<_>>()
        .join("\n");
    let c_relearn = report
        .need_relearn_courses()
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        EnumCellValue::Number(n_row as f64),
        EnumCellValue::Number(student.student_id() as f64),
        EnumCellValue::from(student.name()),
        EnumCellValue::from(student.major()),
        EnumCellValue::Number(student.enroll_year() as f64),
        EnumCellValue::from(c_failed),
        EnumCellValue::from(c_failed_credit),
        EnumCellValue::from(c_unprofessional),
        EnumCellValue::from(c_relearn),
    ]
}
