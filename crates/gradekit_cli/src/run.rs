//! One end-to-end run: load, diagnose/classify, append, persist.

use std::io::Write;

use anyhow::{Context, Result};
use gradekit_io_xlsx::{N_ROWS_HEADER, SummaryXlsxWriter, read_raw_table, read_summary_table};
use gradekit_record::{RiskClassifier, load_students};
use tracing::info;

use crate::settings::SpecRunConfig;

/// Counters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecRunReport {
    /// Students extracted from the grade card.
    pub cnt_students: usize,
    /// Diagnostic lines printed.
    pub cnt_diagnostics: usize,
    /// Summary rows appended.
    pub cnt_rows_appended: usize,
}

/// Run the whole pipeline, printing diagnostic lines to `out`.
///
/// The summary workbook is written once, after every student is processed.
pub fn run(cfg: &SpecRunConfig, out: &mut impl Write) -> Result<SpecRunReport> {
    let table = read_raw_table(&cfg.path_data_sheet, N_ROWS_HEADER)
        .with_context(|| format!("reading grade card {}", cfg.path_data_sheet.display()))?;
    let l_students = load_students(&table, &cfg.page_layout())
        .with_context(|| format!("extracting students from {}", cfg.path_data_sheet.display()))?;
    let mut summary = read_summary_table(&cfg.path_summary_sheet)
        .with_context(|| format!("reading summary {}", cfg.path_summary_sheet.display()))?;

    let classifier = RiskClassifier::new(cfg.classifier_options());
    let mut report_run = SpecRunReport {
        cnt_students: l_students.len(),
        ..Default::default()
    };

    for student in &l_students {
        for course in classifier.diagnose(student) {
            writeln!(out, "{student} {course}")?;
            report_run.cnt_diagnostics += 1;
        }

        let report = classifier.classify(student);
        let n_row = summary
            .append_report(&report)
            .with_context(|| format!("appending summary row for {student}"))?;
        if n_row.is_some() {
            report_run.cnt_rows_appended += 1;
        }
    }

    let mut writer =
        SummaryXlsxWriter::new(cfg.path_summary_sheet.clone(), cfg.summary_write_options());
    writer
        .write_summary(&summary)
        .and_then(|()| writer.close())
        .with_context(|| format!("writing summary {}", writer.file_out()))?;

    info!(
        cnt_students = report_run.cnt_students,
        cnt_diagnostics = report_run.cnt_diagnostics,
        cnt_rows_appended = report_run.cnt_rows_appended,
        "run finished"
    );
    Ok(report_run)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use gradekit_record::{EnumCellValue, N_ROWS_PAGE};
    use rust_xlsxwriter::{Workbook, Worksheet};

    use super::*;

    fn write_student_page(
        worksheet: &mut Worksheet,
        row_base: u32,
        student_id: f64,
        name: &str,
        courses: &[(&str, &str)],
    ) {
        worksheet.write_string(row_base, 1, "计算机学院").expect("write");
        worksheet.write_string(row_base, 5, "计算机科学与技术").expect("write");
        worksheet.write_string(row_base, 10, "计科2211").expect("write");
        worksheet.write_string(row_base + 1, 1, name).expect("write");
        worksheet.write_number(row_base + 1, 5, student_id).expect("write");
        worksheet.write_string(row_base + 1, 10, "汉族").expect("write");
        worksheet.write_string(row_base + 2, 1, "202209").expect("write");
        worksheet.write_string(row_base + 2, 5, "202607").expect("write");
        worksheet.write_number(row_base + 2, 10, 4.0).expect("write");
        worksheet.write_string(row_base + 3, 1, "20040315").expect("write");
        worksheet.write_string(row_base + 3, 5, "110101200403150011").expect("write");
        worksheet.write_string(row_base + 3, 10, "共青团员").expect("write");
        worksheet.write_number(row_base + 4, 1, 150.0).expect("write");
        worksheet.write_number(row_base + 4, 3, 100.0).expect("write");
        worksheet.write_number(row_base + 4, 7, 10.0).expect("write");
        worksheet.write_number(row_base + 4, 10, 40.0).expect("write");

        for (n_idx, (course_name, score)) in courses.iter().enumerate() {
            let n_row = row_base + 6 + n_idx as u32;
            worksheet.write_string(n_row, 0, "2022-2023-1").expect("write");
            worksheet.write_string(n_row, 1, *course_name).expect("write");
            worksheet.write_string(n_row, 3, "必修").expect("write");
            worksheet.write_number(n_row, 4, 1.0).expect("write");
            worksheet.write_number(n_row, 5, 4.0).expect("write");
            worksheet.write_string(n_row, 6, *score).expect("write");
        }
    }

    fn write_grade_card(path: &Path) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "学生成绩卡").expect("write");
        write_student_page(
            worksheet,
            1,
            1001.0,
            "Li Wei",
            &[("数据结构", "69"), ("大学英语", "75*"), ("体育", "优")],
        );
        write_student_page(
            worksheet,
            1 + N_ROWS_PAGE as u32,
            1002.0,
            "Zhang San",
            &[("离散数学", "90")],
        );
        workbook.save(path).expect("save grade card");
    }

    fn write_summary(path: &Path) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let l_header = ["序号", "学号", "姓名", "专业", "年级", "不及格课程", "学分", "专业课", "重修"];
        for (n_col, c_text) in l_header.iter().enumerate() {
            worksheet.write_string(0, n_col as u16, *c_text).expect("write");
        }
        worksheet.write_number(1, 0, 3.0).expect("write");
        worksheet.write_number(1, 1, 999.0).expect("write");
        worksheet.write_string(1, 2, "Old Entry").expect("write");
        workbook.save(path).expect("save summary");
    }

    #[test]
    fn test_run_end_to_end() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cfg = SpecRunConfig {
            path_data_sheet: tmp.path().join("card.xlsx"),
            path_summary_sheet: tmp.path().join("summary.xlsx"),
            ..Default::default()
        };
        write_grade_card(&cfg.path_data_sheet);
        write_summary(&cfg.path_summary_sheet);

        let mut v_out = Vec::new();
        let report = run(&cfg, &mut v_out).expect("run");
        assert_eq!(report.cnt_students, 2);
        assert_eq!(report.cnt_diagnostics, 2);
        assert_eq!(report.cnt_rows_appended, 1);

        let c_out = String::from_utf8(v_out).expect("utf8");
        assert_eq!(
            c_out,
            "<Student Li Wei 1001> <Course 数据结构 69>\n\
             <Student Li Wei 1001> <Course 大学英语 75*>\n"
        );

        let summary = read_summary_table(&cfg.path_summary_sheet).expect("summary");
        assert_eq!(summary.header()[0], "序号");
        assert_eq!(summary.height(), 2);
        assert_eq!(summary.rows()[0][2].to_text(), "Old Entry");

        let row = &summary.rows()[1];
        assert_eq!(row[0], EnumCellValue::Number(4.0));
        assert_eq!(row[1], EnumCellValue::Number(1001.0));
        assert_eq!(row[4], EnumCellValue::Number(2022.0));
        assert_eq!(row[5].to_text(), "《数据结构》4.0学分");
        assert_eq!(row[6].to_text(), "4.0学分");
        assert_eq!(row[7].to_text(), "数据结构 69");
        assert_eq!(row[8].to_text(), "数据结构");
    }

    #[test]
    fn test_malformed_card_leaves_summary_untouched() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cfg = SpecRunConfig {
            path_data_sheet: tmp.path().join("card.xlsx"),
            path_summary_sheet: tmp.path().join("summary.xlsx"),
            ..Default::default()
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        write_student_page(worksheet, 1, 1001.0, "Li Wei", &[("数据结构", "50")]);
        worksheet.write_string(3, 1, "2022-09").expect("write");
        workbook.save(&cfg.path_data_sheet).expect("save");
        write_summary(&cfg.path_summary_sheet);
        let v_before = std::fs::read(&cfg.path_summary_sheet).expect("read");

        let err = run(&cfg, &mut Vec::new()).expect_err("must fail");
        assert!(format!("{err:#}").contains("enroll_time"));
        assert_eq!(std::fs::read(&cfg.path_summary_sheet).expect("read"), v_before);
    }
}
