//! Run configuration: optional `gradekit.toml`, then `GRADEKIT_*` environment.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use gradekit_io_xlsx::SpecSummaryWriteOptions;
use gradekit_record::{
    N_ROWS_PAGE, SpecClassifierOptions, SpecPageLayout, TUP_PROFESSIONAL_COURSES,
};
use serde::Deserialize;

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpecRunConfig {
    /// Grade-card workbook to read.
    pub path_data_sheet: PathBuf,
    /// Summary workbook, read then overwritten.
    pub path_summary_sheet: PathBuf,
    /// Worksheet name used when writing the summary.
    pub sheet_name_summary: String,
    /// Exact names of professional courses.
    pub professional_courses: Vec<String>,
    /// Rows per student page, separator included.
    pub n_rows_page: usize,
}

impl Default for SpecRunConfig {
    fn default() -> Self {
        Self {
            path_data_sheet: PathBuf::from("计科2211学生成绩卡.xls"),
            path_summary_sheet: PathBuf::from("工作簿1.xlsx"),
            sheet_name_summary: "Sheet1".to_string(),
            professional_courses: TUP_PROFESSIONAL_COURSES
                .iter()
                .map(ToString::to_string)
                .collect(),
            n_rows_page: N_ROWS_PAGE,
        }
    }
}

impl SpecRunConfig {
    pub fn page_layout(&self) -> SpecPageLayout {
        SpecPageLayout {
            n_rows_page: self.n_rows_page,
            ..Default::default()
        }
    }

    pub fn classifier_options(&self) -> SpecClassifierOptions {
        SpecClassifierOptions {
            professional_courses: self
                .professional_courses
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect::<BTreeSet<_>>(),
            ..Default::default()
        }
    }

    pub fn summary_write_options(&self) -> SpecSummaryWriteOptions {
        SpecSummaryWriteOptions {
            sheet_name: self.sheet_name_summary.clone(),
            ..Default::default()
        }
    }
}

/// Load settings from `gradekit.toml` (optional) and `GRADEKIT_*` variables.
///
/// `GRADEKIT_PROFESSIONAL_COURSES` is a comma-separated list.
pub fn load_run_config() -> Result<SpecRunConfig> {
    Config::builder()
        .add_source(File::with_name("gradekit").required(false))
        .add_source(
            Environment::with_prefix("GRADEKIT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("professional_courses"),
        )
        .build()
        .context("failed to assemble configuration sources")?
        .try_deserialize()
        .context("invalid gradekit configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core_presets() {
        let cfg = SpecRunConfig::default();
        assert_eq!(cfg.page_layout(), SpecPageLayout::default());
        assert_eq!(cfg.classifier_options(), SpecClassifierOptions::default());
        assert_eq!(cfg.summary_write_options().sheet_name, "Sheet1");
    }

    #[test]
    fn test_classifier_options_trim_course_names() {
        let cfg = SpecRunConfig {
            professional_courses: vec![" 数据结构 ".to_string(), "".to_string()],
            ..Default::default()
        };
        let options = cfg.classifier_options();
        assert_eq!(options.professional_courses.len(), 1);
        assert!(options.professional_courses.contains("数据结构"));
    }

    #[test]
    fn test_partial_source_keeps_field_defaults() {
        let cfg: SpecRunConfig = Config::builder()
            .set_override("path_data_sheet", "card.xlsx")
            .expect("override")
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");
        assert_eq!(cfg.path_data_sheet, PathBuf::from("card.xlsx"));
        assert_eq!(cfg.n_rows_page, N_ROWS_PAGE);
    }
}
