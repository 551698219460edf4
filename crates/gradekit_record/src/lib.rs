//! `gradekit_record` v1:
//! Grade-card record extraction and risk classification kernel.
//!
//! Modules:
//! - `conf`     : layout constants and default presets
//! - `spec`     : cell/record models, options, errors
//! - `table`    : positional grid and row windows
//! - `util`     : pure helper functions
//! - `extract`  : paged student/course extraction
//! - `classify` : diagnostic and accumulation passes
//! - `summary`  : summary table accumulator
pub mod classify;
pub mod conf;
pub mod extract;
pub mod spec;
pub mod summary;
pub mod table;
pub mod util;

pub use classify::RiskClassifier;
pub use conf::{
    C_CATEGORY_PUBLIC_ELECTIVE, C_RETAKE_MARKER, C_UNIT_CREDIT, N_ROW_NUMBER_MAX, N_ROWS_PAGE,
    N_SUMMARY_COLS, TUP_COURSE_GROUP_LAYOUTS, TUP_PROFESSIONAL_COURSES, TUP_STUDENT_HEADER_LAYOUT,
    derive_default_professional_courses,
};
pub use extract::{extract_courses, extract_student, load_students};
pub use spec::{
    EnumCellValue, EnumRecordError, EnumStudentField, SpecClassifierOptions, SpecCourse,
    SpecCourseGroupLayout, SpecHeaderCell, SpecPageLayout, SpecRiskReport, SpecStudent,
    SpecStudentHeader,
};
pub use summary::{SpecSummaryTable, derive_summary_row};
pub use table::{SpecRawTable, SpecTableView};
