//! Grade-card layout constants and default preset factories.

use std::collections::BTreeSet;

use crate::spec::{EnumStudentField, SpecCourseGroupLayout, SpecHeaderCell};

/// Rows per student page in the grade-card export, separator row included.
pub const N_ROWS_PAGE: usize = 61;
/// Trailing separator rows per page (never read).
pub const N_ROWS_PAGE_SEPARATOR: usize = 1;
/// First page-relative row of the course region.
pub const N_ROW_COURSE_START: usize = 6;
/// Rows at the end of a page (after separator removal) excluded from the course region.
pub const N_ROWS_COURSE_TRAILING: usize = 1;

/// Number of columns in the summary table.
pub const N_SUMMARY_COLS: usize = 9;
/// Largest summary row number; every integer up to it is exact in an `f64` cell.
pub const N_ROW_NUMBER_MAX: u64 = 1 << 53;

/// Passing score for professional courses.
pub const N_SCORE_PASS_PROFESSIONAL: u32 = 70;
/// Passing score for every other course.
pub const N_SCORE_PASS_GENERAL: u32 = 60;

/// Character marking a score obtained in a retake exam.
pub const C_RETAKE_MARKER: char = '*';
/// Category label of public elective courses.
pub const C_CATEGORY_PUBLIC_ELECTIVE: &str = "公选";
/// Unit suffix appended to credit values in the summary table.
pub const C_UNIT_CREDIT: &str = "学分";

/// Core-curriculum course names judged at the professional threshold.
pub const TUP_PROFESSIONAL_COURSES: [&str; 8] = [
    "离散数学",
    "程序设计基础",
    "面向对象程序设计(Java)",
    "数据结构",
    "计算机组成与体系结构",
    "操作系统原理",
    "计算机网络",
    "数据库系统原理",
];

/// Page-relative header cells, one per student field.
pub const TUP_STUDENT_HEADER_LAYOUT: [SpecHeaderCell; 16] = [
    SpecHeaderCell::new(0, 1, EnumStudentField::Institute),
    SpecHeaderCell::new(0, 5, EnumStudentField::Major),
    SpecHeaderCell::new(0, 10, EnumStudentField::ClassName),
    SpecHeaderCell::new(1, 1, EnumStudentField::Name),
    SpecHeaderCell::new(1, 5, EnumStudentField::StudentId),
    SpecHeaderCell::new(1, 10, EnumStudentField::Nation),
    SpecHeaderCell::new(2, 1, EnumStudentField::EnrollTime),
    SpecHeaderCell::new(2, 5, EnumStudentField::GraduationTime),
    SpecHeaderCell::new(2, 10, EnumStudentField::EducateTime),
    SpecHeaderCell::new(3, 1, EnumStudentField::BirthDate),
    SpecHeaderCell::new(3, 5, EnumStudentField::IdentityId),
    SpecHeaderCell::new(3, 10, EnumStudentField::PoliticalState),
    SpecHeaderCell::new(4, 1, EnumStudentField::TotalCredit),
    SpecHeaderCell::new(4, 3, EnumStudentField::CompulsoryCredit),
    SpecHeaderCell::new(4, 7, EnumStudentField::PublicCredit),
    SpecHeaderCell::new(4, 10, EnumStudentField::ProfessionalCredit),
];

/// The two side-by-side course tables of a page.
///
/// The right-hand table starts 7 columns further; its name column is shifted
/// by one more and the remaining columns by two more (separator columns).
pub const TUP_COURSE_GROUP_LAYOUTS: [SpecCourseGroupLayout; 2] = [
    SpecCourseGroupLayout {
        col_term: 0,
        col_name: 1,
        col_category: 3,
        col_sessions: 4,
        col_credit: 5,
        col_score: 6,
    },
    SpecCourseGroupLayout {
        col_term: 7,
        col_name: 9,
        col_category: 12,
        col_sessions: 13,
        col_credit: 14,
        col_score: 15,
    },
];

/// Build the default professional course-name set.
pub fn derive_default_professional_courses() -> BTreeSet<String> {
    TUP_PROFESSIONAL_COURSES
        .iter()
        .map(ToString::to_string)
        .collect()
}
