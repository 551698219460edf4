//! Shared record models, layout specs, options and errors.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::conf::{
    C_CATEGORY_PUBLIC_ELECTIVE, C_RETAKE_MARKER, N_ROW_COURSE_START, N_ROWS_COURSE_TRAILING,
    N_ROWS_PAGE, N_ROWS_PAGE_SEPARATOR, N_SCORE_PASS_GENERAL, N_SCORE_PASS_PROFESSIONAL,
    TUP_COURSE_GROUP_LAYOUTS, TUP_STUDENT_HEADER_LAYOUT, derive_default_professional_courses,
};
use crate::util::format_number_text;

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// One grid cell as read from the source workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    Empty,
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Map blank text and NaN to [`EnumCellValue::Empty`].
    pub fn normalized(self) -> Self {
        match self {
            Self::Text(s) if s.is_empty() => Self::Empty,
            Self::Number(n) if n.is_nan() => Self::Empty,
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => n.is_nan(),
        }
    }

    /// Render as text; integral numbers drop their fractional part.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number_text(*n),
        }
    }

    /// Numeric value of a number cell, or of a text cell that parses as a float.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Self::Number(n) => n.is_finite().then_some(*n),
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string()).normalized()
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::Text(value).normalized()
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value).normalized()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutSpecification

/// Student attribute addressed by one header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumStudentField {
    Institute,
    Major,
    ClassName,
    Name,
    StudentId,
    Nation,
    EnrollTime,
    GraduationTime,
    EducateTime,
    BirthDate,
    IdentityId,
    PoliticalState,
    TotalCredit,
    CompulsoryCredit,
    PublicCredit,
    ProfessionalCredit,
}

impl EnumStudentField {
    /// Stable snake-case field name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Institute => "institute",
            Self::Major => "major",
            Self::ClassName => "class_name",
            Self::Name => "name",
            Self::StudentId => "student_id",
            Self::Nation => "nation",
            Self::EnrollTime => "enroll_time",
            Self::GraduationTime => "graduation_time",
            Self::EducateTime => "educate_time",
            Self::BirthDate => "birth_date",
            Self::IdentityId => "identity_id",
            Self::PoliticalState => "political_state",
            Self::TotalCredit => "total_credit",
            Self::CompulsoryCredit => "compulsory_credit",
            Self::PublicCredit => "public_credit",
            Self::ProfessionalCredit => "professional_credit",
        }
    }
}

impl fmt::Display for EnumStudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-relative position of one header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecHeaderCell {
    /// Row within the page.
    pub row: usize,
    /// Column within the page.
    pub col: usize,
    /// Field decoded from this cell.
    pub field: EnumStudentField,
}

impl SpecHeaderCell {
    pub const fn new(row: usize, col: usize, field: EnumStudentField) -> Self {
        Self { row, col, field }
    }
}

/// Column positions of one course table within the course region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCourseGroupLayout {
    pub col_term: usize,
    pub col_name: usize,
    pub col_category: usize,
    pub col_sessions: usize,
    pub col_credit: usize,
    pub col_score: usize,
}

impl SpecCourseGroupLayout {
    /// Columns in record order: term, name, category, sessions, credit, score.
    pub fn columns(&self) -> [usize; 6] {
        [
            self.col_term,
            self.col_name,
            self.col_category,
            self.col_sessions,
            self.col_credit,
            self.col_score,
        ]
    }
}

/// Paging and positional layout of the grade-card table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPageLayout {
    /// Rows per student page, separator included.
    pub n_rows_page: usize,
    /// Trailing separator rows dropped from each page.
    pub n_rows_separator: usize,
    /// First page-relative row of the course region.
    pub n_row_course_start: usize,
    /// Rows at the end of the (separator-free) page excluded from the course region.
    pub n_rows_course_trailing: usize,
    /// Header field positions.
    pub header_cells: Vec<SpecHeaderCell>,
    /// Course tables scanned in order.
    pub course_groups: Vec<SpecCourseGroupLayout>,
}

impl Default for SpecPageLayout {
    fn default() -> Self {
        Self {
            n_rows_page: N_ROWS_PAGE,
            n_rows_separator: N_ROWS_PAGE_SEPARATOR,
            n_row_course_start: N_ROW_COURSE_START,
            n_rows_course_trailing: N_ROWS_COURSE_TRAILING,
            header_cells: TUP_STUDENT_HEADER_LAYOUT.to_vec(),
            course_groups: TUP_COURSE_GROUP_LAYOUTS.to_vec(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordModels

/// One term/course/score entry of a student.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecCourse {
    /// Academic term label.
    pub term: String,
    /// Course name.
    pub name: String,
    /// Category label (public elective or free text).
    pub category: String,
    /// Number of sessions/attempts as printed.
    pub sessions: String,
    /// Course credit.
    pub credit: f64,
    /// Raw score text: digits, digits with a retake marker, or a placeholder.
    pub score: String,
}

impl SpecCourse {
    /// Whether the course is a public elective.
    pub fn is_public(&self) -> bool {
        self.category == C_CATEGORY_PUBLIC_ELECTIVE
    }

    /// Whether the course name is in `professional_courses`.
    pub fn is_professional(&self, professional_courses: &BTreeSet<String>) -> bool {
        professional_courses.contains(&self.name)
    }
}

impl fmt::Display for SpecCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Course {} {}>", self.name, self.score)
    }
}

/// Identity and credit fields decoded from a page header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecStudentHeader {
    pub institute: String,
    pub major: String,
    pub class_name: String,
    pub name: String,
    pub student_id: u64,
    pub nation: String,
    /// Enrollment month (day fixed to 1).
    pub enroll_time: NaiveDate,
    /// Graduation month (day fixed to 1).
    pub graduation_time: NaiveDate,
    /// Program length in years.
    pub educate_time: u32,
    pub birth_date: NaiveDate,
    pub identity_id: String,
    pub political_state: String,
    pub total_credit: f64,
    pub compulsory_credit: f64,
    pub public_credit: f64,
    pub professional_credit: f64,
}

/// One student record with its courses in scan order.
///
/// Equality and ordering compare the student id only.
#[derive(Debug, Clone)]
pub struct SpecStudent {
    header: SpecStudentHeader,
    courses: Vec<SpecCourse>,
}

impl SpecStudent {
    pub fn new(header: SpecStudentHeader, courses: Vec<SpecCourse>) -> Self {
        Self { header, courses }
    }

    pub fn header(&self) -> &SpecStudentHeader {
        &self.header
    }

    pub fn courses(&self) -> &[SpecCourse] {
        &self.courses
    }

    pub fn student_id(&self) -> u64 {
        self.header.student_id
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn major(&self) -> &str {
        &self.header.major
    }

    pub fn enroll_year(&self) -> i32 {
        self.header.enroll_time.year()
    }
}

impl fmt::Display for SpecStudent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Student {} {}>", self.header.name, self.header.student_id)
    }
}

impl PartialEq for SpecStudent {
    fn eq(&self, other: &Self) -> bool {
        self.student_id() == other.student_id()
    }
}

impl Eq for SpecStudent {}

impl PartialOrd for SpecStudent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpecStudent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.student_id().cmp(&other.student_id())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ClassifierSpecification

/// Classifier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecClassifierOptions {
    /// Exact names of courses judged at `score_pass_professional`.
    pub professional_courses: BTreeSet<String>,
    /// Passing score for professional courses.
    pub score_pass_professional: u32,
    /// Passing score for other courses.
    pub score_pass_general: u32,
    /// Retake marker stripped before numeric evaluation.
    pub retake_marker: char,
}

impl Default for SpecClassifierOptions {
    fn default() -> Self {
        Self {
            professional_courses: derive_default_professional_courses(),
            score_pass_professional: N_SCORE_PASS_PROFESSIONAL,
            score_pass_general: N_SCORE_PASS_GENERAL,
            retake_marker: C_RETAKE_MARKER,
        }
    }
}

/// Accumulation-pass result for one student.
///
/// `failed` and `need_relearn` share one list; both accessors are kept so a
/// future split only touches this type.
#[derive(Debug, Clone)]
pub struct SpecRiskReport<'a> {
    pub(crate) student: &'a SpecStudent,
    pub(crate) l_courses_failed: Vec<&'a SpecCourse>,
    pub(crate) l_courses_unprofessional: Vec<&'a SpecCourse>,
}

impl<'a> SpecRiskReport<'a> {
    pub fn student(&self) -> &'a SpecStudent {
        self.student
    }

    /// Courses below their passing score.
    pub fn failed_courses(&self) -> &[&'a SpecCourse] {
        &self.l_courses_failed
    }

    /// Courses that must be retaken.
    pub fn need_relearn_courses(&self) -> &[&'a SpecCourse] {
        &self.l_courses_failed
    }

    /// Professional courses below the professional passing score.
    pub fn unprofessional_courses(&self) -> &[&'a SpecCourse] {
        &self.l_courses_unprofessional
    }

    /// Whether any list is non-empty.
    pub fn is_flagged(&self) -> bool {
        !self.failed_courses().is_empty()
            || !self.need_relearn_courses().is_empty()
            || !self.unprofessional_courses().is_empty()
    }

    /// Sum of failed course credits.
    pub fn failed_credit_total(&self) -> f64 {
        self.l_courses_failed.iter().map(|c| c.credit).sum()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Extraction failures. All of them abort the load.
#[derive(Debug, Error)]
pub enum EnumRecordError {
    /// Header date text does not match its fixed-width format.
    #[error("{field}: date text {text:?} does not match {format}")]
    DateFormat {
        field: &'static str,
        text: String,
        format: &'static str,
    },
    /// A numeric field could not be decoded.
    #[error("{field}: cannot decode {text:?} as a number")]
    InvalidNumber { field: &'static str, text: String },
    /// Page layout parameters are unusable.
    #[error("invalid page layout: {0}")]
    InvalidLayout(String),
    /// Error raised while extracting one page.
    #[error("page {idx_page} (row {row_start}): {source}")]
    Page {
        idx_page: usize,
        row_start: usize,
        #[source]
        source: Box<EnumRecordError>,
    },
    /// The summary's row-number column cannot be continued exactly.
    #[error("summary row number {value} leaves no room for another row (max {max})")]
    RowNumberOverflow { value: f64, max: u64 },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn make_student(student_id: u64, name: &str) -> SpecStudent {
        SpecStudent::new(
            SpecStudentHeader {
                name: name.to_string(),
                student_id,
                ..Default::default()
            },
            vec![],
        )
    }

    #[test]
    fn test_student_ordering_uses_student_id_only() {
        let a = make_student(1002, "A");
        let b = make_student(1001, "B");
        assert!(a > b);
        assert_eq!(make_student(7, "X"), make_student(7, "Y"));

        let mut l_students = vec![a, b];
        l_students.sort();
        assert_eq!(l_students[0].student_id(), 1001);
    }

    #[test]
    fn test_display_forms() {
        let student = make_student(1001, "Li Wei");
        let course = SpecCourse {
            term: "2020-2021-1".to_string(),
            name: "数据结构".to_string(),
            category: "必修".to_string(),
            sessions: "1".to_string(),
            credit: 4.0,
            score: "69".to_string(),
        };
        assert_eq!(format!("{student} {course}"), "<Student Li Wei 1001> <Course 数据结构 69>");
    }

    #[test]
    fn test_course_predicates() {
        let mut course = SpecCourse {
            term: String::new(),
            name: "数据结构".to_string(),
            category: C_CATEGORY_PUBLIC_ELECTIVE.to_string(),
            sessions: String::new(),
            credit: 2.0,
            score: "90".to_string(),
        };
        let set_names = derive_default_professional_courses();
        assert!(course.is_public());
        assert!(course.is_professional(&set_names));

        course.category = "必修".to_string();
        course.name = "大学英语".to_string();
        assert!(!course.is_public());
        assert!(!course.is_professional(&set_names));
    }

    #[test]
    fn test_cell_value_normalization() {
        assert_eq!(EnumCellValue::from(""), EnumCellValue::Empty);
        assert_eq!(EnumCellValue::from(f64::NAN), EnumCellValue::Empty);
        assert_eq!(EnumCellValue::from(201909.0).to_text(), "201909");
        assert_eq!(EnumCellValue::from(" 2.5 ").to_f64(), Some(2.5));
        assert!(EnumCellValue::Text(String::new()).is_empty());
    }
}
