//! Positional extraction of students and courses from the grade-card grid.

use tracing::{debug, info};

use crate::spec::{
    EnumCellValue, EnumRecordError, EnumStudentField, SpecCourse, SpecCourseGroupLayout,
    SpecHeaderCell, SpecPageLayout, SpecStudent, SpecStudentHeader,
};
use crate::table::{SpecRawTable, SpecTableView};
use crate::util::{parse_date, parse_year_month};

const C_FMT_YEAR_MONTH: &str = "YYYYMM";
const C_FMT_DATE: &str = "YYYYMMDD";

////////////////////////////////////////////////////////////////////////////////
// #region CellDecoders

fn decode_number(value: &EnumCellValue, field: &'static str) -> Result<f64, EnumRecordError> {
    value.to_f64().ok_or_else(|| EnumRecordError::InvalidNumber {
        field,
        text: value.to_text(),
    })
}

fn decode_integer(value: &EnumCellValue, field: &'static str) -> Result<u64, EnumRecordError> {
    let err = || EnumRecordError::InvalidNumber {
        field,
        text: value.to_text(),
    };
    match value {
        EnumCellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && *n >= 0.0 => {
            Ok(*n as u64)
        }
        EnumCellValue::Text(s) => s.trim().parse::<u64>().map_err(|_| err()),
        _ => Err(err()),
    }
}

fn decode_year_month(
    value: &EnumCellValue,
    field: &'static str,
) -> Result<chrono::NaiveDate, EnumRecordError> {
    let c_text = value.to_text();
    parse_year_month(&c_text).ok_or(EnumRecordError::DateFormat {
        field,
        text: c_text,
        format: C_FMT_YEAR_MONTH,
    })
}

fn decode_date(
    value: &EnumCellValue,
    field: &'static str,
) -> Result<chrono::NaiveDate, EnumRecordError> {
    let c_text = value.to_text();
    parse_date(&c_text).ok_or(EnumRecordError::DateFormat {
        field,
        text: c_text,
        format: C_FMT_DATE,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CourseExtraction

/// Scan the course region group by group.
///
/// Within a group, the first row with any empty cell ends the group; rows
/// after it are not read even if they hold data.
pub fn extract_courses(
    region: SpecTableView<'_>,
    course_groups: &[SpecCourseGroupLayout],
) -> Result<Vec<SpecCourse>, EnumRecordError> {
    let mut l_courses = Vec::new();

    for group in course_groups {
        let l_cols = group.columns();
        for n_row in 0..region.height() {
            if l_cols.iter().any(|col| region.is_empty_at(n_row, *col)) {
                break;
            }

            l_courses.push(SpecCourse {
                term: region.cell(n_row, group.col_term).to_text(),
                name: region.cell(n_row, group.col_name).to_text(),
                category: region.cell(n_row, group.col_category).to_text(),
                sessions: region.cell(n_row, group.col_sessions).to_text(),
                credit: decode_number(region.cell(n_row, group.col_credit), "course_credit")?,
                score: region.cell(n_row, group.col_score).to_text(),
            });
        }
    }

    Ok(l_courses)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StudentExtraction

fn apply_header_cell(
    header: &mut SpecStudentHeader,
    spec_cell: &SpecHeaderCell,
    value: &EnumCellValue,
) -> Result<(), EnumRecordError> {
    let field = spec_cell.field.as_str();
    match spec_cell.field {
        EnumStudentField::Institute => header.institute = value.to_text(),
        EnumStudentField::Major => header.major = value.to_text(),
        EnumStudentField::ClassName => header.class_name = value.to_text(),
        EnumStudentField::Name => header.name = value.to_text(),
        EnumStudentField::StudentId => header.student_id = decode_integer(value, field)?,
        EnumStudentField::Nation => header.nation = value.to_text(),
        EnumStudentField::EnrollTime => header.enroll_time = decode_year_month(value, field)?,
        EnumStudentField::GraduationTime => {
            header.graduation_time = decode_year_month(value, field)?
        }
        EnumStudentField::EducateTime => {
            let n_years = decode_integer(value, field)?;
            header.educate_time =
                u32::try_from(n_years).map_err(|_| EnumRecordError::InvalidNumber {
                    field,
                    text: value.to_text(),
                })?;
        }
        EnumStudentField::BirthDate => header.birth_date = decode_date(value, field)?,
        EnumStudentField::IdentityId => header.identity_id = value.to_text(),
        EnumStudentField::PoliticalState => header.political_state = value.to_text(),
        EnumStudentField::TotalCredit => header.total_credit = decode_number(value, field)?,
        EnumStudentField::CompulsoryCredit => {
            header.compulsory_credit = decode_number(value, field)?
        }
        EnumStudentField::PublicCredit => header.public_credit = decode_number(value, field)?,
        EnumStudentField::ProfessionalCredit => {
            header.professional_credit = decode_number(value, field)?
        }
    }
    Ok(())
}

/// Build one student from one separator-free page.
pub fn extract_student(
    page: SpecTableView<'_>,
    layout: &SpecPageLayout,
) -> Result<SpecStudent, EnumRecordError> {
    let mut header = SpecStudentHeader::default();
    for spec_cell in &layout.header_cells {
        apply_header_cell(&mut header, spec_cell, page.cell(spec_cell.row, spec_cell.col))?;
    }

    let n_row_course_end = page
        .height()
        .saturating_sub(layout.n_rows_course_trailing);
    let region = page.slice_rows(layout.n_row_course_start, n_row_course_end);
    let l_courses = extract_courses(region, &layout.course_groups)?;

    Ok(SpecStudent::new(header, l_courses))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PagedLoading

fn validate_page_layout(layout: &SpecPageLayout) -> Result<(), EnumRecordError> {
    if layout.n_rows_page == 0 {
        return Err(EnumRecordError::InvalidLayout(
            "n_rows_page must be >= 1.".to_string(),
        ));
    }
    if layout.n_rows_separator >= layout.n_rows_page {
        return Err(EnumRecordError::InvalidLayout(format!(
            "n_rows_separator ({}) must be < n_rows_page ({}).",
            layout.n_rows_separator, layout.n_rows_page
        )));
    }
    Ok(())
}

/// Split the grid into pages and extract one student per page, in page order.
///
/// The first malformed page aborts the whole load.
pub fn load_students(
    table: &SpecRawTable,
    layout: &SpecPageLayout,
) -> Result<Vec<SpecStudent>, EnumRecordError> {
    validate_page_layout(layout)?;

    let n_rows_body = layout.n_rows_page - layout.n_rows_separator;
    let mut l_students = Vec::new();

    for (idx_page, row_start) in (0..table.height())
        .step_by(layout.n_rows_page)
        .enumerate()
    {
        let page = table.view_rows(row_start, row_start + n_rows_body);
        let student =
            extract_student(page, layout).map_err(|err| EnumRecordError::Page {
                idx_page,
                row_start,
                source: Box::new(err),
            })?;
        debug!(
            idx_page,
            student_id = student.student_id(),
            n_courses = student.courses().len(),
            "extracted student"
        );
        l_students.push(student);
    }

    info!(n_students = l_students.len(), "loaded grade-card pages");
    Ok(l_students)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
