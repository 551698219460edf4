//! Pass/fail classification of course results.
//!
//! Two passes:
//! - [`RiskClassifier::diagnose`] flags any retake-marked score outright and
//!   judges plain digit scores against their threshold;
//! - [`RiskClassifier::classify`] strips the retake marker first and judges
//!   every score numerically, so a passing retake is not flagged.

use tracing::debug;

use crate::spec::{SpecClassifierOptions, SpecCourse, SpecRiskReport, SpecStudent};
use crate::util::{parse_score, parse_score_unmarked};

/// Course classifier bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    options: SpecClassifierOptions,
}

impl RiskClassifier {
    pub fn new(options: SpecClassifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SpecClassifierOptions {
        &self.options
    }

    pub fn is_professional(&self, course: &SpecCourse) -> bool {
        course.is_professional(&self.options.professional_courses)
    }

    /// Passing score that applies to `course`.
    pub fn pass_score(&self, course: &SpecCourse) -> u32 {
        if self.is_professional(course) {
            self.options.score_pass_professional
        } else {
            self.options.score_pass_general
        }
    }

    /// First-pass report: courses worth a console line.
    pub fn diagnose<'a>(&self, student: &'a SpecStudent) -> Vec<&'a SpecCourse> {
        student
            .courses()
            .iter()
            .filter(|course| {
                if course.score.contains(self.options.retake_marker) {
                    return true;
                }
                parse_score_unmarked(&course.score)
                    .is_some_and(|n_score| n_score < self.pass_score(course))
            })
            .collect()
    }

    /// Accumulation pass: failed / need-relearn / unprofessional lists.
    ///
    /// Placeholder scores (not all digits after marker stripping) are skipped.
    pub fn classify<'a>(&self, student: &'a SpecStudent) -> SpecRiskReport<'a> {
        let mut l_courses_failed = Vec::new();
        let mut l_courses_unprofessional = Vec::new();

        for course in student.courses() {
            let Some(n_score) = parse_score(&course.score, self.options.retake_marker) else {
                continue;
            };

            let if_is_professional = self.is_professional(course);
            if n_score >= self.pass_score(course) {
                continue;
            }

            debug!(
                student_id = student.student_id(),
                course = %course.name,
                score = %course.score,
                professional = if_is_professional,
                "course below passing score"
            );
            l_courses_failed.push(course);
            if if_is_professional {
                l_courses_unprofessional.push(course);
            }
        }

        SpecRiskReport {
            student,
            l_courses_failed,
            l_courses_unprofessional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecStudentHeader;
    use proptest::prelude::*;

    fn make_course(name: &str, score: &str) -> SpecCourse {
        SpecCourse {
            term: "2022-2023-2".to_string(),
            name: name.to_string(),
            category: "必修".to_string(),
            sessions: "1".to_string(),
            credit: 4.0,
            score: score.to_string(),
        }
    }

    fn make_student(courses: Vec<SpecCourse>) -> SpecStudent {
        SpecStudent::new(
            SpecStudentHeader {
                name: "Li Wei".to_string(),
                student_id: 1001,
                ..Default::default()
            },
            courses,
        )
    }

    fn names<'a>(courses: &[&'a SpecCourse]) -> Vec<&'a str> {
        courses.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_professional_below_70_is_unprofessional_and_failed() {
        let student = make_student(vec![make_course("数据结构", "69")]);
        let report = RiskClassifier::default().classify(&student);

        assert_eq!(names(report.unprofessional_courses()), vec!["数据结构"]);
        assert_eq!(names(report.failed_courses()), vec!["数据结构"]);
        assert_eq!(names(report.need_relearn_courses()), vec!["数据结构"]);
        assert!(report.is_flagged());
    }

    #[test]
    fn test_passing_retake_is_not_classified_but_is_diagnosed() {
        let student = make_student(vec![make_course("数据结构", "75*")]);
        let classifier = RiskClassifier::default();

        let report = classifier.classify(&student);
        assert!(!report.is_flagged());
        assert_eq!(names(&classifier.diagnose(&student)), vec!["数据结构"]);
    }

    #[test]
    fn test_failing_retake_is_classified_after_stripping() {
        let student = make_student(vec![make_course("大学英语", "*55")]);
        let report = RiskClassifier::default().classify(&student);
        assert_eq!(names(report.failed_courses()), vec!["大学英语"]);
        assert!(report.unprofessional_courses().is_empty());
    }

    #[test]
    fn test_placeholder_scores_are_ignored_by_both_passes() {
        let student = make_student(vec![
            make_course("体育", "优"),
            make_course("数据结构", "缓考"),
            make_course("离散数学", "免修*"),
        ]);
        let classifier = RiskClassifier::default();

        assert!(!classifier.classify(&student).is_flagged());
        // Only the marker makes the last one show up in the diagnostic pass.
        assert_eq!(names(&classifier.diagnose(&student)), vec!["离散数学"]);
    }

    #[test]
    fn test_thresholds_per_category() {
        let student = make_student(vec![
            make_course("大学英语", "65"),
            make_course("大学物理", "59"),
            make_course("计算机网络", "70"),
            make_course("操作系统原理", "60"),
        ]);
        let classifier = RiskClassifier::default();

        let report = classifier.classify(&student);
        assert_eq!(names(report.failed_courses()), vec!["大学物理", "操作系统原理"]);
        assert_eq!(names(report.unprofessional_courses()), vec!["操作系统原理"]);
        assert_eq!(
            names(&classifier.diagnose(&student)),
            vec!["大学物理", "操作系统原理"]
        );
    }

    #[test]
    fn test_injected_course_set_changes_threshold() {
        let student = make_student(vec![make_course("大学英语", "65")]);
        let mut options = SpecClassifierOptions::default();
        options.professional_courses.insert("大学英语".to_string());

        let report = RiskClassifier::new(options).classify(&student);
        assert_eq!(names(report.unprofessional_courses()), vec!["大学英语"]);
    }

    #[test]
    fn test_student_without_failures_is_not_flagged() {
        let student = make_student(vec![make_course("数据结构", "95"), make_course("体育", "良")]);
        let report = RiskClassifier::default().classify(&student);
        assert!(!report.is_flagged());
        assert_eq!(report.failed_credit_total(), 0.0);
    }

    fn score_text() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..=100).prop_map(|n| n.to_string()),
            (0u32..=100).prop_map(|n| format!("{n}*")),
            (0u32..=100).prop_map(|n| format!("*{n}")),
            Just("优".to_string()),
            Just("缓考".to_string()),
            Just("".to_string()),
        ]
    }

    fn course_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("数据结构".to_string()),
            Just("计算机网络".to_string()),
            Just("大学英语".to_string()),
            Just("体育".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_classify_lists_follow_thresholds(
            l_pairs in prop::collection::vec((course_name(), score_text()), 0..12)
        ) {
            let student = make_student(
                l_pairs.iter().map(|(name, score)| make_course(name, score)).collect(),
            );
            let classifier = RiskClassifier::default();
            let report = classifier.classify(&student);

            prop_assert_eq!(
                names(report.failed_courses()),
                names(report.need_relearn_courses())
            );

            for course in report.failed_courses() {
                let n_score = parse_score(&course.score, '*');
                prop_assert!(n_score.is_some());
                prop_assert!(n_score.unwrap_or(u32::MAX) < classifier.pass_score(course));
            }
            for course in report.unprofessional_courses() {
                prop_assert!(classifier.is_professional(course));
                prop_assert!(parse_score(&course.score, '*').unwrap_or(u32::MAX) < 70);
            }

            let n_expected_failed = student
                .courses()
                .iter()
                .filter(|c| {
                    parse_score(&c.score, '*').is_some_and(|n| n < classifier.pass_score(c))
                })
                .count();
            prop_assert_eq!(report.failed_courses().len(), n_expected_failed);

            let n_expected_unprofessional = student
                .courses()
                .iter()
                .filter(|c| {
                    classifier.is_professional(c)
                        && parse_score(&c.score, '*').is_some_and(|n| n < 70)
                })
                .count();
            prop_assert_eq!(report.unprofessional_courses().len(), n_expected_unprofessional);
        }
    }
}
