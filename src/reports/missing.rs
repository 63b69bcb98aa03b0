use std::collections::HashSet;

use crate::config::{MissingGrouping, MissingHomeworksParams, ReportConfig};
use crate::error::Result;
use crate::index::DatasetIndex;
use crate::models::{Course, MissingHomeworkRow, Student};

struct Tally {
    total: usize,
    submitted: usize,
    missed: Vec<String>,
}

impl Tally {
    fn empty() -> Self {
        Self {
            total: 0,
            submitted: 0,
            missed: Vec::new(),
        }
    }

    fn missing(&self) -> usize {
        self.total - self.submitted
    }
}

fn tally_course(index: &DatasetIndex, student_id: &str, course_id: &str, tally: &mut Tally) {
    for homework in index.homeworks_of(course_id) {
        tally.total += 1;
        if index.has_submitted(&homework.id, student_id) {
            tally.submitted += 1;
        } else {
            tally.missed.push(homework.id.clone());
        }
    }
}

/// Distinct courses a student is enrolled in, in enrollment order.
fn enrolled_courses<'a>(index: &DatasetIndex<'a>, student_id: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    index
        .enrollments_by_student
        .get(student_id)
        .into_iter()
        .flatten()
        .copied()
        .map(|enrollment| enrollment.course_id.as_str())
        .filter(|course_id| seen.insert(*course_id))
        .collect()
}

fn row(
    student: &Student,
    course: Option<&Course>,
    enrolled: usize,
    tally: Tally,
    config: &ReportConfig,
) -> MissingHomeworkRow {
    MissingHomeworkRow {
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        student_email: student.email.clone(),
        course_id: course.map(|c| c.id.clone()),
        course_title: course.map(|c| c.title.clone()),
        enrolled_courses: enrolled,
        total_homeworks: tally.total,
        submitted_homeworks: tally.submitted,
        missing_submissions: tally.missing(),
        submission_rate: config.percent(tally.submitted, tally.total),
        missed_homework_ids: tally.missed,
    }
}

/// Students (or enrollments) with homeworks that have no submission from that student.
///
/// Ordered by missing count, highest first; ties keep input order.
pub fn missing_homeworks(
    index: &DatasetIndex,
    params: &MissingHomeworksParams,
    config: &ReportConfig,
) -> Result<Vec<MissingHomeworkRow>> {
    let mut rows = Vec::new();

    match params.grouping {
        MissingGrouping::PerEnrollment => {
            for enrollment in &index.dataset.enrollments {
                let student = index.student(&enrollment.student_id)?;
                let course = index.course(&enrollment.course_id)?;
                let mut tally = Tally::empty();
                tally_course(index, &student.id, &course.id, &mut tally);

                if params.keeps(tally.missing()) {
                    let enrolled = enrolled_courses(index, &student.id).len();
                    rows.push(row(student, Some(course), enrolled, tally, config));
                }
            }
        }
        MissingGrouping::PerStudent => {
            for student in &index.dataset.students {
                let courses = enrolled_courses(index, &student.id);
                let mut tally = Tally::empty();
                for course_id in &courses {
                    tally_course(index, &student.id, course_id, &mut tally);
                }

                if params.keeps(tally.missing()) {
                    rows.push(row(student, None, courses.len(), tally, config));
                }
            }
        }
    }

    rows.sort_by(|a, b| b.missing_submissions.cmp(&a.missing_submissions));
    tracing::debug!(rows = rows.len(), grouping = ?params.grouping, "missing homeworks computed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{two_module_course, Fixture};
    use crate::sample::sample_dataset;

    fn run(dataset: &crate::dataset::Dataset, params: MissingHomeworksParams) -> Vec<MissingHomeworkRow> {
        let index = DatasetIndex::build(dataset).unwrap();
        missing_homeworks(&index, &params, &ReportConfig::default()).unwrap()
    }

    #[test]
    fn counts_one_missing_homework_for_the_enrollment() {
        let rows = run(&two_module_course(), MissingHomeworksParams::default());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.course_id.as_deref(), Some("c"));
        assert_eq!(row.total_homeworks, 2);
        assert_eq!(row.submitted_homeworks, 1);
        assert_eq!(row.missing_submissions, 1);
        assert_eq!(row.submission_rate, 50.0);
        assert_eq!(row.missed_homework_ids, vec!["h2".to_string()]);
    }

    #[test]
    fn threshold_is_strictly_greater_than_min_missing() {
        let params = MissingHomeworksParams {
            min_missing: 1,
            ..Default::default()
        };
        assert!(run(&two_module_course(), params).is_empty());
    }

    #[test]
    fn include_all_keeps_students_with_nothing_missing() {
        let dataset = Fixture::new()
            .student("s")
            .course("c", None)
            .enroll("s", "c")
            .module("m", "c")
            .lesson("l", "m")
            .homework("h", "l")
            .submit("sub", "h", "s")
            .build();

        assert!(run(&dataset, MissingHomeworksParams::default()).is_empty());

        let rows = run(
            &dataset,
            MissingHomeworksParams {
                include_all: true,
                ..Default::default()
            },
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].missing_submissions, 0);
        assert_eq!(rows[0].submission_rate, 100.0);
    }

    #[test]
    fn course_without_homeworks_has_zero_rate() {
        let dataset = Fixture::new()
            .student("s")
            .course("c", None)
            .enroll("s", "c")
            .build();

        let rows = run(
            &dataset,
            MissingHomeworksParams {
                include_all: true,
                ..Default::default()
            },
        );
        assert_eq!(rows[0].total_homeworks, 0);
        assert_eq!(rows[0].submission_rate, 0.0);
    }

    #[test]
    fn per_student_sums_across_distinct_courses() {
        let params = MissingHomeworksParams {
            grouping: MissingGrouping::PerStudent,
            ..Default::default()
        };
        let rows = run(&sample_dataset(), params);

        // Kiara misses three homeworks in Rust Fundamentals and none in Async Services.
        let kiara = rows.iter().find(|r| r.student_id == "s-kiara").unwrap();
        assert_eq!(kiara.enrolled_courses, 2);
        assert_eq!(kiara.total_homeworks, 4);
        assert_eq!(kiara.missing_submissions, 3);
        assert!(kiara.course_id.is_none());

        // Avery submitted everything and drops out of the default filter.
        assert!(rows.iter().all(|r| r.student_id != "s-avery"));
    }

    #[test]
    fn re_enrollment_does_not_double_count_per_student() {
        let dataset = Fixture::new()
            .student("s")
            .course("c", None)
            .enroll("s", "c")
            .enroll("s", "c")
            .module("m", "c")
            .lesson("l", "m")
            .homework("h", "l")
            .build();

        let rows = run(
            &dataset,
            MissingHomeworksParams {
                grouping: MissingGrouping::PerStudent,
                ..Default::default()
            },
        );
        assert_eq!(rows[0].enrolled_courses, 1);
        assert_eq!(rows[0].missing_submissions, 1);
    }

    #[test]
    fn ordered_by_missing_then_input_order() {
        let rows = run(&sample_dataset(), MissingHomeworksParams::default());
        let keys: Vec<(&str, usize)> = rows
            .iter()
            .map(|r| (r.student_id.as_str(), r.missing_submissions))
            .collect();
        assert_eq!(keys, vec![("s-kiara", 3), ("s-jules", 2)]);
    }

    fn tied_counts() -> crate::dataset::Dataset {
        Fixture::new()
            .student("s3")
            .student("s1")
            .student("s2")
            .course("c", None)
            .module("m", "c")
            .lesson("l", "m")
            .homework("h1", "l")
            .homework("h2", "l")
            .enroll("s2", "c")
            .enroll("s1", "c")
            .enroll("s3", "c")
            .submit("sub-2", "h1", "s2")
            .submit("sub-3", "h2", "s3")
            .build()
    }

    #[test]
    fn equal_counts_keep_enrollment_order() {
        let rows = run(&tied_counts(), MissingHomeworksParams::default());
        let keys: Vec<(&str, usize)> = rows
            .iter()
            .map(|r| (r.student_id.as_str(), r.missing_submissions))
            .collect();
        assert_eq!(keys, vec![("s1", 2), ("s2", 1), ("s3", 1)]);
    }

    #[test]
    fn equal_counts_keep_student_order() {
        let params = MissingHomeworksParams {
            grouping: MissingGrouping::PerStudent,
            ..Default::default()
        };
        let rows = run(&tied_counts(), params);
        let keys: Vec<(&str, usize)> = rows
            .iter()
            .map(|r| (r.student_id.as_str(), r.missing_submissions))
            .collect();
        assert_eq!(keys, vec![("s1", 2), ("s3", 1), ("s2", 1)]);
    }
}
