use crate::config::ReportConfig;
use crate::error::Result;
use crate::index::DatasetIndex;
use crate::models::{HomeworkReviewRow, ReviewStatus};

/// Review throughput and grades per homework, in homework input order.
pub fn homework_review_stats(index: &DatasetIndex, config: &ReportConfig) -> Result<Vec<HomeworkReviewRow>> {
    let mut rows = Vec::with_capacity(index.dataset.homeworks.len());

    for homework in &index.dataset.homeworks {
        let lesson = index.lesson(&homework.lesson_id)?;
        let submissions = index.submissions_of(&homework.id);

        let mut late = 0;
        let mut reviewed = 0;
        let mut approved = 0;
        let mut passed = 0;
        let mut grades_sum = 0.0;

        for submission in submissions {
            if submission.is_late {
                late += 1;
            }
            let Some(review) = index.review_of(&submission.id) else {
                continue;
            };

            reviewed += 1;
            if review.status == ReviewStatus::Approved {
                approved += 1;
            }
            if let Some(grade) = review.grade {
                grades_sum += grade;
                if grade >= config.pass_threshold {
                    passed += 1;
                }
            }
        }

        rows.push(HomeworkReviewRow {
            homework_id: homework.id.clone(),
            title: homework.title.clone(),
            lesson: lesson.title.clone(),
            course_title: index.course_title_of_lesson(lesson).unwrap_or_default().to_string(),
            due_date: homework.due_date,
            total_submissions: submissions.len(),
            late_submissions: late,
            reviewed,
            approved,
            passed,
            grades_sum,
            pass_rate: config.percent(passed, reviewed),
            average_grade: config.average(grades_sum, reviewed),
            grading_completion_rate: config.percent(approved, submissions.len()),
        });
    }

    tracing::debug!(rows = rows.len(), "homework review stats computed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::Fixture;

    fn homework_with_reviews(grades: &[Option<f64>]) -> crate::dataset::Dataset {
        let mut fixture = Fixture::new()
            .student("s")
            .course("c", None)
            .module("m", "c")
            .lesson("l", "m")
            .homework("h", "l");
        for (n, grade) in grades.iter().enumerate() {
            let id = format!("sub{n}");
            fixture = fixture.submit(&id, "h", "s").review(&id, *grade, ReviewStatus::Approved);
        }
        fixture.build()
    }

    #[test]
    fn pass_rate_and_average_over_reviewed_only() {
        let dataset = Fixture::new()
            .student("s1")
            .student("s2")
            .student("s3")
            .course("c", None)
            .module("m", "c")
            .lesson("l", "m")
            .homework("h", "l")
            .submit("a", "h", "s1")
            .submit("b", "h", "s2")
            .submit_late("c", "h", "s3")
            .review("a", Some(80.0), ReviewStatus::Approved)
            .review("b", Some(60.0), ReviewStatus::Rejected)
            .build();
        let index = DatasetIndex::build(&dataset).unwrap();

        let rows = homework_review_stats(&index, &ReportConfig::default()).unwrap();
        let row = &rows[0];
        assert_eq!(row.total_submissions, 3);
        assert_eq!(row.reviewed, 2);
        assert_eq!(row.passed, 1);
        assert_eq!(row.pass_rate, 50.0);
        assert_eq!(row.average_grade, 70.0);
        assert_eq!(row.late_submissions, 1);
        assert_eq!(row.approved, 1);
        assert_eq!(row.grading_completion_rate, 33.33);
        assert_eq!(row.course_title, "Course c");
        assert_eq!(row.lesson.as_deref(), Some("Lesson l"));
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let dataset = homework_with_reviews(&[Some(70.0), Some(69.999)]);
        let index = DatasetIndex::build(&dataset).unwrap();
        let row = &homework_review_stats(&index, &ReportConfig::default()).unwrap()[0];
        assert_eq!(row.reviewed, 2);
        assert_eq!(row.passed, 1);
    }

    #[test]
    fn custom_pass_threshold() {
        let dataset = homework_with_reviews(&[Some(55.0), Some(65.0)]);
        let index = DatasetIndex::build(&dataset).unwrap();
        let config = ReportConfig {
            pass_threshold: 60.0,
            ..ReportConfig::default()
        };
        assert_eq!(homework_review_stats(&index, &config).unwrap()[0].passed, 1);
    }

    #[test]
    fn ungraded_review_counts_as_reviewed_not_passed() {
        let dataset = homework_with_reviews(&[None, Some(90.0)]);
        let index = DatasetIndex::build(&dataset).unwrap();
        let row = &homework_review_stats(&index, &ReportConfig::default()).unwrap()[0];
        assert_eq!(row.reviewed, 2);
        assert_eq!(row.passed, 1);
        assert_eq!(row.average_grade, 45.0);
    }

    #[test]
    fn unreviewed_homework_rates_are_zero() {
        let dataset = Fixture::new()
            .student("s")
            .course("c", None)
            .module("m", "c")
            .lesson("l", "m")
            .homework("h1", "l")
            .homework("h2", "l")
            .submit("sub", "h2", "s")
            .build();
        let index = DatasetIndex::build(&dataset).unwrap();
        let rows = homework_review_stats(&index, &ReportConfig::default()).unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.homework_id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "h2"]);
        for row in &rows {
            assert_eq!(row.pass_rate, 0.0);
            assert_eq!(row.average_grade, 0.0);
            assert_eq!(row.grading_completion_rate, 0.0);
        }
    }
}
