use std::fmt::Write;

use crate::models::CourseAnalytics;
use crate::reports::{ReportData, ReportEnvelope};

fn title(report: &str) -> &'static str {
    match report {
        "missingHomeworks" => "Students Missing Homeworks",
        "courseCompletion" => "Course Completion",
        "homeworkReviewStats" => "Homework Review Stats",
        "teacherWorkload" => "Teacher Workload",
        "courseAnalytics" => "Course Analytics",
        "courseOverview" => "Course Overview",
        _ => "Report",
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn write_course(output: &mut String, course: &CourseAnalytics) {
    let stats = &course.statistics;
    let instructor = course
        .instructor
        .as_ref()
        .map(|i| i.name.as_str())
        .unwrap_or("Unknown");

    let _ = writeln!(output, "## {} ({})", course.title, course.course_id);
    let _ = writeln!(
        output,
        "Instructor {}, {} / {}",
        instructor,
        or_dash(stats.difficulty.as_deref()),
        or_dash(stats.status.as_deref())
    );
    let _ = writeln!(
        output,
        "- {} modules, {} lessons, {} homeworks, {} quizzes",
        stats.modules, stats.lessons, stats.homeworks, stats.quizzes
    );
    let _ = writeln!(
        output,
        "- {} enrolled, {} completed ({:.2}%)",
        stats.enrolled_students, stats.completed_students, stats.completion_rate
    );
    let _ = writeln!(output, "- average grade {:.2}", stats.average_grade);
}

/// Renders an envelope as a Markdown document.
pub fn markdown(envelope: &ReportEnvelope) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", title(envelope.report));
    let _ = writeln!(
        output,
        "Generated {} ({} rows)",
        envelope.generated_at.format("%Y-%m-%d %H:%M UTC"),
        envelope.total
    );

    if !envelope.summary.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Summary");
        for (key, value) in &envelope.summary {
            let _ = writeln!(output, "- {key}: {value:.2}");
        }
    }

    let _ = writeln!(output);
    if envelope.data.is_empty() {
        let _ = writeln!(output, "No rows for this snapshot.");
        return output;
    }

    match &envelope.data {
        ReportData::MissingHomeworks(rows) => {
            for row in rows {
                let scope = row.course_title.as_deref().map_or_else(
                    || format!("{} courses", row.enrolled_courses),
                    str::to_string,
                );
                let _ = writeln!(
                    output,
                    "- {} ({}, {}) missing {} of {} homeworks ({:.2}% submitted)",
                    row.student_name,
                    row.student_email,
                    scope,
                    row.missing_submissions,
                    row.total_homeworks,
                    row.submission_rate
                );
            }
        }
        ReportData::CourseCompletion(rows) => {
            for row in rows {
                let _ = writeln!(
                    output,
                    "- {} ({}): {} of {} completed ({:.2}%)",
                    row.title,
                    or_dash(row.instructor.as_deref()),
                    row.completed,
                    row.total_enrolled,
                    row.completion_rate
                );
            }
        }
        ReportData::EnrollmentCompletion(rows) => {
            for row in rows {
                let _ = writeln!(
                    output,
                    "- {} in {}: {}/{} lessons ({:.2}%), {:.1} min per lesson",
                    row.student_name,
                    row.course_title,
                    row.completed_lessons,
                    row.total_lessons,
                    row.completion_percentage,
                    row.avg_time_per_lesson
                );
            }
        }
        ReportData::HomeworkReviews(rows) => {
            for row in rows {
                let _ = writeln!(
                    output,
                    "- {} ({}): {} submitted, {} reviewed, pass rate {:.2}%, average {:.2}",
                    row.title,
                    row.course_title,
                    row.total_submissions,
                    row.reviewed,
                    row.pass_rate,
                    row.average_grade
                );
            }
        }
        ReportData::TeacherWorkload(rows) => {
            for row in rows {
                let _ = writeln!(
                    output,
                    "- {}: {} courses, {} students, {} pending reviews",
                    row.name, row.courses_taught, row.total_students, row.pending_reviews
                );
            }
        }
        ReportData::CourseOverview(rows) => {
            for (position, course) in rows.iter().enumerate() {
                if position > 0 {
                    let _ = writeln!(output);
                }
                write_course(&mut output, course);
            }
        }
        ReportData::CourseAnalytics(course) => write_course(&mut output, course),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportConfig, TeacherWorkloadParams};
    use crate::reports::{run_report, ReportRequest};
    use crate::sample::sample_dataset;

    #[test]
    fn workload_markdown_lists_teachers() {
        let envelope = run_report(
            &sample_dataset(),
            &ReportRequest::TeacherWorkload(TeacherWorkloadParams::default()),
            &ReportConfig::default(),
        )
        .unwrap();

        let output = markdown(&envelope);
        assert!(output.starts_with("# Teacher Workload"));
        assert!(output.contains("- totalPendingReviews: 2.00"));
        assert!(output.contains("- Ada Byron: 2 courses, 3 students, 1 pending reviews"));
    }

    #[test]
    fn course_markdown_has_statistics() {
        let envelope = run_report(
            &sample_dataset(),
            &ReportRequest::CourseAnalytics {
                course_id: Some("c-rust".to_string()),
            },
            &ReportConfig::default(),
        )
        .unwrap();

        let output = markdown(&envelope);
        assert!(output.contains("## Rust Fundamentals (c-rust)"));
        assert!(output.contains("- 3 enrolled, 1 completed (33.33%)"));
    }
}
