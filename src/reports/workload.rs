use std::collections::{HashMap, HashSet};

use crate::config::{ReportConfig, TeacherWorkloadParams, WorkloadOrder};
use crate::error::Result;
use crate::index::DatasetIndex;
use crate::models::TeacherWorkloadRow;

/// Courses, distinct students and unreviewed submissions per teacher.
///
/// Ordered by `params.order`, highest first; ties keep teacher input order.
pub fn teacher_workload(
    index: &DatasetIndex,
    params: &TeacherWorkloadParams,
    config: &ReportConfig,
) -> Result<Vec<TeacherWorkloadRow>> {
    let mut grades_given: HashMap<&str, (f64, usize)> = HashMap::new();
    for review in &index.dataset.reviews {
        if let (Some(teacher_id), Some(grade)) = (review.teacher_id.as_deref(), review.grade) {
            let entry = grades_given.entry(teacher_id).or_insert((0.0, 0));
            entry.0 += grade;
            entry.1 += 1;
        }
    }

    let mut rows = Vec::with_capacity(index.dataset.teachers.len());

    for teacher in &index.dataset.teachers {
        let courses = index.courses_taught_by(&teacher.id);
        let mut students: HashSet<&str> = HashSet::new();
        let mut pending_reviews = 0;

        for course in courses {
            students.extend(
                index
                    .enrollments_in(&course.id)
                    .iter()
                    .map(|enrollment| enrollment.student_id.as_str()),
            );

            for homework in index.homeworks_of(&course.id) {
                pending_reviews += index
                    .submissions_of(&homework.id)
                    .iter()
                    .filter(|submission| index.review_of(&submission.id).is_none())
                    .count();
            }
        }

        let avg_grade_given = grades_given
            .get(teacher.id.as_str())
            .map(|(sum, count)| config.average(*sum, *count));

        rows.push(TeacherWorkloadRow {
            teacher_id: teacher.id.clone(),
            name: teacher.name.clone(),
            email: teacher.email.clone(),
            specialization: teacher.specialization.clone(),
            courses_taught: courses.len(),
            total_students: students.len(),
            pending_reviews,
            average_students_per_course: config.average(students.len() as f64, courses.len()),
            avg_grade_given,
        });
    }

    match params.order {
        WorkloadOrder::PendingReviews => rows.sort_by(|a, b| b.pending_reviews.cmp(&a.pending_reviews)),
        WorkloadOrder::CoursesTaught => rows.sort_by(|a, b| b.courses_taught.cmp(&a.courses_taught)),
    }

    tracing::debug!(rows = rows.len(), order = ?params.order, "teacher workload computed");
    Ok(rows)
}
