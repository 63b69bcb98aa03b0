use crate::config::{CourseCompletionParams, ReportConfig};
use crate::error::Result;
use crate::index::DatasetIndex;
use crate::models::{CourseCompletionRow, EnrollmentCompletionRow, Lesson};

/// Progress of one student over one course's lessons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LessonTally {
    pub total: usize,
    pub completed: usize,
    pub time_spent: f64,
}

impl LessonTally {
    pub(crate) fn of(index: &DatasetIndex, student_id: &str, lessons: &[&Lesson], config: &ReportConfig) -> Self {
        let mut tally = Self {
            total: lessons.len(),
            completed: 0,
            time_spent: 0.0,
        };

        for lesson in lessons {
            if let Some(progress) = index.progress_of(student_id, &lesson.id) {
                tally.time_spent += progress.time_spent_minutes;
                if progress.completion_percentage >= config.completion_threshold {
                    tally.completed += 1;
                }
            }
        }

        tally
    }

    /// Every lesson completed. A course without lessons is never completed.
    pub(crate) fn finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Share of enrolled students who completed every lesson, per course.
///
/// Rows are ordered by completion rate, highest first; ties keep input order.
pub fn course_completion(
    index: &DatasetIndex,
    config: &ReportConfig,
) -> Result<Vec<CourseCompletionRow>> {
    let mut rows = Vec::with_capacity(index.dataset.courses.len());

    for course in &index.dataset.courses {
        let lessons = index.lessons_of(&course.id);
        let enrollments = index.enrollments_in(&course.id);
        let completed = enrollments
            .iter()
            .filter(|enrollment| LessonTally::of(index, &enrollment.student_id, &lessons, config).finished())
            .count();

        tracing::debug!(course = %course.id, enrolled = enrollments.len(), completed, "course completion");

        rows.push(CourseCompletionRow {
            course_id: course.id.clone(),
            title: course.title.clone(),
            instructor: index.instructor_of(course).map(|t| t.name.clone()),
            status: course.status.clone(),
            difficulty: course.difficulty.clone(),
            total_lessons: lessons.len(),
            total_enrolled: enrollments.len(),
            completed,
            completion_rate: config.percent(completed, enrollments.len()),
        });
    }

    rows.sort_by(|a, b| b.completion_rate.total_cmp(&a.completion_rate));
    Ok(rows)
}

/// Lesson-level progress for each enrollment, optionally truncated to `params.limit`.
pub fn enrollment_completion(
    index: &DatasetIndex,
    params: &CourseCompletionParams,
    config: &ReportConfig,
) -> Result<Vec<EnrollmentCompletionRow>> {
    let mut rows = Vec::with_capacity(index.dataset.enrollments.len());

    for enrollment in &index.dataset.enrollments {
        let student = index.student(&enrollment.student_id)?;
        let course = index.course(&enrollment.course_id)?;
        let lessons = index.lessons_of(&course.id);
        let tally = LessonTally::of(index, &student.id, &lessons, config);

        rows.push(EnrollmentCompletionRow {
            enrollment_id: enrollment.id.clone(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            course_id: course.id.clone(),
            course_title: course.title.clone(),
            difficulty: course.difficulty.clone(),
            total_lessons: tally.total,
            completed_lessons: tally.completed,
            completion_percentage: config.percent(tally.completed, tally.total),
            total_time_spent: tally.time_spent,
            avg_time_per_lesson: config.average(tally.time_spent, tally.total),
            enrollment_status: enrollment.status.clone(),
        });
    }

    rows.sort_by(|a, b| b.completion_percentage.total_cmp(&a.completion_percentage));
    tracing::debug!(rows = rows.len(), limit = ?params.limit, "enrollment completion computed");
    if let Some(limit) = params.limit {
        rows.truncate(limit);
    }
    Ok(rows)
}
