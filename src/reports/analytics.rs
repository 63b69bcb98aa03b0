use crate::config::ReportConfig;
use crate::error::{AnalyticsError, Result};
use crate::index::DatasetIndex;
use crate::models::{Course, CourseAnalytics, CourseStatistics, InstructorSummary};
use crate::reports::completion::LessonTally;

fn analyze(index: &DatasetIndex, course: &Course, config: &ReportConfig) -> CourseAnalytics {
    let lessons = index.lessons_of(&course.id);
    let enrollments = index.enrollments_in(&course.id);

    let completed_students = enrollments
        .iter()
        .filter(|enrollment| LessonTally::of(index, &enrollment.student_id, &lessons, config).finished())
        .count();

    let grades: Vec<f64> = enrollments.iter().filter_map(|enrollment| enrollment.grade).collect();

    let instructor = index.instructor_of(course).map(|teacher| InstructorSummary {
        id: teacher.id.clone(),
        name: teacher.name.clone(),
        email: teacher.email.clone(),
    });

    CourseAnalytics {
        course_id: course.id.clone(),
        title: course.title.clone(),
        description: course.description.clone(),
        category: course.category.clone(),
        instructor,
        statistics: CourseStatistics {
            enrolled_students: enrollments.len(),
            completed_students,
            completion_rate: config.percent(completed_students, enrollments.len()),
            modules: index.modules_of(&course.id).len(),
            lessons: lessons.len(),
            homeworks: index.homeworks_of(&course.id).len(),
            quizzes: index.quiz_count(&lessons),
            average_grade: config.average(grades.iter().sum(), grades.len()),
            difficulty: course.difficulty.clone(),
            status: course.status.clone(),
        },
    }
}

/// Full statistics for one course.
///
/// A missing or blank `course_id` is an invalid argument; an unknown one is not found.
pub fn course_analytics(
    index: &DatasetIndex,
    course_id: Option<&str>,
    config: &ReportConfig,
) -> Result<CourseAnalytics> {
    let course_id = course_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AnalyticsError::InvalidArgument("courseId is required".to_string()))?;

    let course = index
        .courses
        .get(course_id)
        .copied()
        .ok_or_else(|| AnalyticsError::NotFound {
            entity: "course",
            id: course_id.to_string(),
        })?;

    Ok(analyze(index, course, config))
}

/// Course statistics for every course, most enrolled first; ties keep input order.
pub fn course_overview(index: &DatasetIndex, config: &ReportConfig) -> Result<Vec<CourseAnalytics>> {
    let mut rows: Vec<CourseAnalytics> = index
        .dataset
        .courses
        .iter()
        .map(|course| analyze(index, course, config))
        .collect();

    rows.sort_by(|a, b| b.statistics.enrolled_students.cmp(&a.statistics.enrolled_students));
    tracing::debug!(rows = rows.len(), "course overview computed");
    Ok(rows)
}
