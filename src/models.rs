use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub module_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Keyed uniquely by `(student_id, lesson_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub student_id: String,
    pub lesson_id: String,
    pub completion_percentage: f64,
    #[serde(default)]
    pub time_spent_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub lesson_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub homework_id: String,
    pub student_id: String,
    #[serde(default)]
    pub is_late: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown review status {other:?}")),
        }
    }
}

// Blank CSV cells and JSON nulls read as `Pending`, same as an absent field.
fn status_or_pending<'de, D>(deserializer: D) -> Result<ReviewStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ReviewStatus>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub submission_id: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: ReviewStatus,
}

// Report rows. Serialized in camelCase for JSON consumers.

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingHomeworkRow {
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    pub enrolled_courses: usize,
    pub total_homeworks: usize,
    pub submitted_homeworks: usize,
    pub missing_submissions: usize,
    pub submission_rate: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missed_homework_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCompletionRow {
    pub course_id: String,
    pub title: String,
    pub instructor: Option<String>,
    pub status: Option<String>,
    pub difficulty: Option<String>,
    pub total_lessons: usize,
    pub total_enrolled: usize,
    pub completed: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentCompletionRow {
    pub enrollment_id: String,
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_title: String,
    pub difficulty: Option<String>,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub completion_percentage: f64,
    pub total_time_spent: f64,
    pub avg_time_per_lesson: f64,
    pub enrollment_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkReviewRow {
    pub homework_id: String,
    pub title: String,
    pub lesson: Option<String>,
    pub course_title: String,
    pub due_date: Option<NaiveDate>,
    pub total_submissions: usize,
    pub late_submissions: usize,
    pub reviewed: usize,
    pub approved: usize,
    pub passed: usize,
    pub grades_sum: f64,
    pub pass_rate: f64,
    pub average_grade: f64,
    pub grading_completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherWorkloadRow {
    pub teacher_id: String,
    pub name: String,
    pub email: Option<String>,
    pub specialization: Option<String>,
    pub courses_taught: usize,
    pub total_students: usize,
    pub pending_reviews: usize,
    pub average_students_per_course: f64,
    pub avg_grade_given: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorSummary {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStatistics {
    pub enrolled_students: usize,
    pub completed_students: usize,
    pub completion_rate: f64,
    pub modules: usize,
    pub lessons: usize,
    pub homeworks: usize,
    pub quizzes: usize,
    pub average_grade: f64,
    pub difficulty: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub instructor: Option<InstructorSummary>,
    pub statistics: CourseStatistics,
}
