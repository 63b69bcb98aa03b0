use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::models::{
    Course, Enrollment, Homework, Lesson, LessonProgress, Module, Quiz, Review, Student,
    Submission, Teacher,
};

/// Read-only snapshot of every entity the reports aggregate over.
///
/// Row order is significant: reports that do not sort (or that tie) fall back to
/// the order rows appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
    pub modules: Vec<Module>,
    pub lessons: Vec<Lesson>,
    pub lesson_progress: Vec<LessonProgress>,
    pub homeworks: Vec<Homework>,
    pub quizzes: Vec<Quiz>,
    pub submissions: Vec<Submission>,
    pub reviews: Vec<Review>,
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> Result<Self, AnalyticsError> {
        serde_json::from_str(raw).map_err(|err| AnalyticsError::Load(err.to_string()))
    }

    pub fn from_json_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let dataset = Self::from_json_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        Ok(dataset)
    }

    /// Loads one CSV file per entity from `dir`. Missing files yield empty collections.
    pub fn from_csv_dir(dir: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            students: read_csv(dir, "students.csv")?,
            teachers: read_csv(dir, "teachers.csv")?,
            courses: read_csv(dir, "courses.csv")?,
            enrollments: read_csv(dir, "enrollments.csv")?,
            modules: read_csv(dir, "modules.csv")?,
            lessons: read_csv(dir, "lessons.csv")?,
            lesson_progress: read_csv(dir, "lesson_progress.csv")?,
            homeworks: read_csv(dir, "homeworks.csv")?,
            quizzes: read_csv(dir, "quizzes.csv")?,
            submissions: read_csv(dir, "submissions.csv")?,
            reviews: read_csv(dir, "reviews.csv")?,
        })
    }

    pub fn row_count(&self) -> usize {
        self.students.len()
            + self.teachers.len()
            + self.courses.len()
            + self.enrollments.len()
            + self.modules.len()
            + self.lessons.len()
            + self.lesson_progress.len()
            + self.homeworks.len()
            + self.quizzes.len()
            + self.submissions.len()
            + self.reviews.len()
    }
}

fn read_csv<T: DeserializeOwned>(dir: &Path, file_name: &str) -> anyhow::Result<Vec<T>> {
    let path = dir.join(file_name);
    if !path.exists() {
        tracing::debug!(file = %path.display(), "csv file absent, using empty collection");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<T>().enumerate() {
        let row = result.with_context(|| format!("{} row {}", path.display(), line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewStatus;

    #[test]
    fn json_snapshot_defaults_missing_collections() {
        let raw = r#"{
            "students": [{"id": "s1", "name": "Avery Lee", "email": "avery@example.com"}],
            "courses": [{"id": "c1", "title": "Rust Basics", "instructorId": "t1"}],
            "reviews": [{"submissionId": "sub1", "grade": 81.5, "status": "Approved"}]
        }"#;

        let dataset = Dataset::from_json_str(raw).unwrap();
        assert_eq!(dataset.students.len(), 1);
        assert_eq!(dataset.courses[0].instructor_id.as_deref(), Some("t1"));
        assert_eq!(dataset.reviews[0].status, ReviewStatus::Approved);
        assert!(dataset.enrollments.is_empty());
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let err = Dataset::from_json_str("{\"students\": 4}").unwrap_err();
        assert!(matches!(err, AnalyticsError::Load(_)));
    }

    #[test]
    fn csv_directory_loads_present_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("students.csv"),
            "id,name,email\ns1,Avery Lee,avery@example.com\ns2,Jules Moreno,jules@example.com\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("submissions.csv"),
            "id,homeworkId,studentId,isLate\nsub1,h1,s1,true\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("homeworks.csv"),
            "id,lessonId,title,dueDate\nh1,l1,Ownership drills,2026-02-01\nh2,l1,Borrowing,\n",
        )
        .unwrap();

        let dataset = Dataset::from_csv_dir(dir.path()).unwrap();
        assert_eq!(dataset.students.len(), 2);
        assert!(dataset.submissions[0].is_late);
        assert_eq!(
            dataset.homeworks[0].due_date,
            chrono::NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(dataset.homeworks[1].due_date, None);
        assert!(dataset.teachers.is_empty());
    }

    #[test]
    fn blank_review_status_reads_as_pending() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("reviews.csv"),
            "submissionId,teacherId,grade,status\nsub1,t1,88,Approved\nsub2,t1,,\n",
        )
        .unwrap();

        let dataset = Dataset::from_csv_dir(dir.path()).unwrap();
        assert_eq!(dataset.reviews[0].status, ReviewStatus::Approved);
        assert_eq!(dataset.reviews[1].status, ReviewStatus::Pending);
        assert_eq!(dataset.reviews[1].grade, None);

        let from_json = Dataset::from_json_str(
            r#"{"reviews": [{"submissionId": "sub1", "status": null}]}"#,
        )
        .unwrap();
        assert_eq!(from_json.reviews[0].status, ReviewStatus::Pending);
    }
}
