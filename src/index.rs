use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::dataset::Dataset;
use crate::error::{AnalyticsError, Result};
use crate::models::{
    Course, Enrollment, Homework, Lesson, LessonProgress, Module, Quiz, Review, Student,
    Submission, Teacher,
};

/// Groups `rows` under the key `key_fn` returns, keeping input order inside each group.
pub fn index_by_parent<'a, T, K, F>(rows: &'a [T], key_fn: F) -> HashMap<K, Vec<&'a T>>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, Vec<&'a T>> = HashMap::new();
    for row in rows {
        index.entry(key_fn(row)).or_default().push(row);
    }
    index
}

fn index_by_id<'a, T, F>(entity: &'static str, rows: &'a [T], id_fn: F) -> Result<HashMap<&'a str, &'a T>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let id = id_fn(row);
        if index.insert(id, row).is_some() {
            return Err(AnalyticsError::computation(entity, id, "duplicate id"));
        }
    }
    Ok(index)
}

fn ensure_exists<V>(
    lookup: &HashMap<&str, V>,
    entity: &'static str,
    id: &str,
    field: &str,
    target: &str,
) -> Result<()> {
    if lookup.contains_key(target) {
        Ok(())
    } else {
        Err(AnalyticsError::dangling(entity, id, field, target))
    }
}

/// Every lookup the reports need, built once per snapshot.
///
/// Construction validates referential integrity so that report code can treat
/// every foreign key as resolvable.
#[derive(Debug)]
pub struct DatasetIndex<'a> {
    pub dataset: &'a Dataset,
    pub students: HashMap<&'a str, &'a Student>,
    pub teachers: HashMap<&'a str, &'a Teacher>,
    pub courses: HashMap<&'a str, &'a Course>,
    pub modules: HashMap<&'a str, &'a Module>,
    pub lessons: HashMap<&'a str, &'a Lesson>,
    pub modules_by_course: HashMap<&'a str, Vec<&'a Module>>,
    pub lessons_by_module: HashMap<&'a str, Vec<&'a Lesson>>,
    pub homeworks_by_lesson: HashMap<&'a str, Vec<&'a Homework>>,
    pub quizzes_by_lesson: HashMap<&'a str, Vec<&'a Quiz>>,
    pub submissions_by_homework: HashMap<&'a str, Vec<&'a Submission>>,
    pub reviews_by_submission: HashMap<&'a str, Vec<&'a Review>>,
    pub enrollments_by_student: HashMap<&'a str, Vec<&'a Enrollment>>,
    pub enrollments_by_course: HashMap<&'a str, Vec<&'a Enrollment>>,
    pub courses_by_teacher: HashMap<&'a str, Vec<&'a Course>>,
    pub progress: HashMap<(&'a str, &'a str), &'a LessonProgress>,
    /// `(homework_id, student_id)` pairs with at least one submission.
    pub submitted: HashSet<(&'a str, &'a str)>,
}

impl<'a> DatasetIndex<'a> {
    pub fn build(dataset: &'a Dataset) -> Result<Self> {
        let students = index_by_id("student", &dataset.students, |s| s.id.as_str())?;
        let teachers = index_by_id("teacher", &dataset.teachers, |t| t.id.as_str())?;
        let courses = index_by_id("course", &dataset.courses, |c| c.id.as_str())?;
        let modules = index_by_id("module", &dataset.modules, |m| m.id.as_str())?;
        let lessons = index_by_id("lesson", &dataset.lessons, |l| l.id.as_str())?;
        let homeworks = index_by_id("homework", &dataset.homeworks, |h| h.id.as_str())?;
        let submissions = index_by_id("submission", &dataset.submissions, |s| s.id.as_str())?;
        index_by_id("enrollment", &dataset.enrollments, |e| e.id.as_str())?;
        index_by_id("quiz", &dataset.quizzes, |q| q.id.as_str())?;

        for course in &dataset.courses {
            if let Some(teacher_id) = course.instructor_id.as_deref() {
                ensure_exists(&teachers, "course", &course.id, "instructorId", teacher_id)?;
            }
        }
        for enrollment in &dataset.enrollments {
            ensure_exists(&students, "enrollment", &enrollment.id, "studentId", &enrollment.student_id)?;
            ensure_exists(&courses, "enrollment", &enrollment.id, "courseId", &enrollment.course_id)?;
        }
        for module in &dataset.modules {
            ensure_exists(&courses, "module", &module.id, "courseId", &module.course_id)?;
        }
        for lesson in &dataset.lessons {
            ensure_exists(&modules, "lesson", &lesson.id, "moduleId", &lesson.module_id)?;
        }
        for homework in &dataset.homeworks {
            ensure_exists(&lessons, "homework", &homework.id, "lessonId", &homework.lesson_id)?;
        }
        for quiz in &dataset.quizzes {
            ensure_exists(&lessons, "quiz", &quiz.id, "lessonId", &quiz.lesson_id)?;
        }
        for submission in &dataset.submissions {
            ensure_exists(&homeworks, "submission", &submission.id, "homeworkId", &submission.homework_id)?;
            ensure_exists(&students, "submission", &submission.id, "studentId", &submission.student_id)?;
        }

        let mut progress = HashMap::with_capacity(dataset.lesson_progress.len());
        for record in &dataset.lesson_progress {
            let key = format!("{}/{}", record.student_id, record.lesson_id);
            ensure_exists(&students, "lessonProgress", &key, "studentId", &record.student_id)?;
            ensure_exists(&lessons, "lessonProgress", &key, "lessonId", &record.lesson_id)?;
            if !record.completion_percentage.is_finite()
                || !(0.0..=100.0).contains(&record.completion_percentage)
            {
                return Err(AnalyticsError::computation(
                    "lessonProgress",
                    key,
                    format!("completion percentage {} outside [0, 100]", record.completion_percentage),
                ));
            }
            if progress
                .insert((record.student_id.as_str(), record.lesson_id.as_str()), record)
                .is_some()
            {
                return Err(AnalyticsError::computation("lessonProgress", key, "duplicate progress record"));
            }
        }

        let reviews_by_submission = index_by_parent(&dataset.reviews, |r| r.submission_id.as_str());
        for review in &dataset.reviews {
            ensure_exists(&submissions, "review", &review.submission_id, "submissionId", &review.submission_id)?;
            if let Some(teacher_id) = review.teacher_id.as_deref() {
                ensure_exists(&teachers, "review", &review.submission_id, "teacherId", teacher_id)?;
            }
        }
        for review in &dataset.reviews {
            if reviews_by_submission
                .get(review.submission_id.as_str())
                .is_some_and(|reviews| reviews.len() > 1)
            {
                return Err(AnalyticsError::computation(
                    "submission",
                    review.submission_id.as_str(),
                    "more than one review",
                ));
            }
        }

        let mut courses_by_teacher: HashMap<&str, Vec<&Course>> = HashMap::new();
        for course in &dataset.courses {
            if let Some(teacher_id) = course.instructor_id.as_deref() {
                courses_by_teacher.entry(teacher_id).or_default().push(course);
            }
        }

        let submitted = dataset
            .submissions
            .iter()
            .map(|s| (s.homework_id.as_str(), s.student_id.as_str()))
            .collect();

        let index = Self {
            dataset,
            students,
            teachers,
            courses,
            modules,
            lessons,
            modules_by_course: index_by_parent(&dataset.modules, |m| m.course_id.as_str()),
            lessons_by_module: index_by_parent(&dataset.lessons, |l| l.module_id.as_str()),
            homeworks_by_lesson: index_by_parent(&dataset.homeworks, |h| h.lesson_id.as_str()),
            quizzes_by_lesson: index_by_parent(&dataset.quizzes, |q| q.lesson_id.as_str()),
            submissions_by_homework: index_by_parent(&dataset.submissions, |s| s.homework_id.as_str()),
            reviews_by_submission,
            enrollments_by_student: index_by_parent(&dataset.enrollments, |e| e.student_id.as_str()),
            enrollments_by_course: index_by_parent(&dataset.enrollments, |e| e.course_id.as_str()),
            courses_by_teacher,
            progress,
            submitted,
        };

        tracing::debug!(
            rows = dataset.row_count(),
            courses = index.courses.len(),
            lessons = index.lessons.len(),
            submissions = dataset.submissions.len(),
            "dataset index built"
        );

        Ok(index)
    }

    pub fn student(&self, id: &str) -> Result<&'a Student> {
        self.students
            .get(id)
            .copied()
            .ok_or_else(|| AnalyticsError::computation("student", id, "not present in index"))
    }

    pub fn course(&self, id: &str) -> Result<&'a Course> {
        self.courses
            .get(id)
            .copied()
            .ok_or_else(|| AnalyticsError::computation("course", id, "not present in index"))
    }

    pub fn lesson(&self, id: &str) -> Result<&'a Lesson> {
        self.lessons
            .get(id)
            .copied()
            .ok_or_else(|| AnalyticsError::computation("lesson", id, "not present in index"))
    }

    pub fn instructor_of(&self, course: &Course) -> Option<&'a Teacher> {
        course
            .instructor_id
            .as_deref()
            .and_then(|id| self.teachers.get(id).copied())
    }

    pub fn modules_of(&self, course_id: &str) -> &[&'a Module] {
        self.modules_by_course.get(course_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Lessons of a course in module order, then lesson order.
    pub fn lessons_of(&self, course_id: &str) -> Vec<&'a Lesson> {
        self.modules_of(course_id)
            .iter()
            .flat_map(|module| self.lessons_by_module.get(module.id.as_str()).into_iter().flatten())
            .copied()
            .collect()
    }

    pub fn homeworks_of(&self, course_id: &str) -> Vec<&'a Homework> {
        self.lessons_of(course_id)
            .iter()
            .flat_map(|lesson| self.homeworks_by_lesson.get(lesson.id.as_str()).into_iter().flatten())
            .copied()
            .collect()
    }

    pub fn quiz_count(&self, lessons: &[&Lesson]) -> usize {
        lessons
            .iter()
            .map(|lesson| self.quizzes_by_lesson.get(lesson.id.as_str()).map_or(0, Vec::len))
            .sum()
    }

    pub fn submissions_of(&self, homework_id: &str) -> &[&'a Submission] {
        self.submissions_by_homework
            .get(homework_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn review_of(&self, submission_id: &str) -> Option<&'a Review> {
        self.reviews_by_submission
            .get(submission_id)
            .and_then(|reviews| reviews.first())
            .copied()
    }

    pub fn enrollments_in(&self, course_id: &str) -> &[&'a Enrollment] {
        self.enrollments_by_course
            .get(course_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn courses_taught_by(&self, teacher_id: &str) -> &[&'a Course] {
        self.courses_by_teacher
            .get(teacher_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_submitted(&self, homework_id: &str, student_id: &str) -> bool {
        self.submitted.contains(&(homework_id, student_id))
    }

    pub fn progress_of(&self, student_id: &str, lesson_id: &str) -> Option<&'a LessonProgress> {
        self.progress.get(&(student_id, lesson_id)).copied()
    }

    pub fn course_title_of_lesson(&self, lesson: &Lesson) -> Option<&'a str> {
        let module = self.modules.get(lesson.module_id.as_str())?;
        self.courses.get(module.course_id.as_str()).map(|c| c.title.as_str())
    }
}
