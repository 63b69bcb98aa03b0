//! Small builder for hand-assembled snapshots in tests.

use crate::dataset::Dataset;
use crate::models::{
    Course, Enrollment, Homework, Lesson, LessonProgress, Module, Quiz, Review, ReviewStatus,
    Student, Submission, Teacher,
};

#[derive(Default)]
pub struct Fixture {
    dataset: Dataset,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, id: &str) -> Self {
        self.dataset.students.push(Student {
            id: id.to_string(),
            name: format!("Student {id}"),
            email: format!("{id}@example.edu"),
        });
        self
    }

    pub fn teacher(mut self, id: &str) -> Self {
        self.dataset.teachers.push(Teacher {
            id: id.to_string(),
            name: format!("Teacher {id}"),
            email: Some(format!("{id}@example.edu")),
            specialization: None,
        });
        self
    }

    pub fn course(mut self, id: &str, instructor: Option<&str>) -> Self {
        self.dataset.courses.push(Course {
            id: id.to_string(),
            title: format!("Course {id}"),
            instructor_id: instructor.map(str::to_string),
            status: Some("Published".to_string()),
            difficulty: None,
            description: None,
            category: None,
        });
        self
    }

    pub fn enroll(self, student: &str, course: &str) -> Self {
        self.enroll_with_grade(student, course, None)
    }

    pub fn enroll_with_grade(mut self, student: &str, course: &str, grade: Option<f64>) -> Self {
        let id = format!("e-{}", self.dataset.enrollments.len() + 1);
        self.dataset.enrollments.push(Enrollment {
            id,
            student_id: student.to_string(),
            course_id: course.to_string(),
            status: Some("Active".to_string()),
            grade,
        });
        self
    }

    pub fn module(mut self, id: &str, course: &str) -> Self {
        self.dataset.modules.push(Module {
            id: id.to_string(),
            course_id: course.to_string(),
            title: None,
        });
        self
    }

    pub fn lesson(mut self, id: &str, module: &str) -> Self {
        self.dataset.lessons.push(Lesson {
            id: id.to_string(),
            module_id: module.to_string(),
            title: Some(format!("Lesson {id}")),
        });
        self
    }

    pub fn homework(mut self, id: &str, lesson: &str) -> Self {
        self.dataset.homeworks.push(Homework {
            id: id.to_string(),
            lesson_id: lesson.to_string(),
            title: format!("Homework {id}"),
            due_date: None,
        });
        self
    }

    pub fn quiz(mut self, id: &str, lesson: &str) -> Self {
        self.dataset.quizzes.push(Quiz {
            id: id.to_string(),
            lesson_id: lesson.to_string(),
            title: None,
        });
        self
    }

    pub fn progress(self, student: &str, lesson: &str, completion: f64) -> Self {
        self.progress_with_time(student, lesson, completion, 0.0)
    }

    pub fn progress_with_time(mut self, student: &str, lesson: &str, completion: f64, minutes: f64) -> Self {
        self.dataset.lesson_progress.push(LessonProgress {
            student_id: student.to_string(),
            lesson_id: lesson.to_string(),
            completion_percentage: completion,
            time_spent_minutes: minutes,
        });
        self
    }

    pub fn submit(mut self, id: &str, homework: &str, student: &str) -> Self {
        self.dataset.submissions.push(Submission {
            id: id.to_string(),
            homework_id: homework.to_string(),
            student_id: student.to_string(),
            is_late: false,
        });
        self
    }

    pub fn submit_late(mut self, id: &str, homework: &str, student: &str) -> Self {
        self = self.submit(id, homework, student);
        if let Some(last) = self.dataset.submissions.last_mut() {
            last.is_late = true;
        }
        self
    }

    pub fn review(mut self, submission: &str, grade: Option<f64>, status: ReviewStatus) -> Self {
        self.dataset.reviews.push(Review {
            submission_id: submission.to_string(),
            teacher_id: None,
            grade,
            status,
        });
        self
    }

    pub fn review_by(mut self, submission: &str, teacher: &str, grade: f64) -> Self {
        self.dataset.reviews.push(Review {
            submission_id: submission.to_string(),
            teacher_id: Some(teacher.to_string()),
            grade: Some(grade),
            status: ReviewStatus::Approved,
        });
        self
    }

    pub fn build(self) -> Dataset {
        self.dataset
    }
}

/// Course `c` with two modules of one lesson and one homework each. Student `s`
/// submitted homework 1 only and finished lesson 1 only.
pub fn two_module_course() -> Dataset {
    Fixture::new()
        .student("s")
        .teacher("t")
        .course("c", Some("t"))
        .enroll("s", "c")
        .module("m1", "c")
        .module("m2", "c")
        .lesson("l1", "m1")
        .lesson("l2", "m2")
        .homework("h1", "l1")
        .homework("h2", "l2")
        .submit("sub1", "h1", "s")
        .progress("s", "l1", 100.0)
        .build()
}
