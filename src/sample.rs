//! Built-in demo snapshot used by `--sample` and the `seed` command.

use chrono::NaiveDate;

use crate::dataset::Dataset;
use crate::models::{
    Course, Enrollment, Homework, Lesson, LessonProgress, Module, Quiz, Review, ReviewStatus,
    Student, Submission, Teacher,
};

fn student(id: &str, name: &str, email: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    }
}

fn teacher(id: &str, name: &str, email: &str, specialization: &str) -> Teacher {
    Teacher {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(email.to_string()),
        specialization: Some(specialization.to_string()),
    }
}

fn course(id: &str, title: &str, instructor: &str, status: &str, difficulty: &str) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        instructor_id: Some(instructor.to_string()),
        status: Some(status.to_string()),
        difficulty: Some(difficulty.to_string()),
        description: Some(format!("{title} for working engineers")),
        category: Some("Programming".to_string()),
    }
}

fn enrollment(id: &str, student_id: &str, course_id: &str, status: &str, grade: Option<f64>) -> Enrollment {
    Enrollment {
        id: id.to_string(),
        student_id: student_id.to_string(),
        course_id: course_id.to_string(),
        status: Some(status.to_string()),
        grade,
    }
}

fn module(id: &str, course_id: &str, title: &str) -> Module {
    Module {
        id: id.to_string(),
        course_id: course_id.to_string(),
        title: Some(title.to_string()),
    }
}

fn lesson(id: &str, module_id: &str, title: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        module_id: module_id.to_string(),
        title: Some(title.to_string()),
    }
}

fn progress(student_id: &str, lesson_id: &str, completion: f64, minutes: f64) -> LessonProgress {
    LessonProgress {
        student_id: student_id.to_string(),
        lesson_id: lesson_id.to_string(),
        completion_percentage: completion,
        time_spent_minutes: minutes,
    }
}

fn homework(id: &str, lesson_id: &str, title: &str, due: (i32, u32, u32)) -> Homework {
    Homework {
        id: id.to_string(),
        lesson_id: lesson_id.to_string(),
        title: title.to_string(),
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
    }
}

fn quiz(id: &str, lesson_id: &str) -> Quiz {
    Quiz {
        id: id.to_string(),
        lesson_id: lesson_id.to_string(),
        title: None,
    }
}

fn submission(id: &str, homework_id: &str, student_id: &str, is_late: bool) -> Submission {
    Submission {
        id: id.to_string(),
        homework_id: homework_id.to_string(),
        student_id: student_id.to_string(),
        is_late,
    }
}

fn review(submission_id: &str, teacher_id: &str, grade: f64, status: ReviewStatus) -> Review {
    Review {
        submission_id: submission_id.to_string(),
        teacher_id: Some(teacher_id.to_string()),
        grade: Some(grade),
        status,
    }
}

pub fn sample_dataset() -> Dataset {
    Dataset {
        students: vec![
            student("s-avery", "Avery Lee", "avery.lee@example.edu"),
            student("s-jules", "Jules Moreno", "jules.moreno@example.edu"),
            student("s-kiara", "Kiara Patel", "kiara.patel@example.edu"),
        ],
        teachers: vec![
            teacher("t-ada", "Ada Byron", "ada.byron@example.edu", "Systems"),
            teacher("t-linus", "Linus Park", "linus.park@example.edu", "Concurrency"),
            teacher("t-grace", "Grace Hopper", "grace.hopper@example.edu", "Compilers"),
        ],
        courses: vec![
            course("c-rust", "Rust Fundamentals", "t-ada", "Published", "Beginner"),
            course("c-sql", "Relational Modeling", "t-ada", "Published", "Intermediate"),
            course("c-async", "Async Services", "t-linus", "Draft", "Advanced"),
        ],
        enrollments: vec![
            enrollment("e-1", "s-avery", "c-rust", "Active", Some(88.0)),
            enrollment("e-2", "s-jules", "c-rust", "Active", None),
            enrollment("e-3", "s-avery", "c-sql", "Completed", Some(92.0)),
            enrollment("e-4", "s-kiara", "c-async", "Active", None),
            enrollment("e-5", "s-kiara", "c-rust", "Dropped", Some(55.0)),
        ],
        modules: vec![
            module("m-own", "c-rust", "Ownership"),
            module("m-trait", "c-rust", "Traits"),
            module("m-sql", "c-sql", "Normal forms"),
            module("m-async", "c-async", "Futures"),
        ],
        lessons: vec![
            lesson("l-own-1", "m-own", "Moves and copies"),
            lesson("l-own-2", "m-own", "Borrowing"),
            lesson("l-trait-1", "m-trait", "Trait objects"),
            lesson("l-sql-1", "m-sql", "Third normal form"),
            lesson("l-async-1", "m-async", "Pinning"),
        ],
        lesson_progress: vec![
            progress("s-avery", "l-own-1", 100.0, 45.0),
            progress("s-avery", "l-own-2", 100.0, 30.0),
            progress("s-avery", "l-trait-1", 100.0, 50.0),
            progress("s-avery", "l-sql-1", 100.0, 40.0),
            progress("s-jules", "l-own-1", 100.0, 20.0),
            progress("s-jules", "l-own-2", 60.0, 15.0),
            progress("s-kiara", "l-async-1", 99.0, 70.0),
        ],
        homeworks: vec![
            homework("h-own-1", "l-own-1", "Move semantics drill", (2026, 2, 2)),
            homework("h-own-2", "l-own-2", "Borrow checker puzzles", (2026, 2, 9)),
            homework("h-trait", "l-trait-1", "Plugin registry", (2026, 2, 16)),
            homework("h-sql", "l-sql-1", "Schema review", (2026, 2, 4)),
            homework("h-async", "l-async-1", "Rate limiter", (2026, 3, 1)),
        ],
        quizzes: vec![quiz("q-own", "l-own-1"), quiz("q-trait", "l-trait-1")],
        submissions: vec![
            submission("sub-1", "h-own-1", "s-avery", false),
            submission("sub-2", "h-own-2", "s-avery", true),
            submission("sub-3", "h-trait", "s-avery", false),
            submission("sub-4", "h-own-1", "s-jules", false),
            submission("sub-5", "h-sql", "s-avery", false),
            submission("sub-6", "h-async", "s-kiara", true),
        ],
        reviews: vec![
            review("sub-1", "t-ada", 91.0, ReviewStatus::Approved),
            review("sub-2", "t-ada", 64.0, ReviewStatus::Rejected),
            review("sub-4", "t-ada", 70.0, ReviewStatus::Approved),
            review("sub-5", "t-ada", 85.0, ReviewStatus::Approved),
        ],
    }
}
