use anyhow::Context;
use sqlx::{PgPool, Row};

use crate::dataset::Dataset;
use crate::models::{
    Course, Enrollment, Homework, Lesson, LessonProgress, Module, Quiz, Review, ReviewStatus,
    Student, Submission, Teacher,
};
use crate::sample::sample_dataset;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Inserts the built-in demo snapshot. Existing rows are left untouched.
pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let dataset = sample_dataset();

    for student in &dataset.students {
        sqlx::query(
            r#"
            INSERT INTO coursework.students (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.email)
        .execute(pool)
        .await?;
    }

    for teacher in &dataset.teachers {
        sqlx::query(
            r#"
            INSERT INTO coursework.teachers (id, full_name, email, specialization)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&teacher.id)
        .bind(&teacher.name)
        .bind(&teacher.email)
        .bind(&teacher.specialization)
        .execute(pool)
        .await?;
    }

    for course in &dataset.courses {
        sqlx::query(
            r#"
            INSERT INTO coursework.courses
            (id, title, instructor_id, status, difficulty_level, description, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.instructor_id)
        .bind(&course.status)
        .bind(&course.difficulty)
        .bind(&course.description)
        .bind(&course.category)
        .execute(pool)
        .await?;
    }

    for enrollment in &dataset.enrollments {
        sqlx::query(
            r#"
            INSERT INTO coursework.course_enrollments (id, student_id, course_id, status, grade)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&enrollment.id)
        .bind(&enrollment.student_id)
        .bind(&enrollment.course_id)
        .bind(&enrollment.status)
        .bind(enrollment.grade)
        .execute(pool)
        .await?;
    }

    for (position, module) in dataset.modules.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO coursework.modules (id, course_id, title, position)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&module.id)
        .bind(&module.course_id)
        .bind(&module.title)
        .bind(position as i32)
        .execute(pool)
        .await?;
    }

    for (position, lesson) in dataset.lessons.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO coursework.lessons (id, module_id, title, position)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&lesson.id)
        .bind(&lesson.module_id)
        .bind(&lesson.title)
        .bind(position as i32)
        .execute(pool)
        .await?;
    }

    for progress in &dataset.lesson_progress {
        sqlx::query(
            r#"
            INSERT INTO coursework.lesson_progress
            (student_id, lesson_id, completion_percentage, time_spent_minutes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_id, lesson_id) DO NOTHING
            "#,
        )
        .bind(&progress.student_id)
        .bind(&progress.lesson_id)
        .bind(progress.completion_percentage)
        .bind(progress.time_spent_minutes)
        .execute(pool)
        .await?;
    }

    for homework in &dataset.homeworks {
        sqlx::query(
            r#"
            INSERT INTO coursework.homeworks (id, lesson_id, title, due_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&homework.id)
        .bind(&homework.lesson_id)
        .bind(&homework.title)
        .bind(homework.due_date)
        .execute(pool)
        .await?;
    }

    for quiz in &dataset.quizzes {
        sqlx::query(
            r#"
            INSERT INTO coursework.quizzes (id, lesson_id, title)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&quiz.id)
        .bind(&quiz.lesson_id)
        .bind(&quiz.title)
        .execute(pool)
        .await?;
    }

    for submission in &dataset.submissions {
        sqlx::query(
            r#"
            INSERT INTO coursework.homework_submissions (id, homework_id, student_id, is_late)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&submission.id)
        .bind(&submission.homework_id)
        .bind(&submission.student_id)
        .bind(submission.is_late)
        .execute(pool)
        .await?;
    }

    for review in &dataset.reviews {
        sqlx::query(
            r#"
            INSERT INTO coursework.homework_reviews (submission_id, teacher_id, grade, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (submission_id) DO NOTHING
            "#,
        )
        .bind(&review.submission_id)
        .bind(&review.teacher_id)
        .bind(review.grade)
        .bind(review.status.as_str())
        .execute(pool)
        .await?;
    }

    tracing::info!(rows = dataset.row_count(), "seed data inserted");
    Ok(())
}

/// Loads every table into an in-memory snapshot. One query per table.
pub async fn fetch_dataset(pool: &PgPool) -> anyhow::Result<Dataset> {
    let students = sqlx::query("SELECT id, full_name, email FROM coursework.students ORDER BY id")
        .fetch_all(pool)
        .await
        .context("failed to load students")?
        .into_iter()
        .map(|row| Student {
            id: row.get("id"),
            name: row.get("full_name"),
            email: row.get("email"),
        })
        .collect();

    let teachers = sqlx::query(
        "SELECT id, full_name, email, specialization FROM coursework.teachers ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load teachers")?
    .into_iter()
    .map(|row| Teacher {
        id: row.get("id"),
        name: row.get("full_name"),
        email: row.get("email"),
        specialization: row.get("specialization"),
    })
    .collect();

    let courses = sqlx::query(
        "SELECT id, title, instructor_id, status, difficulty_level, description, category \
         FROM coursework.courses ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load courses")?
    .into_iter()
    .map(|row| Course {
        id: row.get("id"),
        title: row.get("title"),
        instructor_id: row.get("instructor_id"),
        status: row.get("status"),
        difficulty: row.get("difficulty_level"),
        description: row.get("description"),
        category: row.get("category"),
    })
    .collect();

    let enrollments = sqlx::query(
        "SELECT id, student_id, course_id, status, grade \
         FROM coursework.course_enrollments ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load enrollments")?
    .into_iter()
    .map(|row| Enrollment {
        id: row.get("id"),
        student_id: row.get("student_id"),
        course_id: row.get("course_id"),
        status: row.get("status"),
        grade: row.get("grade"),
    })
    .collect();

    let modules = sqlx::query(
        "SELECT id, course_id, title FROM coursework.modules ORDER BY position, id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load modules")?
    .into_iter()
    .map(|row| Module {
        id: row.get("id"),
        course_id: row.get("course_id"),
        title: row.get("title"),
    })
    .collect();

    let lessons = sqlx::query(
        "SELECT id, module_id, title FROM coursework.lessons ORDER BY position, id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load lessons")?
    .into_iter()
    .map(|row| Lesson {
        id: row.get("id"),
        module_id: row.get("module_id"),
        title: row.get("title"),
    })
    .collect();

    let lesson_progress = sqlx::query(
        "SELECT student_id, lesson_id, completion_percentage, time_spent_minutes \
         FROM coursework.lesson_progress ORDER BY student_id, lesson_id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load lesson progress")?
    .into_iter()
    .map(|row| LessonProgress {
        student_id: row.get("student_id"),
        lesson_id: row.get("lesson_id"),
        completion_percentage: row.get("completion_percentage"),
        time_spent_minutes: row.get("time_spent_minutes"),
    })
    .collect();

    let homeworks = sqlx::query(
        "SELECT id, lesson_id, title, due_date FROM coursework.homeworks ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load homeworks")?
    .into_iter()
    .map(|row| Homework {
        id: row.get("id"),
        lesson_id: row.get("lesson_id"),
        title: row.get("title"),
        due_date: row.get("due_date"),
    })
    .collect();

    let quizzes = sqlx::query("SELECT id, lesson_id, title FROM coursework.quizzes ORDER BY id")
        .fetch_all(pool)
        .await
        .context("failed to load quizzes")?
        .into_iter()
        .map(|row| Quiz {
            id: row.get("id"),
            lesson_id: row.get("lesson_id"),
            title: row.get("title"),
        })
        .collect();

    let submissions = sqlx::query(
        "SELECT id, homework_id, student_id, is_late \
         FROM coursework.homework_submissions ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load submissions")?
    .into_iter()
    .map(|row| Submission {
        id: row.get("id"),
        homework_id: row.get("homework_id"),
        student_id: row.get("student_id"),
        is_late: row.get("is_late"),
    })
    .collect();

    let mut reviews = Vec::new();
    for row in sqlx::query(
        "SELECT submission_id, teacher_id, grade, status \
         FROM coursework.homework_reviews ORDER BY submission_id",
    )
    .fetch_all(pool)
    .await
    .context("failed to load reviews")?
    {
        let status: String = row.get("status");
        let status: ReviewStatus = status.parse().map_err(anyhow::Error::msg)?;
        reviews.push(Review {
            submission_id: row.get("submission_id"),
            teacher_id: row.get("teacher_id"),
            grade: row.get("grade"),
            status,
        });
    }

    let dataset = Dataset {
        students,
        teachers,
        courses,
        enrollments,
        modules,
        lessons,
        lesson_progress,
        homeworks,
        quizzes,
        submissions,
        reviews,
    };
    tracing::info!(rows = dataset.row_count(), "snapshot loaded from Postgres");
    Ok(dataset)
}
