use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::RepositoryError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};

pub async fn list_courses(conn: &mut SqliteConnection) -> Result<Vec<Course>, RepositoryError> {
    let courses = sqlx::query_as::<_, Course>(
        "SELECT id, title, description FROM courses ORDER BY id"
    )
    .fetch_all(conn)
    .await?;

    Ok(courses)
}

pub async fn find_course(conn: &mut SqliteConnection, id: i64) -> Result<Course, RepositoryError> {
    sqlx::query_as::<_, Course>(
        "SELECT id, title, description FROM courses WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Inserts a course. A title already in use is `DuplicateTitle` and adds no row.
pub async fn insert_course(
    conn: &mut SqliteConnection,
    req: NewCourseRequest,
) -> Result<Course, RepositoryError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (title, description)
        VALUES (?1, ?2)
        RETURNING id, title, description
        "#
    )
    .bind(&req.title)
    .bind(&req.description)
    .fetch_one(conn)
    .await?;

    debug!("inserted course {} ({})", course.id, course.title);
    Ok(course)
}

/// Applies the supplied fields to `current` and persists it. The unique index
/// on `title` is checked again on save, so a clash leaves the row untouched.
pub async fn update_course(
    conn: &mut SqliteConnection,
    mut current: Course,
    req: UpdateCourseRequest,
) -> Result<Course, RepositoryError> {
    current.apply(req);

    let result = sqlx::query(
        r#"
        UPDATE courses
        SET title = ?1,
            description = ?2
        WHERE id = ?3
        "#
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(current.id)
    .execute(conn)
    .await?
    .rows_affected();

    if result == 0 {
        return Err(RepositoryError::Unchanged);
    }

    debug!("updated course {}", current.id);
    Ok(current)
}

pub async fn delete_course(conn: &mut SqliteConnection, course: &Course) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(course.id)
        .execute(conn)
        .await?
        .rows_affected();

    if result == 0 {
        return Err(RepositoryError::Unchanged);
    }

    debug!("deleted course {}", course.id);
    Ok(())
}
