use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::course::{CourseCreateRequest, CourseUpdateRequest},
    models::course::Course,
};

pub async fn get_course_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    course_id: Uuid,
) -> Res<Option<Course>> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// All courses, newest first. Moderator listing.
pub async fn list_courses<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<Course>> {
    sqlx::query_as::<_, Course>(
        "SELECT * FROM courses ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// Courses owned by a single user, newest first. Regular-viewer listing.
pub async fn list_courses_by_owner<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Res<Vec<Course>> {
    sqlx::query_as::<_, Course>(
        "SELECT * FROM courses WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_course<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: CourseCreateRequest,
) -> Res<Course> {
    sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (title, description, preview_url, price, owner_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.title)
    .bind(data.description)
    .bind(data.preview_url)
    .bind(data.price)
    .bind(data.owner_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_course<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    course_id: Uuid,
    data: CourseUpdateRequest,
) -> Res<Course> {
    sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            preview_url = COALESCE($4, preview_url),
            price = COALESCE($5, price),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(course_id)
    .bind(data.title)
    .bind(data.description)
    .bind(data.preview_url)
    .bind(data.price)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_course<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    course_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
