use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::lesson::{LessonCreateRequest, LessonUpdateRequest},
    models::lesson::Lesson,
};

pub async fn get_lesson_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lesson_id: Uuid,
) -> Res<Option<Lesson>> {
    sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = $1")
        .bind(lesson_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_lessons<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<Lesson>> {
    sqlx::query_as::<_, Lesson>(
        "SELECT * FROM lessons ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_lessons_by_owner<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Res<Vec<Lesson>> {
    sqlx::query_as::<_, Lesson>(
        "SELECT * FROM lessons WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_lessons_by_course<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    course_id: Uuid,
) -> Res<Vec<Lesson>> {
    sqlx::query_as::<_, Lesson>(
        "SELECT * FROM lessons WHERE course_id = $1 ORDER BY created_at",
    )
    .bind(course_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_lesson<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: LessonCreateRequest,
) -> Res<Lesson> {
    sqlx::query_as::<_, Lesson>(
        r#"
        INSERT INTO lessons (title, description, preview_url, video_url, course_id, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(data.title)
    .bind(data.description)
    .bind(data.preview_url)
    .bind(data.video_url)
    .bind(data.course_id)
    .bind(data.owner_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_lesson<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lesson_id: Uuid,
    data: LessonUpdateRequest,
) -> Res<Lesson> {
    sqlx::query_as::<_, Lesson>(
        r#"
        UPDATE lessons SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            preview_url = COALESCE($4, preview_url),
            video_url = COALESCE($5, video_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(lesson_id)
    .bind(data.title)
    .bind(data.description)
    .bind(data.preview_url)
    .bind(data.video_url)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_lesson<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lesson_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
        .bind(lesson_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
