use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::subscription::Subscription;

pub async fn get_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    course_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE user_id = $1 AND course_id = $2",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn exists_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    course_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Inserts a subscription row. Races on the (user, course) unique
/// constraint surface as a database error the caller maps to a conflict.
pub async fn insert_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    course_id: Uuid,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (user_id, course_id)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    course_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND course_id = $2")
        .bind(user_id)
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Emails of users subscribed to a course, for the update notification job.
/// Loaded at job execution time, not at enqueue time.
pub async fn list_subscriber_emails<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    course_id: Uuid,
) -> Res<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.email
        FROM subscriptions s
        JOIN users u ON u.id = s.user_id
        WHERE s.course_id = $1
        ORDER BY u.email
        "#,
    )
    .bind(course_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
