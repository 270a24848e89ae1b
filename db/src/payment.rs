use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::payment::{PaymentCreateRequest, PaymentFilter},
    models::payment::Payment,
};

pub async fn get_payment_by_session_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    session_id: &str,
) -> Res<Option<Payment>> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE session_id = $1")
        .bind(session_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_payments_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    filter: PaymentFilter,
) -> Res<Vec<Payment>> {
    // the direction cannot be bound as a parameter; both variants are static
    let query = if filter.newest_first {
        r#"
        SELECT * FROM payments
        WHERE user_id = $1
          AND ($2::uuid IS NULL OR course_id = $2)
          AND ($3::uuid IS NULL OR lesson_id = $3)
          AND ($4::text IS NULL OR method = $4)
        ORDER BY created_at DESC
        LIMIT $5 OFFSET $6
        "#
    } else {
        r#"
        SELECT * FROM payments
        WHERE user_id = $1
          AND ($2::uuid IS NULL OR course_id = $2)
          AND ($3::uuid IS NULL OR lesson_id = $3)
          AND ($4::text IS NULL OR method = $4)
        ORDER BY created_at ASC
        LIMIT $5 OFFSET $6
        "#
    };

    sqlx::query_as::<_, Payment>(query)
        .bind(user_id)
        .bind(filter.course_id)
        .bind(filter.lesson_id)
        .bind(filter.method)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_payments_by_user_brief<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Vec<Payment>> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_payment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PaymentCreateRequest,
) -> Res<Payment> {
    sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments
            (user_id, course_id, lesson_id, amount, method, session_id, payment_url, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(data.course_id)
    .bind(data.lesson_id)
    .bind(data.amount)
    .bind(data.method)
    .bind(data.session_id)
    .bind(data.payment_url)
    .bind(data.status)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Marks a payment paid. Guarded on `is_paid = FALSE` so the transition is
/// monotonic: re-running it for an already-paid session touches no rows.
pub async fn mark_payment_paid<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    session_id: &str,
) -> Res<bool> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET is_paid = TRUE, status = 'paid'
        WHERE session_id = $1 AND is_paid = FALSE
        "#,
    )
    .bind(session_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
