use common::error::{AppError, Res};
use serde_json::Value;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::job::Job;

pub async fn insert_job<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    name: &str,
    payload: Value,
) -> Res<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (name, payload)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(payload)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Claims the oldest pending job, skipping rows other workers hold locked.
/// The claim and the status flip happen in one statement so a crashed worker
/// never leaves a job half-claimed.
pub async fn lock_next_pending_job<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Option<Job>> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET status = 'running', attempts = attempts + 1, updated_at = NOW()
        WHERE id = (
            SELECT id FROM jobs
            WHERE status = 'pending'
            ORDER BY created_at
            FOR UPDATE SKIP LOCKED
            LIMIT 1
        )
        RETURNING *
        "#,
    )
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn mark_job_done<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    job_id: Uuid,
) -> Res<()> {
    sqlx::query("UPDATE jobs SET status = 'done', updated_at = NOW() WHERE id = $1")
        .bind(job_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn mark_job_failed<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    job_id: Uuid,
    error: &str,
) -> Res<()> {
    sqlx::query(
        "UPDATE jobs SET status = 'failed', last_error = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(job_id)
    .bind(error)
    .execute(executor)
    .await?;
    Ok(())
}
