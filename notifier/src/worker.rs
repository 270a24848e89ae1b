use std::sync::Arc;
use std::time::Duration;

use common::error::{AppError, Res};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::mailer::Mailer;
use crate::{JOB_COURSE_UPDATED, compose_course_updated};

/// How long the worker sleeps when no pending job was found.
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct CourseUpdatedPayload {
    course_id: Uuid,
}

/// Background worker loop. Claims one pending job at a time and never
/// returns; run it on a dedicated task.
pub async fn run(pool: Arc<PgPool>, mailer: Arc<dyn Mailer>) {
    log::info!("Notification worker started");
    loop {
        match db::job::lock_next_pending_job(&*pool).await {
            Ok(Some(job)) => {
                let job_id = job.id;
                match execute(&pool, mailer.as_ref(), &job.name, &job.payload).await {
                    Ok(()) => {
                        if let Err(error) = db::job::mark_job_done(&*pool, job_id).await {
                            log::error!("Failed to mark job {} done: {}", job_id, error);
                        }
                    }
                    Err(error) => {
                        log::warn!("Job {} ({}) failed: {}", job_id, job.name, error);
                        if let Err(error) =
                            db::job::mark_job_failed(&*pool, job_id, &error.to_string()).await
                        {
                            log::error!("Failed to mark job {} failed: {}", job_id, error);
                        }
                    }
                }
            }
            Ok(None) => tokio::time::sleep(IDLE_POLL_INTERVAL).await,
            Err(error) => {
                log::error!("Failed to poll for pending jobs: {}", error);
                tokio::time::sleep(IDLE_POLL_INTERVAL).await;
            }
        }
    }
}

async fn execute(
    pool: &PgPool,
    mailer: &dyn Mailer,
    name: &str,
    payload: &serde_json::Value,
) -> Res<()> {
    match name {
        JOB_COURSE_UPDATED => {
            let payload: CourseUpdatedPayload = serde_json::from_value(payload.clone())
                .map_err(|e| AppError::Internal(format!("Malformed job payload: {}", e)))?;
            notify_course_updated(pool, mailer, payload.course_id).await
        }
        other => Err(AppError::Internal(format!("Unknown job name: {}", other))),
    }
}

/// Recipients are resolved when the job runs, so users who unsubscribed
/// after the edit receive nothing. A course deleted in the meantime, or one
/// with no subscribers, makes the job a successful no-op.
async fn notify_course_updated(pool: &PgPool, mailer: &dyn Mailer, course_id: Uuid) -> Res<()> {
    let Some(course) = db::course::get_course_by_id(pool, course_id).await? else {
        log::info!("Course {} vanished before notification; skipping", course_id);
        return Ok(());
    };

    let recipients = db::subscription::list_subscriber_emails(pool, course_id).await?;
    if recipients.is_empty() {
        return Ok(());
    }

    let (subject, body) = compose_course_updated(&course.title);
    mailer.send(&recipients, &subject, &body).await?;
    log::info!(
        "Notified {} subscriber(s) about course {}",
        recipients.len(),
        course_id
    );
    Ok(())
}
