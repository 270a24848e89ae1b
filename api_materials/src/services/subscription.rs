use common::error::{AppError, Res};
use sqlx::PgPool;
use uuid::Uuid;

use crate::viewer::Viewer;

/// Creates the subscription when absent and removes it when present,
/// returning the resulting state.
///
/// The database unique constraint on (user, course) is the final arbiter:
/// when two toggles race on the create path, the loser's insert fails with
/// a unique violation which surfaces as 409 instead of a second row.
pub async fn toggle(pool: &PgPool, viewer: &Viewer, course_id: Uuid) -> Res<bool> {
    db::course::get_course_by_id(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let removed = db::subscription::delete_subscription(pool, viewer.id, course_id).await?;
    if removed {
        return Ok(false);
    }

    match db::subscription::insert_subscription(pool, viewer.id, course_id).await {
        Ok(_) => Ok(true),
        Err(error) if error.is_unique_violation() => Err(AppError::Conflict(
            "Already subscribed to this course".to_string(),
        )),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_course, seed_user, test_pool};
    use sqlx::PgPool;

    async fn subscription_count(pool: &PgPool, user_id: Uuid, course_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
        .expect("count subscriptions")
    }

    #[tokio::test]
    async fn toggle_twice_returns_to_original_state() {
        let Some(pool) = test_pool().await else { return };
        let user = seed_user(&pool).await;
        let course = seed_course(&pool, user).await;
        let viewer = Viewer {
            id: user,
            is_moderator: false,
        };

        assert!(toggle(&pool, &viewer, course).await.unwrap());
        assert_eq!(subscription_count(&pool, user, course).await, 1);

        assert!(!toggle(&pool, &viewer, course).await.unwrap());
        assert_eq!(subscription_count(&pool, user, course).await, 0);
    }

    #[tokio::test]
    async fn concurrent_toggles_never_yield_two_rows() {
        let Some(pool) = test_pool().await else { return };
        let user = seed_user(&pool).await;
        let course = seed_course(&pool, user).await;
        let viewer = Viewer {
            id: user,
            is_moderator: false,
        };

        let (a, b) = tokio::join!(
            toggle(&pool, &viewer, course),
            toggle(&pool, &viewer, course),
        );
        // a losing insert surfaces as Conflict, never as a second row
        for outcome in [a, b] {
            if let Err(error) = outcome {
                assert!(matches!(error, AppError::Conflict(_)));
            }
        }
        assert!(subscription_count(&pool, user, course).await <= 1);
    }

    #[tokio::test]
    async fn duplicate_insert_reports_unique_violation() {
        let Some(pool) = test_pool().await else { return };
        let user = seed_user(&pool).await;
        let course = seed_course(&pool, user).await;

        db::subscription::insert_subscription(&*pool, user, course)
            .await
            .unwrap();
        let error = db::subscription::insert_subscription(&*pool, user, course)
            .await
            .unwrap_err();

        assert!(error.is_unique_violation());
        assert_eq!(subscription_count(&pool, user, course).await, 1);
    }
}
