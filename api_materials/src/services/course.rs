use chrono::{NaiveDateTime, TimeDelta, Utc};
use common::error::{AppError, Res};
use db::dtos::course::{CourseCreateRequest, CourseUpdateRequest};
use db::models::course::Course;
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{Action, Resource, Role, authorize};
use crate::dtos::course::{CourseCreateBody, CourseResponse, CourseUpdateBody, ListQuery};
use crate::viewer::Viewer;

/// A course edit older than this triggers a subscriber notification job.
const UPDATE_NOTICE_THRESHOLD_HOURS: i64 = 4;

/// True when enough time has passed since the course's previously recorded
/// update for subscribers to be notified again.
pub fn needs_update_notice(last_updated_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    now - last_updated_at > TimeDelta::hours(UPDATE_NOTICE_THRESHOLD_HOURS)
}

/// Enqueues the notification job. Fire-and-forget: a failed enqueue is
/// logged and never surfaced to the HTTP caller.
pub(crate) async fn maybe_notify_subscribers(pool: &PgPool, course: &Course) {
    if !needs_update_notice(course.updated_at, Utc::now().naive_utc()) {
        return;
    }
    if let Err(error) = notifier::enqueue_course_updated(pool, course.id).await {
        log::warn!(
            "Failed to enqueue update notification for course {}: {}",
            course.id,
            error
        );
    }
}

async fn build_response(pool: &PgPool, viewer: &Viewer, course: Course) -> Res<CourseResponse> {
    let lessons = db::lesson::list_lessons_by_course(pool, course.id).await?;
    let is_subscribed = db::subscription::exists_subscription(pool, viewer.id, course.id).await?;
    Ok(CourseResponse::build(course, lessons, is_subscribed))
}

/// Moderators list every course; regular users only their own.
pub async fn list(pool: &PgPool, viewer: &Viewer, query: &ListQuery) -> Res<Vec<CourseResponse>> {
    authorize(Resource::Course, viewer.role(), true, Action::List)?;

    let courses = match viewer.role() {
        Role::Moderator => db::course::list_courses(pool, query.limit(), query.offset()).await?,
        Role::Regular => {
            db::course::list_courses_by_owner(pool, viewer.id, query.limit(), query.offset())
                .await?
        }
    };

    let mut responses = Vec::with_capacity(courses.len());
    for course in courses {
        responses.push(build_response(pool, viewer, course).await?);
    }
    Ok(responses)
}

pub async fn retrieve(pool: &PgPool, viewer: &Viewer, course_id: Uuid) -> Res<CourseResponse> {
    let course = db::course::get_course_by_id(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    authorize(
        Resource::Course,
        viewer.role(),
        viewer.owns(course.owner_id),
        Action::Retrieve,
    )?;

    build_response(pool, viewer, course).await
}

/// The owner is always the acting viewer; any owner value in the input is
/// ignored.
pub async fn create(
    pool: &PgPool,
    viewer: &Viewer,
    body: CourseCreateBody,
) -> Res<CourseResponse> {
    authorize(Resource::Course, viewer.role(), true, Action::Create)?;

    let course = db::course::insert_course(
        pool,
        CourseCreateRequest {
            title: body.title,
            description: body.description,
            preview_url: body.preview_url,
            price: body.price,
            owner_id: viewer.id,
        },
    )
    .await?;

    build_response(pool, viewer, course).await
}

pub async fn update(
    pool: &PgPool,
    viewer: &Viewer,
    course_id: Uuid,
    body: CourseUpdateBody,
) -> Res<CourseResponse> {
    let existing = db::course::get_course_by_id(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    authorize(
        Resource::Course,
        viewer.role(),
        viewer.owns(existing.owner_id),
        Action::Update,
    )?;

    let course = db::course::update_course(
        pool,
        course_id,
        CourseUpdateRequest {
            title: body.title,
            description: body.description,
            preview_url: body.preview_url,
            price: body.price,
        },
    )
    .await?;

    // threshold is measured against the pre-update timestamp
    maybe_notify_subscribers(pool, &existing).await;

    build_response(pool, viewer, course).await
}

pub async fn destroy(pool: &PgPool, viewer: &Viewer, course_id: Uuid) -> Res<()> {
    let course = db::course::get_course_by_id(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    authorize(
        Resource::Course,
        viewer.role(),
        viewer.owns(course.owner_id),
        Action::Destroy,
    )?;

    db::course::delete_course(pool, course_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn stale_course_triggers_notice() {
        assert!(needs_update_notice(at(8, 0), at(12, 1)));
    }

    #[test]
    fn recent_update_stays_quiet() {
        assert!(!needs_update_notice(at(8, 0), at(11, 59)));
        // exactly at the threshold is still quiet
        assert!(!needs_update_notice(at(8, 0), at(12, 0)));
    }

    #[tokio::test]
    async fn moderator_lists_all_courses_regular_only_own() {
        use crate::test_support::{seed_course, seed_moderator, seed_user, test_pool};

        let Some(pool) = test_pool().await else { return };
        let owner_a = seed_user(&pool).await;
        let owner_b = seed_user(&pool).await;
        let course_a = seed_course(&pool, owner_a).await;
        let course_b = seed_course(&pool, owner_b).await;

        let query = ListQuery {
            limit: Some(100),
            offset: None,
        };

        let regular = Viewer {
            id: owner_a,
            is_moderator: false,
        };
        let listed = list(&pool, &regular, &query).await.unwrap();
        assert!(listed.iter().all(|c| c.owner_id == owner_a));
        assert!(listed.iter().any(|c| c.id == course_a));
        assert!(listed.iter().all(|c| c.id != course_b));

        let moderator = Viewer {
            id: seed_moderator(&pool).await,
            is_moderator: true,
        };
        let listed = list(&pool, &moderator, &query).await.unwrap();
        assert!(listed.iter().any(|c| c.id == course_a));
        assert!(listed.iter().any(|c| c.id == course_b));
    }
}
