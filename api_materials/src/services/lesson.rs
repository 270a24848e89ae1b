use common::env_config::Config;
use common::error::{AppError, Res};
use db::dtos::lesson::{LessonCreateRequest, LessonUpdateRequest};
use db::models::lesson::Lesson;
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{Action, Resource, Role, authorize};
use crate::dtos::course::ListQuery;
use crate::dtos::lesson::{LessonCreateBody, LessonUpdateBody};
use crate::validators::validate_video_url;
use crate::viewer::Viewer;

pub async fn list(pool: &PgPool, viewer: &Viewer, query: &ListQuery) -> Res<Vec<Lesson>> {
    authorize(Resource::Lesson, viewer.role(), true, Action::List)?;

    match viewer.role() {
        Role::Moderator => db::lesson::list_lessons(pool, query.limit(), query.offset()).await,
        Role::Regular => {
            db::lesson::list_lessons_by_owner(pool, viewer.id, query.limit(), query.offset()).await
        }
    }
}

pub async fn retrieve(pool: &PgPool, viewer: &Viewer, lesson_id: Uuid) -> Res<Lesson> {
    let lesson = db::lesson::get_lesson_by_id(pool, lesson_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    authorize(
        Resource::Lesson,
        viewer.role(),
        viewer.owns(lesson.owner_id),
        Action::Retrieve,
    )?;

    Ok(lesson)
}

/// Validation failures (bad video domain, foreign or missing course) are
/// detected before any write; no lesson row is created in those branches.
pub async fn create(
    pool: &PgPool,
    viewer: &Viewer,
    config: &Config,
    body: LessonCreateBody,
) -> Res<Lesson> {
    authorize(Resource::Lesson, viewer.role(), true, Action::Create)?;
    validate_video_url(&body.video_url, &config.allowed_video_domains)?;

    let course = db::course::get_course_by_id(pool, body.course_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown course".to_string()))?;
    if course.owner_id != viewer.id {
        return Err(AppError::BadRequest("You don't own this course".to_string()));
    }

    db::lesson::insert_lesson(
        pool,
        LessonCreateRequest {
            title: body.title,
            description: body.description,
            preview_url: body.preview_url,
            video_url: body.video_url,
            course_id: body.course_id,
            owner_id: viewer.id,
        },
    )
    .await
}

pub async fn update(
    pool: &PgPool,
    viewer: &Viewer,
    config: &Config,
    lesson_id: Uuid,
    body: LessonUpdateBody,
) -> Res<Lesson> {
    let existing = db::lesson::get_lesson_by_id(pool, lesson_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    authorize(
        Resource::Lesson,
        viewer.role(),
        viewer.owns(existing.owner_id),
        Action::Update,
    )?;

    if let Some(video_url) = body.video_url.as_deref() {
        validate_video_url(video_url, &config.allowed_video_domains)?;
    }

    let lesson = db::lesson::update_lesson(
        pool,
        lesson_id,
        LessonUpdateRequest {
            title: body.title,
            description: body.description,
            preview_url: body.preview_url,
            video_url: body.video_url,
        },
    )
    .await?;

    // a lesson edit counts as an update of its parent course
    if let Some(course) = db::course::get_course_by_id(pool, lesson.course_id).await? {
        super::course::maybe_notify_subscribers(pool, &course).await;
    }

    Ok(lesson)
}

pub async fn destroy(pool: &PgPool, viewer: &Viewer, lesson_id: Uuid) -> Res<()> {
    let lesson = db::lesson::get_lesson_by_id(pool, lesson_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    authorize(
        Resource::Lesson,
        viewer.role(),
        viewer.owns(lesson.owner_id),
        Action::Destroy,
    )?;

    db::lesson::delete_lesson(pool, lesson_id).await?;
    Ok(())
}
