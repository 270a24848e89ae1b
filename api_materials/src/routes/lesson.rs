use actix_web::{Responder, delete, get, patch, post, web};
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::course::ListQuery;
use crate::dtos::lesson::{LessonCreateBody, LessonUpdateBody};
use crate::services;
use crate::viewer::load_viewer;

/// Lists lessons: all of them for moderators, own lessons otherwise.
#[get("")]
async fn get_lessons(
    claims: web::ReqData<JwtClaims>,
    query: web::Query<ListQuery>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let lessons = services::lesson::list(pg_pool, &viewer, &query).await?;
    Success::ok(lessons)
}

/// Creates a lesson inside a course the authenticated user owns.
/// The video URL must point at an allow-listed domain; violations return
/// 400 and nothing is written.
#[post("")]
async fn post_lesson(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<LessonCreateBody>,
    pool: web::Data<Arc<sqlx::PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let lesson =
        services::lesson::create(pg_pool, &viewer, &config, body.into_inner()).await?;
    Success::created(lesson)
}

/// Retrieves a single lesson. Foreign lessons return 403 for
/// non-moderators (unlike courses, which hide as 404).
#[get("/{id}")]
async fn get_lesson(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let lesson = services::lesson::retrieve(pg_pool, &viewer, path.into_inner()).await?;
    Success::ok(lesson)
}

/// Partially updates a lesson (owner or moderator only).
#[patch("/{id}")]
async fn patch_lesson(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    body: web::Json<LessonUpdateBody>,
    pool: web::Data<Arc<sqlx::PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let lesson = services::lesson::update(
        pg_pool,
        &viewer,
        &config,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Success::ok(lesson)
}

/// Deletes an owned lesson. Moderators cannot delete lessons.
#[delete("/{id}")]
async fn delete_lesson(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    services::lesson::destroy(pg_pool, &viewer, path.into_inner()).await?;
    Success::no_content()
}
