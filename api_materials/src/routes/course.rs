use actix_web::{Responder, delete, get, patch, post, web};
use common::error::Res;
use common::http::Success;
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::course::{
    CourseCreateBody, CourseUpdateBody, ListQuery, SubscriptionToggleResponse,
};
use crate::services;
use crate::viewer::load_viewer;

/// Lists courses visible to the authenticated user.
///
/// Moderators receive every course; regular users only the courses they
/// own. Supports `limit`/`offset` pagination.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/courses?limit=10&offset=0', {
///   headers: {
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   }
/// });
///
/// if (response.ok) {
///   const courses = await response.json();
///   // Each course carries lessons, lessons_count and is_subscribed
///   console.log(courses);
/// }
/// ```
#[get("")]
async fn get_courses(
    claims: web::ReqData<JwtClaims>,
    query: web::Query<ListQuery>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let courses = services::course::list(pg_pool, &viewer, &query).await?;
    Success::ok(courses)
}

/// Creates a course owned by the authenticated user. Moderators are not
/// allowed to create courses.
#[post("")]
async fn post_course(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<CourseCreateBody>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let course = services::course::create(pg_pool, &viewer, body.into_inner()).await?;
    Success::created(course)
}

/// Retrieves a single course. Foreign courses are reported as absent (404)
/// to non-moderators.
#[get("/{id}")]
async fn get_course(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let course = services::course::retrieve(pg_pool, &viewer, path.into_inner()).await?;
    Success::ok(course)
}

/// Partially updates a course (owner or moderator only). A successful edit
/// may enqueue the subscriber notification job.
#[patch("/{id}")]
async fn patch_course(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    body: web::Json<CourseUpdateBody>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let course =
        services::course::update(pg_pool, &viewer, path.into_inner(), body.into_inner()).await?;
    Success::ok(course)
}

/// Deletes an owned course. Moderators cannot delete courses.
#[delete("/{id}")]
async fn delete_course(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    services::course::destroy(pg_pool, &viewer, path.into_inner()).await?;
    Success::no_content()
}

/// Toggles the authenticated user's subscription to a course.
///
/// # Output
/// - `{ "subscribed": true }` after subscribing
/// - `{ "subscribed": false }` after unsubscribing
/// - 404 when the course does not exist
/// - 409 when a concurrent toggle already created the subscription
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/courses/${courseId}/subscription`, {
///   method: 'POST',
///   headers: {
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   }
/// });
///
/// if (response.ok) {
///   const { subscribed } = await response.json();
///   console.log(subscribed ? 'Subscribed' : 'Unsubscribed');
/// }
/// ```
#[post("/{id}/subscription")]
async fn post_subscription(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let viewer = load_viewer(pg_pool, claims.user_id).await?;
    let subscribed =
        services::subscription::toggle(pg_pool, &viewer, path.into_inner()).await?;
    Success::ok(SubscriptionToggleResponse { subscribed })
}
