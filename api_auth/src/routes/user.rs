use actix_web::{Responder, delete, get, patch, web};
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::user::{ProfileResponse, ProfileUpdateRequest};
use crate::services;

/// Retrieves a user profile.
///
/// Viewers requesting their own profile get the full projection including
/// `last_name` and payment history; any other authenticated viewer gets the
/// reduced public projection with both fields absent.
#[get("/{id}")]
async fn get_profile(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    services::user::require_active_user(pg_pool, claims.user_id).await?;
    let profile = services::user::get_profile(pg_pool, claims.user_id, path.into_inner()).await?;
    Success::ok(profile)
}

/// Updates the authenticated user's own profile. Editing someone else's
/// profile is forbidden. A `password` field triggers a re-hash.
#[patch("/{id}")]
async fn patch_profile(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    req: web::Json<ProfileUpdateRequest>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let target_id = path.into_inner();
    if target_id != claims.user_id {
        return Err(AppError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }

    let pg_pool: &PgPool = &**pool;
    services::user::require_active_user(pg_pool, claims.user_id).await?;
    let user = services::user::update_profile(pg_pool, target_id, req.into_inner()).await?;
    let payments = db::payment::list_payments_by_user_brief(pg_pool, target_id).await?;
    Success::ok(ProfileResponse::project(&user, claims.user_id, payments))
}

/// Deletes the authenticated user's own account. Owned courses and lessons
/// cascade away with it.
#[delete("/{id}")]
async fn delete_profile(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let target_id = path.into_inner();
    if target_id != claims.user_id {
        return Err(AppError::Forbidden(
            "You can only delete your own profile".to_string(),
        ));
    }

    let pg_pool: &PgPool = &**pool;
    let deleted = db::user::delete_user(pg_pool, target_id).await?;
    if !deleted {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Success::no_content()
}
