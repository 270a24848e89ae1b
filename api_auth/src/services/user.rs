use common::error::{AppError, Res};
use db::dtos::user::UserUpdateRequest;
use db::models::user::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::user::{ProfileResponse, ProfileUpdateRequest};
use crate::services::auth::hash_password;

/// Loads the acting user, rejecting tokens of deleted or deactivated
/// accounts.
pub async fn require_active_user(pool: &PgPool, user_id: Uuid) -> Res<User> {
    let user = db::user::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;
    if !user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".to_string()));
    }
    Ok(user)
}

/// Builds the profile view of `target_id` as seen by `viewer_id`. Payment
/// history is only loaded when the viewer requests their own profile.
pub async fn get_profile(pool: &PgPool, viewer_id: Uuid, target_id: Uuid) -> Res<ProfileResponse> {
    let user = db::user::get_user_by_id(pool, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let payments = if viewer_id == target_id {
        db::payment::list_payments_by_user_brief(pool, target_id).await?
    } else {
        Vec::new()
    };

    Ok(ProfileResponse::project(&user, viewer_id, payments))
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    req: ProfileUpdateRequest,
) -> Res<User> {
    let password_hash = match req.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    db::user::update_user(
        pool,
        user_id,
        UserUpdateRequest {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            city: req.city,
            avatar_url: req.avatar_url,
            password_hash,
        },
    )
    .await
}
