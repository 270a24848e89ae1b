use actix_web::{Responder, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt::{self, TokenKind};
use sqlx::PgPool;
use std::sync::Arc;

use crate::dtos::auth::{
    AccessTokenResponse, RefreshRequest, RegisterRequest, TokenPairResponse, TokenRequest,
};
use crate::dtos::user::ProfileResponse;
use crate::services;

/// Registers a new user with email and password authentication.
///
/// # Input
/// - `req`: JSON payload containing registration information (email,
///   password, optional profile fields)
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: Returns the created profile with 201 Created status
/// - Error: Returns 400 Bad Request if the email already exists
///
/// # Frontend Example
/// ```javascript
/// // Using fetch API
/// const response = await fetch('/api/users/register', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json'
///   },
///   body: JSON.stringify({
///     email: 'user@example.com',
///     password: 'securepassword',
///     first_name: 'John',
///     city: 'Berlin' // Optional, like the other profile fields
///   })
/// });
///
/// if (response.ok) {
///   const profile = await response.json();
///   console.log('Registered user:', profile);
/// }
/// ```
#[post("/register")]
async fn post_register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let email_exists = db::user::exists_user_by_email(pg_pool, &req.email).await?;
    if email_exists {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }
    let user = services::auth::create_user(pg_pool, req.into_inner()).await?;
    let profile = ProfileResponse::project(&user, user.id, Vec::new());
    Success::created(profile)
}

/// Authenticates a user with email and password and issues a token pair.
///
/// # Input
/// - `req`: JSON payload containing email and password
/// - `config`: Application configuration for JWT generation
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: Returns `{ access, refresh }` JWTs
/// - Error: Returns 401 Unauthorized for invalid credentials
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/users/token', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     email: 'user@example.com',
///     password: 'securepassword'
///   })
/// });
///
/// if (response.ok) {
///   const { access, refresh } = await response.json();
///   localStorage.setItem('authToken', access);
///   localStorage.setItem('refreshToken', refresh);
/// }
/// ```
#[post("/token")]
pub async fn post_token(
    req: web::Json<TokenRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let req = req.into_inner();
    let user = services::auth::authenticate_user(pg_pool, &req.email, &req.password).await?;

    let access = jwt::generate_jwt(user.id, TokenKind::Access, &config.jwt_config)?;
    let refresh = jwt::generate_jwt(user.id, TokenKind::Refresh, &config.jwt_config)?;
    Success::ok(TokenPairResponse { access, refresh })
}

/// Exchanges a valid refresh token for a fresh access token.
/// Access tokens are rejected here; only `kind: refresh` claims pass.
#[post("/token/refresh")]
pub async fn post_token_refresh(
    req: web::Json<RefreshRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let claims = jwt::validate_jwt(&req.refresh, &config.jwt_config.secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;
    if claims.kind != TokenKind::Refresh {
        return Err(AppError::Unauthorized("Refresh token required".to_string()));
    }

    // the account must still exist and be active
    let pg_pool: &PgPool = &**pool;
    let user = services::user::require_active_user(pg_pool, claims.user_id).await?;

    let access = jwt::generate_jwt(user.id, TokenKind::Access, &config.jwt_config)?;
    Success::ok(AccessTokenResponse { access })
}
