use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordVerifier, password_hash::PasswordHasher};
use common::error::{AppError, Res};
use db::dtos::user::UserCreateRequest;
use db::models::user::User;
use sqlx::PgPool;

use crate::dtos::auth::RegisterRequest;

pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Inserts a user record with hashed credentials.
///
/// The unique constraint on `users.email` is the final arbiter: two
/// concurrent registrations with the same email both pass the advisory
/// exists-check in the route, and the loser's insert fails with a unique
/// violation, which maps to 400 rather than surfacing as a database error.
pub async fn create_user(pool: &PgPool, req: RegisterRequest) -> Res<User> {
    let password_hash = hash_password(&req.password)?;

    let insert = db::user::insert_user(
        pool,
        UserCreateRequest {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            city: req.city,
            avatar_url: req.avatar_url,
        },
    )
    .await;

    match insert {
        Ok(user) => Ok(user),
        Err(error) if error.is_unique_violation() => Err(AppError::BadRequest(
            "Email already registered".to_string(),
        )),
        Err(error) => Err(error),
    }
}

/// Verifies email/password credentials.
/// Unknown emails, deactivated accounts and wrong passwords all collapse
/// into the same 401 so the response does not leak which emails exist.
pub async fn authenticate_user(pool: &PgPool, email: &str, password: &str) -> Res<User> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = db::user::get_user_by_email(pool, email)
        .await?
        .ok_or_else(invalid)?;
    if !user.is_active {
        return Err(invalid());
    }

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Corrupt password hash: {}", e)))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn test_pool() -> Option<Arc<PgPool>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping database-backed test");
            return None;
        };
        Some(db::setup(&url, false).await.expect("database setup"))
    }

    fn register(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "correct horse battery staple".to_string(),
            first_name: "Alice".to_string(),
            last_name: String::new(),
            phone: String::new(),
            city: String::new(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_registration_is_a_bad_request() {
        let Some(pool) = test_pool().await else { return };
        let email = format!("dup-{}@example.com", Uuid::new_v4());

        create_user(&pool, register(&email)).await.unwrap();
        let error = create_user(&pool, register(&email)).await.unwrap_err();

        assert!(matches!(error, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn concurrent_registrations_with_same_email_yield_one_user() {
        let Some(pool) = test_pool().await else { return };
        let email = format!("race-{}@example.com", Uuid::new_v4());

        // both calls skip any advisory pre-check; the unique constraint
        // decides the winner and the loser must still see a 400, not a 500
        let (a, b) = tokio::join!(
            create_user(&pool, register(&email)),
            create_user(&pool, register(&email)),
        );
        let outcomes = [a, b];

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(AppError::BadRequest(_))))
        );
    }
}
