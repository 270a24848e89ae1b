use std::sync::Arc;

use db::dtos::course::CourseCreateRequest;
use db::dtos::user::UserCreateRequest;
use sqlx::PgPool;
use uuid::Uuid;

/// Connects to the database named by `DATABASE_URL`. Tests that get `None`
/// back should return early instead of failing.
pub(crate) async fn test_pool() -> Option<Arc<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };
    Some(db::setup(&url, false).await.expect("database setup"))
}

pub(crate) async fn seed_user(pool: &PgPool) -> Uuid {
    db::user::insert_user(
        pool,
        UserCreateRequest {
            email: format!("user-{}@example.com", Uuid::new_v4()),
            password_hash: "irrelevant".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            city: String::new(),
            avatar_url: None,
        },
    )
    .await
    .expect("seed user")
    .id
}

pub(crate) async fn seed_moderator(pool: &PgPool) -> Uuid {
    let id = seed_user(pool).await;
    sqlx::query("UPDATE users SET is_moderator = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("promote moderator");
    id
}

pub(crate) async fn seed_course(pool: &PgPool, owner_id: Uuid) -> Uuid {
    db::course::insert_course(
        pool,
        CourseCreateRequest {
            title: format!("Course {}", Uuid::new_v4()),
            description: String::new(),
            preview_url: None,
            price: Default::default(),
            owner_id,
        },
    )
    .await
    .expect("seed course")
    .id
}
