use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub video_url: String,
    pub course_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
