use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub price: BigDecimal,
    pub owner_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
