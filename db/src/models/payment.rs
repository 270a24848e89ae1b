use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// A single payment record. `course_id` and `lesson_id` are weak references:
/// deleting the target leaves them NULL instead of deleting the payment.
/// `is_paid` only ever transitions false to true.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub amount: BigDecimal,
    pub method: String,
    pub session_id: Option<String>,
    pub payment_url: Option<String>,
    pub status: String,
    pub is_paid: bool,
    pub created_at: NaiveDateTime,
}
