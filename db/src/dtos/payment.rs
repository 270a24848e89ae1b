use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PaymentCreateRequest {
    pub user_id: Uuid,
    pub course_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub amount: BigDecimal,
    pub method: String,
    pub session_id: Option<String>,
    pub payment_url: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub course_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub method: Option<String>,
    pub newest_first: bool,
    pub limit: i64,
    pub offset: i64,
}
