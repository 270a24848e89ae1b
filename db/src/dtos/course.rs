use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CourseCreateRequest {
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub price: BigDecimal,
    pub owner_id: Uuid,
}

/// Partial course update. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub price: Option<BigDecimal>,
}
