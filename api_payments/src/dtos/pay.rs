use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PaymentCreateBody {
    pub course_id: Uuid,
}

/// Filters and ordering for the payment list.
/// `ordering` accepts "timestamp" (oldest first, default) or "-timestamp".
#[derive(Debug, Deserialize, Default)]
pub struct PaymentListQuery {
    pub course_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub method: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaymentListQuery {
    pub fn newest_first(&self) -> bool {
        self.ordering.as_deref() == Some("-timestamp")
    }
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
