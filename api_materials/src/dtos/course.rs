use chrono::NaiveDateTime;
use db::models::{course::Course, lesson::Lesson};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CourseCreateBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub price: BigDecimal,
}

#[derive(Debug, Deserialize)]
pub struct CourseUpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub price: Option<BigDecimal>,
}

/// Pagination for list endpoints. Unset values fall back to a page of 20,
/// capped at 100.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub price: BigDecimal,
    pub owner_id: Uuid,
    pub lessons: Vec<Lesson>,
    pub lessons_count: usize,
    pub is_subscribed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CourseResponse {
    pub fn build(course: Course, lessons: Vec<Lesson>, is_subscribed: bool) -> Self {
        CourseResponse {
            id: course.id,
            title: course.title,
            description: course.description,
            preview_url: course.preview_url,
            price: course.price,
            owner_id: course.owner_id,
            lessons_count: lessons.len(),
            lessons,
            is_subscribed,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionToggleResponse {
    pub subscribed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_and_caps() {
        let query = ListQuery::default();
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 0);

        let query = ListQuery {
            limit: Some(1000),
            offset: Some(-5),
        };
        assert_eq!(query.limit(), 100);
        assert_eq!(query.offset(), 0);
    }
}
