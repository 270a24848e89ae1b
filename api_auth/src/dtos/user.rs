use db::models::{payment::Payment, user::User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile projection. Owners of the profile get the full view including
/// `last_name` and payment history; everyone else gets the reduced view
/// with those fields absent from the JSON entirely.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub phone: String,
    pub city: String,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<Payment>>,
}

impl ProfileResponse {
    pub fn project(user: &User, viewer_id: Uuid, payments: Vec<Payment>) -> Self {
        let is_self = user.id == viewer_id;
        ProfileResponse {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            phone: user.phone.clone(),
            city: user.city.clone(),
            avatar_url: user.avatar_url.clone(),
            last_name: is_self.then(|| user.last_name.clone()),
            payments: is_self.then_some(payments),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn user(id: Uuid) -> User {
        User {
            id,
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Anderson".to_string(),
            phone: "+100".to_string(),
            city: "Lisbon".to_string(),
            avatar_url: None,
            is_moderator: false,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn payment(user_id: Uuid) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            user_id,
            course_id: None,
            lesson_id: None,
            amount: BigDecimal::from_str("19.99").unwrap(),
            method: "stripe".to_string(),
            session_id: Some("cs_test_1".to_string()),
            payment_url: None,
            status: "pending".to_string(),
            is_paid: false,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn own_profile_includes_last_name_and_payments() {
        let id = Uuid::new_v4();
        let profile = ProfileResponse::project(&user(id), id, vec![payment(id)]);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["last_name"], "Anderson");
        assert_eq!(json["payments"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn foreign_profile_omits_private_fields() {
        let id = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let profile = ProfileResponse::project(&user(id), viewer, vec![payment(id)]);
        let json = serde_json::to_value(&profile).unwrap();

        assert!(json.get("last_name").is_none());
        assert!(json.get("payments").is_none());
        // the public fields stay visible
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["first_name"], "Alice");
    }

    #[test]
    fn password_hash_never_serializes() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(user(id)).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
