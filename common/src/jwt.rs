use actix_web::{HttpMessage, HttpResponse, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub user_id: Uuid,
    pub kind: TokenKind,
    pub exp: usize,
}

/// Generates a JWT of the given kind for a user.
/// Access and refresh tokens share the secret but differ in the `kind`
/// claim and expiration window.
pub fn generate_jwt(user_id: Uuid, kind: TokenKind, config: &JwtConfig) -> Res<String> {
    let hours = match kind {
        TokenKind::Access => config.access_expiration_hours,
        TokenKind::Refresh => config.refresh_expiration_hours,
    };
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(hours))
        .expect("valid timestamp")
        .timestamp();

    let claims = JwtClaims {
        user_id,
        kind,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

pub fn get_jwt_claims_or_error(req: &ServiceRequest) -> Result<JwtClaims, HttpResponse> {
    if let Some(jwt_claims_res) = req.extensions().get::<Res<JwtClaims>>() {
        match jwt_claims_res {
            Ok(claims) => Ok(claims.clone()),
            Err(app_error) => Err(app_error.to_http_response()),
        }
    } else {
        Err(
            AppError::Unauthorized("No authorization token provided".to_string())
                .to_http_response(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_expiration_hours: 1,
            refresh_expiration_hours: 24,
        }
    }

    #[test]
    fn roundtrip_preserves_claims() {
        let config = config();
        let user_id = Uuid::new_v4();

        let token = generate_jwt(user_id, TokenKind::Access, &config).unwrap();
        let claims = validate_jwt(&token, &config.secret).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_carries_refresh_kind() {
        let config = config();
        let token = generate_jwt(Uuid::new_v4(), TokenKind::Refresh, &config).unwrap();
        let claims = validate_jwt(&token, &config.secret).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = config();
        let token = generate_jwt(Uuid::new_v4(), TokenKind::Access, &config).unwrap();
        assert!(validate_jwt(&token, "other-secret").is_err());
    }
}
