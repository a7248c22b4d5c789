use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

pub fn issue_access_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String> {
    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: exp.max(0) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid_token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_decodes_with_same_secret() {
        let id = Uuid::new_v4();
        let token = issue_access_token(id, "a@example.com", "secret", 1).unwrap();
        let claims = decode_access_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn wrong_secret_or_expired_token_is_rejected() {
        let id = Uuid::new_v4();
        let token = issue_access_token(id, "a@example.com", "secret", 1).unwrap();
        assert!(decode_access_token(&token, "other").is_err());

        let expired = issue_access_token(id, "a@example.com", "secret", -2).unwrap();
        assert!(matches!(
            decode_access_token(&expired, "secret"),
            Err(Error::Unauthorized(_))
        ));
    }
}
