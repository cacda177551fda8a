use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub struct TokenIdentity {
    pub user_id: u64,
    pub username: String,
    pub role: u8,
    pub employee_id: Option<u64>,
    pub company_id: Option<u64>,
}

pub fn generate_access_token(identity: &TokenIdentity, secret: &str, ttl: usize) -> String {
    let claims = Claims {
        user_id: identity.user_id,
        sub: identity.username.clone(),
        role: identity.role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Access,
        employee_id: identity.employee_id,
        company_id: identity.company_id,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn generate_refresh_token(
    identity: &TokenIdentity,
    secret: &str,
    ttl: usize,
) -> (String, Claims) {
    let claims = Claims {
        user_id: identity.user_id,
        sub: identity.username.clone(),
        role: identity.role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Refresh,
        employee_id: identity.employee_id,
        company_id: identity.company_id,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    (token, claims)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> TokenIdentity {
        TokenIdentity {
            user_id: 42,
            username: "jane.doe".into(),
            role: 5,
            employee_id: Some(1000),
            company_id: Some(1),
        }
    }

    #[test]
    fn access_token_round_trips() {
        let token = generate_access_token(&identity(), "test-secret", 900);
        let claims = verify_token(&token, "test-secret").unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "jane.doe");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.employee_id, Some(1000));
        assert_eq!(claims.company_id, Some(1));
    }

    #[test]
    fn refresh_token_carries_its_jti() {
        let (token, claims) = generate_refresh_token(&identity(), "test-secret", 604800);
        let decoded = verify_token(&token, "test-secret").unwrap();

        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.token_type, TokenType::Refresh);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(&identity(), "test-secret", 900);
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
