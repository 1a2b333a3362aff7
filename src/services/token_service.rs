use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{ApiError, Role, User};

/// JWT claim set embedded in every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Hex user ObjectId.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens. Verification is stateless;
/// there is no revocation list, a token stays valid until its expiry.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let user_id = user
            .id
            .ok_or_else(|| ApiError::InternalError("User has no id".to_string()))?;
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_hex(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::InternalError(format!("Failed to sign token: {}", e)))
    }

    /// Validates signature and expiry. Expired tokens surface as
    /// TokenExpired, everything else (tamper, malformed, wrong key) as
    /// TokenInvalid.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
            _ => ApiError::TokenInvalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn test_user() -> User {
        User {
            id: Some(ObjectId::new()),
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Vendor,
            created_at: 0,
        }
    }

    #[test]
    fn issued_token_verifies_with_expected_claims() {
        let service = TokenService::new("test-secret-test-secret".to_string(), 24);
        let user = test_user();
        let token = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id.unwrap().to_hex());
        assert_eq!(claims.email, "ada@x.com");
        assert_eq!(claims.role, Role::Vendor);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let service = TokenService::new("test-secret-test-secret".to_string(), 24);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: ObjectId::new().to_hex(),
            email: "ada@x.com".to_string(),
            role: Role::Customer,
            iat: now - 25 * 3600,
            exp: now - 3600,
        };
        let token = service.sign(&claims).unwrap();
        match service.verify(&token) {
            Err(ApiError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got ok={}", other.is_ok()),
        }
    }

    #[test]
    fn token_signed_with_other_key_is_invalid() {
        let service = TokenService::new("test-secret-test-secret".to_string(), 24);
        let imposter = TokenService::new("another-secret-entirely".to_string(), 24);
        let token = imposter.issue(&test_user()).unwrap();
        match service.verify(&token) {
            Err(ApiError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got ok={}", other.is_ok()),
        }
    }

    #[test]
    fn garbage_token_is_invalid() {
        let service = TokenService::new("test-secret-test-secret".to_string(), 24);
        for garbage in ["", "abc", "a.b.c", "Bearer x"] {
            match service.verify(garbage) {
                Err(ApiError::TokenInvalid) => {}
                other => panic!("expected TokenInvalid for {:?}, got ok={}", garbage, other.is_ok()),
            }
        }
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let service = TokenService::new("test-secret-test-secret".to_string(), 24);
        let token = service.issue(&test_user()).unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        // Swap the payload for a different (validly encoded) one
        parts[1] = {
            use std::fmt::Write;
            let mut flipped = String::new();
            for c in parts[1].chars() {
                write!(flipped, "{}", if c == 'A' { 'B' } else { 'A' }).unwrap();
            }
            flipped
        };
        let forged = parts.join(".");
        assert!(matches!(service.verify(&forged), Err(ApiError::TokenInvalid)));
    }
}
