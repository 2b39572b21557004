//! JWT Token Handler
//! Mission: Issue and validate signed credential tokens

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with the process-wide signing secret.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_hours: 24, // tokens expire in one day
        }
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::hours(self.expiration_hours))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role_name: user.role_name.clone(),
            exp: expiration,
        };

        debug!(
            "Issuing JWT for user {} ({}), expires in {}h",
            user.username, user.id, self.expiration_hours
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to issue JWT")
    }

    /// Validate a token and extract its claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        // Zero leeway: a token is invalid from the first second past exp.
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid or expired token")?;

        debug!("Validated JWT for user {}", decoded.claims.username);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_user(username: &str, role_name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role_name: role_name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user("sue", "student");

        let token = handler.issue(&user).unwrap();
        assert!(!token.is_empty());

        // Decoded claims must reproduce exactly what was set at issuance
        let claims = handler.validate(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "sue");
        assert_eq!(claims.role_name, "student");
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());

        let result = handler.validate("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1".to_string());
        let handler2 = JwtHandler::new("secret2".to_string());
        let user = create_test_user("sue", "student");

        let token = handler1.issue(&user).unwrap();

        let result = handler2.validate(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_expired_one_second_past_expiry() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());

        // A token whose 24h lifetime elapsed one second ago
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "sue".to_string(),
            role_name: "student".to_string(),
            exp: (Utc::now().timestamp() - 1) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret-key-12345".as_bytes()),
        )
        .unwrap();

        let result = handler.validate(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_expiry_is_24_hours_from_issuance() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user("sue", "student");

        let before = Utc::now().timestamp() as usize;
        let token = handler.issue(&user).unwrap();
        let after = Utc::now().timestamp() as usize;

        let claims = handler.validate(&token).unwrap();
        let day = 24 * 3600;
        assert!(claims.exp >= before + day);
        assert!(claims.exp <= after + day);
    }
}
