//! Authentication Errors
//! Mission: Map every auth failure to a single {status, message} response

use crate::auth::user_store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Every failure the auth layer can produce. The `IntoResponse` impl is the
/// single error responder: one JSON body per failure, no partial responses.
#[derive(Debug)]
pub enum AuthError {
    /// No bearer token on a protected route
    TokenRequired,
    /// Token present but failed verification or expired
    TokenInvalid,
    /// Unknown username or wrong password at login
    InvalidCredentials,
    /// Role claim does not match the route's required role
    Forbidden,
    /// Registration input rejected, message carries the reason
    InvalidRoleName(String),
    /// Malformed request body
    BadRequest(String),
    /// Username already exists in the user store
    DuplicateUsername,
    /// Opaque persistence or hashing failure
    Internal(anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => AuthError::DuplicateUsername,
            StoreError::Database(err) => AuthError::Internal(err),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::TokenRequired => (StatusCode::UNAUTHORIZED, "Token required".to_string()),
            AuthError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Token invalid".to_string()),
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid Credentials".to_string())
            }
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "This is not for you".to_string()),
            AuthError::InvalidRoleName(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AuthError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AuthError::DuplicateUsername => {
                (StatusCode::CONFLICT, "Username already taken".to_string())
            }
            AuthError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::TokenRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenInvalid.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::InvalidRoleName("nope".to_string())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AuthError::DuplicateUsername.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_is_message_json() {
        let response = AuthError::Forbidden.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"message":"This is not for you"}"#);
    }

    #[tokio::test]
    async fn test_internal_error_is_opaque() {
        let response = AuthError::Internal(anyhow::anyhow!("users.db is on fire")).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("users.db"));
        assert_eq!(text, r#"{"message":"Internal server error"}"#);
    }
}
