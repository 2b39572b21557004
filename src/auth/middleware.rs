//! Authentication Middleware
//! Mission: Gate protected routes on token validity and role claims

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::{Claims, DEFAULT_ROLE},
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Middleware that validates the bearer token on the Authorization header.
///
/// On success the decoded claims are inserted into the request extensions,
/// where downstream middleware and handlers read them.
pub async fn require_token(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::TokenRequired)?;

    let claims = jwt_handler
        .validate(&token)
        .map_err(|_| AuthError::TokenInvalid)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role required by a protected route, fixed at router construction.
#[derive(Clone)]
pub struct RequiredRole(pub &'static str);

/// Middleware that authorizes a request by its role claim.
///
/// Expects `require_token` to have populated the claims already. If it has
/// not (a wiring mistake), the gate fails closed as an unauthenticated
/// request instead of panicking.
pub async fn require_role(
    State(RequiredRole(required)): State<RequiredRole>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = extract_claims(&req).ok_or(AuthError::TokenRequired)?;

    if claims.role_name != required {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// Extract decoded claims from a request (use after `require_token`)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

/// Normalize a candidate role name from registration input.
///
/// Missing or blank input falls back to the default role. The length check
/// runs before the admin check; both operate on the trimmed string.
pub fn normalize_role_name(role_name: Option<&str>) -> Result<String, AuthError> {
    let trimmed = role_name.unwrap_or("").trim();

    if trimmed.is_empty() {
        return Ok(DEFAULT_ROLE.to_string());
    }

    if trimmed.chars().count() > 32 {
        return Err(AuthError::InvalidRoleName(
            "Role name can not be longer than 32 chars".to_string(),
        ));
    }

    if trimmed == "admin" {
        return Err(AuthError::InvalidRoleName(
            "Role name can not be admin".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
