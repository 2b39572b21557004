//! Authentication API Endpoints
//! Mission: Register accounts, log users in, expose who the caller is

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    middleware::{extract_claims, normalize_role_name},
    models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, UserResponse},
    password::PasswordHasher,
    user_store::UserStore,
};
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<dyn UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
    pub password_hasher: PasswordHasher,
}

impl AuthState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        jwt_handler: Arc<JwtHandler>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_store,
            jwt_handler,
            password_hasher,
        }
    }
}

/// Registration body with the role name already normalized.
///
/// Deserializes the request and applies role-name validation before the
/// handler runs, so a handler never sees an unvetted role.
pub struct ValidatedRegister {
    pub username: String,
    pub password: String,
    pub role_name: String,
}

#[async_trait]
impl<S> FromRequest<S> for ValidatedRegister
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<RegisterRequest>::from_request(req, state)
            .await
            .map_err(|rejection| AuthError::BadRequest(rejection.body_text()))?;

        let role_name = normalize_role_name(body.role_name.as_deref())?;

        Ok(Self {
            username: body.username,
            password: body.password,
            role_name,
        })
    }
}

/// Register endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AuthState>,
    body: ValidatedRegister,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    let password_hash = state
        .password_hasher
        .hash(body.password)
        .await
        .map_err(AuthError::Internal)?;

    let user = state
        .user_store
        .add(NewUser {
            username: body.username,
            password_hash,
            role_name: body.role_name,
        })
        .await?;

    info!("✅ Registered user: {} ({})", user.username, user.role_name);

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    info!("🔐 Login attempt: {}", payload.username);

    let user = state
        .user_store
        .find_by_username(&payload.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = state
        .password_hasher
        .verify(payload.password, user.password_hash.clone())
        .await
        .map_err(AuthError::Internal)?;

    if !valid {
        warn!("❌ Failed login attempt: {}", payload.username);
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.jwt_handler.issue(&user).map_err(AuthError::Internal)?;

    info!("✅ Login successful: {} ({})", user.username, user.role_name);

    Ok(Json(LoginResponse {
        message: format!("{} is back!", user.username),
        token,
    }))
}

/// Current caller - GET /api/auth/me
/// Built entirely from the decoded claims, no store lookup.
pub async fn me(req: Request) -> Result<Json<UserResponse>, AuthError> {
    let claims = extract_claims(&req).ok_or(AuthError::TokenRequired)?;

    Ok(Json(UserResponse {
        id: claims.sub.clone(),
        username: claims.username.clone(),
        role_name: claims.role_name.clone(),
    }))
}

/// List users - GET /api/users (admin only, enforced by the role gate)
pub async fn list_users(
    State(state): State<AuthState>,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    let users = state.user_store.find_all().await?;

    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}
