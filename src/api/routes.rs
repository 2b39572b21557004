use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::auth::{api as auth_api, require_role, require_token, AuthState, RequiredRole};
use crate::middleware::request_logging;

/// Create the API router
pub fn create_router(auth_state: AuthState) -> Router {
    let jwt_handler = auth_state.jwt_handler.clone();

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/login", post(auth_api::login))
        .with_state(auth_state.clone());

    // Token required, any role
    let restricted_routes = Router::new()
        .route("/api/auth/me", get(auth_api::me))
        .route_layer(from_fn_with_state(jwt_handler.clone(), require_token));

    // Token required, admin role only. route_layers run outermost-last,
    // so the token validator always runs before the role gate.
    let admin_routes = Router::new()
        .route("/api/users", get(auth_api::list_users))
        .route_layer(from_fn_with_state(RequiredRole("admin"), require_role))
        .route_layer(from_fn_with_state(jwt_handler, require_token))
        .with_state(auth_state);

    Router::new()
        .merge(public_routes)
        .merge(restricted_routes)
        .merge(admin_routes)
        .layer(from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
