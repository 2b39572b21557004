//! Rollcall Auth Service
//! Mission: Username/password authentication with JWT-gated routes

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rollcall_auth::{
    api::create_router,
    auth::{AuthState, JwtHandler, PasswordHasher, SqliteUserStore, UserStore},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = Config::from_env()?;

    let user_store: Arc<dyn UserStore> = Arc::new(
        SqliteUserStore::new(&config.database_path)
            .context("Failed to initialize user store")?,
    );
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone()));
    let password_hasher = PasswordHasher::new(config.bcrypt_cost);

    let auth_state = AuthState::new(user_store, jwt_handler, password_hasher);

    info!("🔐 Authentication initialized at: {}", config.database_path);

    let app = create_router(auth_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter support
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rollcall_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load .env from the working directory if present
fn load_env() {
    let _ = dotenv();
}
