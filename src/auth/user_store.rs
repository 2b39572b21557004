//! User Storage
//! Mission: Persist user accounts behind a narrow collaborator interface

use crate::auth::models::{NewUser, User};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use tokio::task;
use tracing::info;
use uuid::Uuid;

/// Failures surfaced by a user store.
#[derive(Debug)]
pub enum StoreError {
    /// Unique-username constraint violated
    DuplicateUsername(String),
    /// Anything else the backend reports, passed through opaque
    Database(anyhow::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateUsername(username) => {
                write!(f, "Username already taken: {}", username)
            }
            StoreError::Database(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

/// Collaborator interface for user persistence. The auth layer only ever
/// adds users and looks them up; it never mutates or deletes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user and return the created record
    async fn add(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// List every user record
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
}

/// User store with SQLite backend
pub struct SqliteUserStore {
    db_path: String,
}

impl SqliteUserStore {
    /// Create a new user store and initialize the schema
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> anyhow::Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create users table")?;

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let id: String = row.get(0)?;
        Ok(User {
            id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role_name: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn add(&self, new_user: NewUser) -> Result<User, StoreError> {
        let db_path = self.db_path.clone();

        let user = task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .context("Failed to open database")
                .map_err(StoreError::Database)?;

            let user = User {
                id: Uuid::new_v4(),
                username: new_user.username,
                password_hash: new_user.password_hash,
                role_name: new_user.role_name,
                created_at: Utc::now().to_rfc3339(),
            };

            let inserted = conn.execute(
                "INSERT INTO users (id, username, password_hash, role_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id.to_string(),
                    user.username,
                    user.password_hash,
                    user.role_name,
                    user.created_at,
                ],
            );

            match inserted {
                Ok(_) => Ok(user),
                Err(err) if is_unique_violation(&err) => {
                    Err(StoreError::DuplicateUsername(user.username))
                }
                Err(err) => Err(StoreError::Database(err.into())),
            }
        })
        .await
        .map_err(|err| StoreError::Database(err.into()))??;

        info!("Created user: {} ({})", user.username, user.role_name);

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let db_path = self.db_path.clone();
        let username = username.to_string();

        task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .context("Failed to open database")
                .map_err(StoreError::Database)?;

            let mut stmt = conn
                .prepare(
                    "SELECT id, username, password_hash, role_name, created_at
                     FROM users WHERE username = ?1",
                )
                .map_err(|err| StoreError::Database(err.into()))?;

            match stmt.query_row(params![username], SqliteUserStore::row_to_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(StoreError::Database(err.into())),
            }
        })
        .await
        .map_err(|err| StoreError::Database(err.into()))?
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .context("Failed to open database")
                .map_err(StoreError::Database)?;

            let mut stmt = conn
                .prepare(
                    "SELECT id, username, password_hash, role_name, created_at
                     FROM users ORDER BY created_at",
                )
                .map_err(|err| StoreError::Database(err.into()))?;

            let users = stmt
                .query_map([], SqliteUserStore::row_to_user)
                .map_err(|err| StoreError::Database(err.into()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| StoreError::Database(err.into()))?;

            Ok(users)
        })
        .await
        .map_err(|err| StoreError::Database(err.into()))?
    }
}
