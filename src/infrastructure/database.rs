//! SQLite connection pool and schema setup.
//!
//! The schema is applied at startup with `CREATE TABLE IF NOT EXISTS`, so
//! pointing the service at an existing database file is safe.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS logins (
        login_id      INTEGER PRIMARY KEY AUTOINCREMENT,
        email         TEXT    NOT NULL UNIQUE,
        password_hash TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS roomies (
        roomie_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        roomie_name TEXT    NOT NULL,
        login_id    INTEGER NOT NULL REFERENCES logins (login_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        task_id      INTEGER PRIMARY KEY AUTOINCREMENT,
        task_name    TEXT    NOT NULL,
        description  TEXT,
        due_date     TEXT,
        is_completed BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS task_roomies (
        task_id   INTEGER NOT NULL REFERENCES tasks (task_id) ON DELETE CASCADE,
        roomie_id INTEGER NOT NULL REFERENCES roomies (roomie_id) ON DELETE CASCADE,
        PRIMARY KEY (task_id, roomie_id)
    )
    "#,
];

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// e.g. `sqlite://weekly_planner.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 30,
        }
    }
}

/// Opens the pool and applies the schema.
///
/// An in-memory database lives only as long as its connection, so it is
/// pinned to a single connection that is never recycled.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));
    if config.is_in_memory() {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    } else {
        pool_options = pool_options.max_connections(config.max_connections);
    }

    info!(
        in_memory = config.is_in_memory(),
        max_connections = config.max_connections,
        "Opening SQLite pool"
    );
    let pool = pool_options.connect_with(options).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!(tables = SCHEMA.len(), "Schema applied");
    Ok(())
}
