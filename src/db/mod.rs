//! Team record storage.
//!
//! `TeamStore` is the contract every backend implements. Two backends exist:
//! a volatile in-process map and a durable SQLite file. The backend is chosen
//! once at startup from configuration.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::{Config, StorageBackend};
use crate::errors::AppError;
use crate::models::{LeaderboardEntry, Team, TeamPatch};

/// Persistence contract for team records.
///
/// `merge` applies a typed partial update: absent fields are left alone,
/// `current_phase` only moves forward and `completed` flags are never cleared.
/// Merges are not transactional across writers; callers that need
/// read-check-write atomicity serialize per team themselves.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Short human-readable backend name.
    fn backend_name(&self) -> &'static str;

    /// Insert a new record. Fails with `DuplicateId` if the ID is taken.
    async fn create(&self, team: &Team) -> Result<(), AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Team>, AppError>;

    /// Look up by normalized (lower-cased) team name.
    async fn get_by_name(&self, normalized_name: &str) -> Result<Option<Team>, AppError>;

    /// Merge a partial update and return the resulting record.
    async fn merge(&self, id: &str, patch: &TeamPatch) -> Result<Team, AppError>;

    /// Every record, in insertion order.
    async fn list_all(&self) -> Result<Vec<Team>, AppError>;

    /// Up to `limit` teams that finished phase 6, in insertion order.
    async fn list_completed(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AppError>;

    /// Remove one record. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Remove every record. Returns how many were removed.
    async fn clear(&self) -> Result<u64, AppError>;
}

/// Open the store selected by configuration.
pub async fn open_store(config: &Config) -> Result<Arc<dyn TeamStore>, AppError> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory team store; data will be lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            tracing::info!("Database path: {:?}", config.db_path);
            let pool = init_database(&config.db_path).await?;
            Ok(Arc::new(SqliteStore::new(pool)))
        }
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id TEXT PRIMARY KEY,
            team_name TEXT NOT NULL UNIQUE,
            team_leader TEXT NOT NULL,
            team_members TEXT NOT NULL,
            email TEXT NOT NULL,
            theme TEXT NOT NULL,
            current_phase INTEGER NOT NULL DEFAULT 1,
            phase1_completed INTEGER NOT NULL DEFAULT 0,
            phase1_ai_prompt TEXT,
            phase1_drive_link TEXT,
            phase2_completed INTEGER NOT NULL DEFAULT 0,
            phase2_score INTEGER,
            phase3_completed INTEGER NOT NULL DEFAULT 0,
            phase3_score INTEGER,
            phase4_completed INTEGER NOT NULL DEFAULT 0,
            phase4_score INTEGER,
            phase5_completed INTEGER NOT NULL DEFAULT 0,
            phase5_score INTEGER,
            phase6_completed INTEGER NOT NULL DEFAULT 0,
            phase6_location_answer TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_teams_phase6_completed ON teams(phase6_completed);")
        .execute(pool)
        .await?;

    Ok(())
}
