use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;
use crate::domain::ports::BookingStore;
use crate::infra::repositories::sqlite_booking_repo::SqliteBookingRepo;

/// Connects the SQLite store, runs migrations, and hands back the engine's
/// store collaborator. Startup failures panic; there is nothing to serve
/// without a store.
pub async fn bootstrap_store(config: &Config) -> Arc<dyn BookingStore> {
    info!("Initializing SQLite connection...");

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to connect to SQLite");

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    info!("SQLite store ready");
    Arc::new(SqliteBookingRepo::new(pool))
}
