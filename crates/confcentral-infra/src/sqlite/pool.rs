//! SQLite connection pools.
//!
//! Writes go through a single connection so they are serialized; reads use a
//! small read-only pool alongside it. WAL mode lets the two run concurrently.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "confcentral.db";

const READER_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reader and writer pools over one SQLite file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if needed) the database inside `data_dir` and bring its
    /// schema up to date.
    pub async fn open(data_dir: &Path) -> Result<Self, sqlx::Error> {
        tokio::fs::create_dir_all(data_dir).await?;
        Self::new(&database_url(data_dir)).await
    }

    /// Connect to `database_url`. Migrations run on the writer before any
    /// reader connects, so readers never see a half-built schema.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = connect_options(database_url)?;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;
        tracing::debug!(url = database_url, "schema up to date");

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT)
        .create_if_missing(true))
}

/// Database URL for the SQLite file inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join(DATABASE_FILE).display())
}
