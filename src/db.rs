//! The storage handle. There is no connection pool: every repository
//! operation opens its own connection through [`Storage::open`] and lets go
//! of it as soon as the operation is done. A `SqliteConnection` closes
//! itself when dropped, so early returns and cancelled futures release it
//! too.

use anyhow::{Context, Result};
use sqlx::{
    query,
    sqlite::{SqliteConnectOptions, SqliteConnection},
    ConnectOptions, Connection,
};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn open(&self) -> Result<SqliteConnection> {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .connect()
            .await
            .with_context(|| {
                format!("cannot open database at {}", self.path.display())
            })
    }

    /// Create the `notes` table if it isn't there yet. Safe to run on every
    /// startup.
    pub async fn init(&self) -> Result<()> {
        let mut conn = self.open().await?;
        query(
            "create table if not exists notes (
                id integer primary key autoincrement,
                title text not null,
                content text not null,
                created_at text not null,
                updated_at text not null
            )",
        )
        .execute(&mut conn)
        .await
        .context("cannot create the notes table")?;
        conn.close().await?;

        Ok(())
    }
}
