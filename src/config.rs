//! Runtime configuration comes from the environment (and `.env`, via
//! `dotenvy`), read exactly once at startup and handed down explicitly.
//! Reads go through `mockable::Env` so tests never touch the process
//! environment.

use anyhow::{Context, Result};
use mockable::Env;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

/// File name used when `SQLITE_DB` is not set.
pub const DEFAULT_DB_FILE: &str = "notes.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
/// The frontend dev server.
pub const DEFAULT_CORS_ORIGINS: &[&str] =
    &["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Clone, Debug)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env<E: Env>(env: &E) -> Result<Self> {
        let non_empty =
            |key: &str| env.string(key).filter(|v| !v.trim().is_empty());

        let db_path = match non_empty("SQLITE_DB") {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()
                .context("cannot resolve the working directory")?
                .join(DEFAULT_DB_FILE),
        };

        let host: IpAddr = non_empty("HOST")
            .as_deref()
            .unwrap_or(DEFAULT_HOST)
            .parse()
            .context("HOST must be an IP address")?;
        let port = match non_empty("PORT") {
            Some(p) => p.parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match non_empty("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Config {
            db_path,
            addr: SocketAddr::new(host, port),
            cors_origins,
        })
    }
}
