use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use waypost_api::weather::DEFAULT_WEATHER_URL;

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// `None` disables weather lookups.
    pub weather_url: Option<String>,
    pub weather_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_path = std::env::var("WAYPOST_DB_PATH").unwrap_or_else(|_| "waypost.db".into());
        let host = std::env::var("WAYPOST_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("WAYPOST_PORT")
            .unwrap_or_else(|_| "8001".into())
            .parse()
            .context("WAYPOST_PORT must be a port number")?;

        let weather_url = match std::env::var("WAYPOST_WEATHER_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url),
            Err(_) => Some(DEFAULT_WEATHER_URL.to_string()),
        };
        let weather_timeout_secs: u64 = std::env::var("WAYPOST_WEATHER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .context("WAYPOST_WEATHER_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            db_path: PathBuf::from(db_path),
            host,
            port,
            weather_url,
            weather_timeout: Duration::from_secs(weather_timeout_secs),
        })
    }
}
