//! Runtime settings. `.env` is loaded first, then environment variables, and
//! the CLI overrides whatever those produce.

use crate::error::{FootpathError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "metro_footpath.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Interval at which clients are told to refresh the results stage.
pub const DEFAULT_REFRESH_MS: u64 = 3000;
/// Sessions untouched for this long are dropped when a new one is created.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub bind: String,
    pub refresh_ms: u64,
    /// Fixed seed for every RNG in the process. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub session_idle_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind: DEFAULT_BIND.to_string(),
            refresh_ms: DEFAULT_REFRESH_MS,
            seed: None,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

impl Settings {
    /// Build settings from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        let mut settings = Settings {
            db_path: db_path_from_env()?,
            ..Settings::default()
        };
        if let Ok(b) = env::var("FOOTPATH_BIND") {
            settings.bind = b;
        }
        if let Ok(r) = env::var("FOOTPATH_REFRESH_MS") {
            settings.refresh_ms = r
                .parse()
                .map_err(|_| FootpathError::Config(format!("FOOTPATH_REFRESH_MS is not a number: {}", r)))?;
        }
        if let Ok(i) = env::var("FOOTPATH_SESSION_IDLE_SECS") {
            settings.session_idle_secs = i
                .parse()
                .map_err(|_| FootpathError::Config(format!("FOOTPATH_SESSION_IDLE_SECS is not a number: {}", i)))?;
        }
        if let Ok(s) = env::var("FOOTPATH_SEED") {
            let seed = s
                .parse()
                .map_err(|_| FootpathError::Config(format!("FOOTPATH_SEED is not a number: {}", s)))?;
            settings.seed = Some(seed);
        }
        Ok(settings)
    }
}

/// Honors FOOTPATH_DB_PATH first, then FOOTPATH_DB_URL (`sqlite://` or
/// `file://`), then the default file in the working directory.
fn db_path_from_env() -> Result<PathBuf> {
    if let Ok(p) = env::var("FOOTPATH_DB_PATH") {
        return Ok(PathBuf::from(p));
    }
    match env::var("FOOTPATH_DB_URL") {
        Ok(url) => db_path_from_url(&url),
        Err(_) => Ok(PathBuf::from(DEFAULT_DB_PATH)),
    }
}

pub fn db_path_from_url(url: &str) -> Result<PathBuf> {
    if let Some(rest) = url.strip_prefix("sqlite://") {
        Ok(PathBuf::from(rest))
    } else if let Some(rest) = url.strip_prefix("file://") {
        Ok(PathBuf::from(rest))
    } else {
        Err(FootpathError::Config(format!(
            "FOOTPATH_DB_URL uses unsupported scheme: {}",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path_from_url_schemes() {
        assert_eq!(db_path_from_url("sqlite://data/metro.db").unwrap(), PathBuf::from("data/metro.db"));
        assert_eq!(db_path_from_url("file:///tmp/metro.db").unwrap(), PathBuf::from("/tmp/metro.db"));
        assert!(matches!(
            db_path_from_url("postgres://localhost/metro"),
            Err(FootpathError::Config(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.refresh_ms, 3000);
        assert_eq!(s.db_path, PathBuf::from("metro_footpath.db"));
        assert!(s.seed.is_none());
    }
}
