//! Environment sources for secrets
//!
//! The loader never reads `std::env` directly; it goes through [`EnvSource`]
//! so the same assembly runs against the process environment or a fixed map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// RPC endpoint for the remote network
pub const INFURA_RPC_URL: &str = "INFURA_RPC_URL";

/// Signing key for the remote network
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";

/// A read-only view of environment variables
pub trait EnvSource {
    /// Raw value of `key`, `None` when unset
    fn raw(&self, key: &str) -> Option<String>;

    /// Value of `key`; empty strings count as unset
    fn var(&self, key: &str) -> Option<String> {
        self.raw(key).filter(|v| !v.is_empty())
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn raw(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn raw(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Result of reading a `.env` file, kept so it can be logged once a subscriber exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    NotFound,
    Unreadable(String),
}

impl DotenvOutcome {
    fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => DotenvOutcome::Loaded(path),
            Err(err) if err.not_found() => DotenvOutcome::NotFound,
            Err(err) => DotenvOutcome::Unreadable(err.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            DotenvOutcome::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            DotenvOutcome::NotFound => tracing::debug!("no .env file found"),
            DotenvOutcome::Unreadable(err) => {
                tracing::warn!(error = %err, "ignoring unreadable .env file")
            }
        }
    }
}

/// Read `.env` from the working directory or its parents into the process environment
pub fn read_dotenv() -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::dotenv())
}

/// Read a specific dotenv file into the process environment
pub fn read_dotenv_from(path: impl AsRef<Path>) -> DotenvOutcome {
    let path = path.as_ref();
    DotenvOutcome::from_result(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

/// Load `.env` if present (non-fatal) and log what happened
pub fn load_dotenv() {
    read_dotenv().log();
}
