//! Explorer configuration: defaults, optional RON file, environment overrides.
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Settings for the remote catalog client and the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// `limit` sent to list endpoints; large enough to get everything in one page
    pub page_limit: u32,
    /// Upper bound on concurrent generation-detail fetches during metadata load
    pub max_concurrent_requests: usize,
    pub user_agent: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            page_limit: 100_000,
            max_concurrent_requests: 8,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration for a binary.
    ///
    /// Starts from the defaults, reads the RON file named by `POKEDEX_CONFIG`
    /// if set, then applies environment overrides:
    /// - `POKEAPI_BASE_URL` - API root (default: https://pokeapi.co/api/v2)
    /// - `POKEAPI_TIMEOUT_SECS` - per-request timeout (default: 30)
    /// - `POKEAPI_PAGE_LIMIT` - list endpoint page size (default: 100000)
    /// - `POKEAPI_CONCURRENCY` - concurrent generation fetches (default: 8)
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var("POKEDEX_CONFIG") {
            Ok(path) => Self::from_ron_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn from_ron_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_ron_str(content: &str) -> Result<Self, String> {
        ron::from_str::<Self>(content)
            .map(Self::clamped)
            .map_err(|e| e.to_string())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key/value lookup. Unparseable values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("POKEAPI_BASE_URL").filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(secs) = parse_value(&lookup, "POKEAPI_TIMEOUT_SECS") {
            self.request_timeout_secs = secs;
        }
        if let Some(limit) = parse_value(&lookup, "POKEAPI_PAGE_LIMIT") {
            self.page_limit = limit;
        }
        if let Some(concurrency) = parse_value(&lookup, "POKEAPI_CONCURRENCY") {
            self.max_concurrent_requests = concurrency;
        }
        self.clamped()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn clamped(mut self) -> Self {
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        self.page_limit = self.page_limit.max(1);
        self.max_concurrent_requests = self.max_concurrent_requests.max(1);
        self
    }
}

fn parse_value<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)?.trim().parse().ok()
}
