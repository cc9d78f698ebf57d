//! Fetcher configuration.
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var | Default |
//! |---------|-----------------|------------------|---------|
//! | Live endpoint base URL | `MARKETPULSE_API_BASE_URL` | `API_BASE_URL` | `http://localhost:8001` |
//! | External snapshot URL | `MARKETPULSE_FALLBACK_URL` | `FALLBACK_URL` | none |
//! | Local snapshot file | `MARKETPULSE_FALLBACK_PATH` | - | `public/fallback-data.json` |
//!
//! The primary request timeout is fixed at 10 seconds and is not read from the
//! environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::fallback::FallbackSource;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_FALLBACK_PATH: &str = "public/fallback-data.json";
/// Bounded wait for the live endpoint; covers cold starts of an on-demand backend.
pub const PRIMARY_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Freshness window of cached series.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    api_base_url: String,
    fallback_url: Option<String>,
    fallback_path: PathBuf,
    timeout: Duration,
    cache_ttl: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            fallback_url: None,
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_PATH),
            timeout: PRIMARY_TIMEOUT,
            cache_ttl: CACHE_TTL,
        }
    }
}

impl FetcherConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self::default().with_api_base_url(api_base_url)
    }

    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read("MARKETPULSE_API_BASE_URL").or_else(|| read("API_BASE_URL")) {
            config = config.with_api_base_url(url);
        }
        if let Some(url) = read("MARKETPULSE_FALLBACK_URL").or_else(|| read("FALLBACK_URL")) {
            config = config.with_fallback_url(url);
        }
        if let Some(path) = read("MARKETPULSE_FALLBACK_PATH") {
            config = config.with_fallback_path(path);
        }

        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = Some(url.into().trim().to_owned());
        self
    }

    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn fallback_url(&self) -> Option<&str> {
        self.fallback_url.as_deref()
    }

    pub fn fallback_path(&self) -> &PathBuf {
        &self.fallback_path
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Snapshot sources in priority order: external URL first, then the local file.
    pub fn fallback_sources(&self) -> Vec<FallbackSource> {
        let mut sources = Vec::with_capacity(2);
        if let Some(url) = &self.fallback_url {
            sources.push(FallbackSource::Remote(url.clone()));
        }
        sources.push(FallbackSource::LocalFile(self.fallback_path.clone()));
        sources
    }
}
