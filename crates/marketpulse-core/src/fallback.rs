//! Ordered fallback resolution.
//!
//! Sources are a priority list: each is tried only after the previous one
//! failed, and the first success wins. Sources are never raced.

use std::fmt::Debug;
use std::future::Future;
use std::path::PathBuf;
use std::time::Instant;

use crate::http_client::{HttpClient, HttpRequest};
use crate::snapshot::FallbackSnapshot;
use crate::{FetchError, SourceId};

/// Location of a snapshot document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackSource {
    /// Externally hosted document fetched over HTTP.
    Remote(String),
    /// Static document on the local filesystem.
    LocalFile(PathBuf),
}

impl FallbackSource {
    pub const fn id(&self) -> SourceId {
        match self {
            Self::Remote(_) => SourceId::RemoteSnapshot,
            Self::LocalFile(_) => SourceId::LocalSnapshot,
        }
    }

    pub fn location(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::LocalFile(path) => path.display().to_string(),
        }
    }

    /// Reads and parses the document. Remote reads are bounded only by the
    /// transport's own timeout.
    pub async fn load(&self, client: &dyn HttpClient) -> Result<FallbackSnapshot, FetchError> {
        let body = match self {
            Self::Remote(url) => {
                let response = client.execute(HttpRequest::get(url.clone())).await?;
                if !response.is_success() {
                    return Err(FetchError::Http {
                        status: response.status,
                    });
                }
                response.body
            }
            Self::LocalFile(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| FetchError::Io {
                        message: format!("{}: {e}", path.display()),
                    })?
            }
        };

        FallbackSnapshot::parse(&body)
    }
}

/// First successful attempt of a chain.
#[derive(Debug, Clone)]
pub struct ChainSuccess<S, T> {
    pub data: T,
    pub selected: S,
    pub chain: Vec<S>,
    pub failures: Vec<(S, FetchError)>,
    pub latency_ms: u64,
}

/// Every source of a chain failed.
#[derive(Debug, Clone)]
pub struct ChainFailure<S> {
    pub chain: Vec<S>,
    pub failures: Vec<(S, FetchError)>,
    pub latency_ms: u64,
}

pub type ChainResult<S, T> = Result<ChainSuccess<S, T>, ChainFailure<S>>;

/// Tries `attempt` on each source in order and stops at the first `Ok`.
///
/// A failed source is recorded and skipped, never retried.
pub async fn first_success<S, T, I, F, Fut>(sources: I, mut attempt: F) -> ChainResult<S, T>
where
    S: Clone + Debug,
    I: IntoIterator<Item = S>,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let started = Instant::now();
    let mut chain = Vec::new();
    let mut failures = Vec::new();

    for source in sources {
        chain.push(source.clone());
        match attempt(source.clone()).await {
            Ok(data) => {
                return Ok(ChainSuccess {
                    data,
                    selected: source,
                    chain,
                    failures,
                    latency_ms: elapsed_ms(started),
                });
            }
            Err(error) => {
                tracing::debug!(source = ?source, code = error.code(), %error, "chain source failed");
                failures.push((source, error));
            }
        }
    }

    Err(ChainFailure {
        chain,
        failures,
        latency_ms: elapsed_ms(started),
    })
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
