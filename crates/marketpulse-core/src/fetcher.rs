//! Series fetching with a bounded primary attempt and snapshot fallback.
//!
//! ```text
//! fetch(request)
//!   ├─ cache hit ───────────────────────────────▶ cached response
//!   ├─ primary  GET /api/series (10 s bound) ───▶ response
//!   └─ on any primary failure:
//!        external snapshot URL ─┐ first non-empty
//!        local snapshot file  ──┴───────────────▶ response (_fallback = true)
//!        all failed ────────────────────────────▶ FetchError::ExhaustedFallback
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::cache::{CacheMode, SeriesCache};
use crate::config::FetcherConfig;
use crate::fallback::{elapsed_ms, first_success, FallbackSource};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{FetchError, FetchRequest, SeriesResponse, SourceFailure, SourceId};

/// Obtains series from the live endpoint, degrading to snapshot documents.
pub struct SeriesFetcher {
    config: FetcherConfig,
    client: Arc<dyn HttpClient>,
    cache: SeriesCache,
}

impl SeriesFetcher {
    pub fn new(config: FetcherConfig, client: Arc<dyn HttpClient>) -> Self {
        let cache = SeriesCache::new(config.cache_ttl());
        Self {
            config,
            client,
            cache,
        }
    }

    /// Production fetcher configured from the environment.
    pub fn from_env() -> Self {
        Self::new(FetcherConfig::from_env(), Arc::new(ReqwestHttpClient::new()))
    }

    /// Replaces the cache, e.g. to share one cache between fetchers.
    pub fn with_cache(mut self, cache: SeriesCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Live endpoint URL for `request`.
    pub fn series_url(&self, request: &FetchRequest) -> String {
        let query = request
            .query_pairs()
            .into_iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/api/series?{query}", self.config.api_base_url())
    }

    /// Fetches a series, serving fresh cached data when available.
    ///
    /// # Errors
    ///
    /// [`FetchError::ExhaustedFallback`] once the primary endpoint and every
    /// snapshot source failed, or [`FetchError::Validation`] for an inverted range.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<SeriesResponse, FetchError> {
        self.fetch_with_mode(request, CacheMode::Use).await
    }

    pub async fn fetch_with_mode(
        &self,
        request: &FetchRequest,
        mode: CacheMode,
    ) -> Result<SeriesResponse, FetchError> {
        request.validate()?;

        let _guard = if mode.writes() {
            Some(self.cache.lock_key(request).await)
        } else {
            None
        };

        if mode.reads() {
            if let Some(hit) = self.cache.get(request).await {
                tracing::debug!(metric = %request.metric, period = %request.period, "series cache hit");
                return Ok(hit);
            }
        }

        let response = self.resolve(request).await?;
        if mode.writes() {
            self.cache.put(*request, response.clone()).await;
        }
        Ok(response)
    }

    /// Single attempt against the live endpoint, without fallback.
    ///
    /// The attempt is abandoned once the configured timeout elapses. Non-2xx
    /// statuses and undecodable bodies are failures.
    pub async fn fetch_primary(
        &self,
        request: &FetchRequest,
    ) -> Result<SeriesResponse, FetchError> {
        request.validate()?;

        let url = self.series_url(request);
        tracing::info!(%url, "requesting series");

        let started = Instant::now();
        let outcome = self
            .bounded_get(&url)
            .await
            .and_then(|response| decode_series(&response));
        let latency_ms = elapsed_ms(started);

        match &outcome {
            Ok(response) => tracing::info!(
                metric = %request.metric,
                period = %request.period,
                points = response.series.len(),
                latency_ms,
                "series received"
            ),
            Err(error) => tracing::warn!(
                metric = %request.metric,
                period = %request.period,
                code = error.code(),
                latency_ms,
                %error,
                "primary series request failed"
            ),
        }

        outcome
    }

    /// Liveness check of the live endpoint; returns the reported status.
    pub async fn health(&self) -> Result<String, FetchError> {
        #[derive(Deserialize)]
        struct HealthBody {
            status: String,
        }

        let url = format!("{}/health", self.config.api_base_url());
        let response = self.bounded_get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }
        let body: HealthBody = serde_json::from_str(&response.body)?;
        Ok(body.status)
    }

    async fn bounded_get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let timeout = self.config.timeout();
        let request = HttpRequest::get(url).with_timeout(timeout);

        match tokio::time::timeout(timeout, self.client.execute(request)).await {
            Ok(result) => result.map_err(FetchError::from),
            Err(_) => Err(FetchError::timeout(format!(
                "no response within {} ms",
                timeout.as_millis()
            ))),
        }
    }

    async fn resolve(&self, request: &FetchRequest) -> Result<SeriesResponse, FetchError> {
        let primary_error = match self.fetch_primary(request).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        let client = self.client.as_ref();
        let chain = first_success(self.config.fallback_sources(), move |source: FallbackSource| {
            async move {
                tracing::info!(source = %source.id(), location = %source.location(), "trying fallback snapshot");
                let snapshot = source.load(client).await?;
                snapshot.lookup(request.metric, request.period)
            }
        })
        .await;

        match chain {
            Ok(success) => {
                tracing::warn!(
                    metric = %request.metric,
                    period = %request.period,
                    source = %success.selected.id(),
                    substituted_period = ?success.data.fallback_period,
                    skipped = success.failures.len(),
                    latency_ms = success.latency_ms,
                    "serving fallback snapshot data"
                );
                Ok(success.data)
            }
            Err(failure) => {
                let mut attempts = Vec::with_capacity(failure.failures.len() + 1);
                attempts.push(SourceFailure {
                    source: SourceId::Primary,
                    error: primary_error,
                });
                attempts.extend(failure.failures.into_iter().map(|(source, error)| {
                    SourceFailure {
                        source: source.id(),
                        error,
                    }
                }));

                tracing::error!(
                    metric = %request.metric,
                    period = %request.period,
                    attempts = attempts.len(),
                    "all series sources failed"
                );
                Err(FetchError::ExhaustedFallback { attempts })
            }
        }
    }
}

fn decode_series(response: &HttpResponse) -> Result<SeriesResponse, FetchError> {
    if !response.is_success() {
        return Err(FetchError::Http {
            status: response.status,
        });
    }
    let parsed: SeriesResponse = serde_json::from_str(&response.body)?;
    Ok(parsed.normalize())
}
