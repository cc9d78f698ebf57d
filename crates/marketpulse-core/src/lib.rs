//! # Marketpulse Core
//!
//! Resilient series fetching and alignment for a KOSPI versus USD/KRW dashboard.
//!
//! ## Overview
//!
//! - **Domain types** for metrics, periods, dated points and period statistics
//! - **Series fetcher** with a bounded primary request and ordered snapshot fallback
//! - **Query cache** keyed by request parameters with a five-minute freshness window
//! - **Series alignment** pairing two independently dated series by position
//! - **Derived statistics** for the latest move and same-direction classification
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`align`] | Index-aligned merge of two series |
//! | [`cache`] | Query cache and cache modes |
//! | [`config`] | Endpoint, fallback and timeout configuration |
//! | [`dashboard`] | Concurrent fetch of both series and the combined view |
//! | [`domain`] | Metric, period, point, stats and response types |
//! | [`error`] | Validation and fetch errors |
//! | [`fallback`] | Snapshot sources and the first-success combinator |
//! | [`fetcher`] | The series fetcher |
//! | [`http_client`] | HTTP transport seam |
//! | [`snapshot`] | Fallback snapshot documents |
//! | [`stats`] | Latest change and co-movement |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marketpulse_core::{load_dashboard, DashboardQuery, Period, SeriesFetcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = SeriesFetcher::from_env();
//!     let view = load_dashboard(&fetcher, &DashboardQuery::new(Period::OneMonth)).await?;
//!
//!     if let Some(comparison) = view.comparison {
//!         println!("{}", comparison.direction.describe());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Dashboard      │  try_join!(kospi, usdkrw)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Series Fetcher  │────▶│ Series Cache     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Primary (10 s)  │────▶│ HTTP Client      │
//! └────────┬────────┘     │ (reqwest)        │
//!          │ on failure   └──────────────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Snapshot chain  │  remote URL → local file
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Align + Stats   │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Primary and per-source failures are absorbed by the fallback chain. Callers
//! see a single terminal error once every source failed:
//!
//! ```rust
//! use marketpulse_core::FetchError;
//!
//! fn describe(error: &FetchError) -> String {
//!     match error {
//!         FetchError::ExhaustedFallback { attempts } => {
//!             format!("{error} ({} attempts)", attempts.len())
//!         }
//!         other => other.to_string(),
//!     }
//! }
//! ```

pub mod align;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod http_client;
pub mod snapshot;
pub mod stats;

// Alignment
pub use align::{merge, MergedPoint};

// Caching
pub use cache::{CacheMode, SeriesCache};

// Configuration
pub use config::FetcherConfig;

// Dashboard join
pub use dashboard::{load_dashboard, DashboardQuery, DashboardView};

// Domain models
pub use domain::{
    FetchRequest, Metric, Period, SeriesDate, SeriesPoint, SeriesResponse, SeriesStats,
    UtcDateTime,
};

// Error types
pub use error::{FetchError, SourceFailure, SourceId, ValidationError};

// Fallback chain
pub use fallback::{first_success, ChainFailure, ChainResult, ChainSuccess, FallbackSource};

// Fetcher
pub use fetcher::SeriesFetcher;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient};

// Snapshots
pub use snapshot::{FallbackSnapshot, SnapshotBuilder, SnapshotFailure, SnapshotReport};

// Derived statistics
pub use stats::{Comparison, Direction, PriceChange};
