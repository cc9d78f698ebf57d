//! Behavior-driven tests for the combined dashboard view
//!
//! These tests verify WHAT a presentation layer receives when both series are
//! loaded together: aligned rows, per-series price moves and co-movement.

use marketpulse_core::{
    load_dashboard, DashboardQuery, Direction, FetchError, FetcherConfig, HttpClient, HttpError,
    HttpFuture, HttpRequest, HttpResponse, Period, SeriesDate, SeriesFetcher,
};
use std::sync::{Arc, Mutex};

/// Serves one body per metric and records requested URLs.
struct MetricClient {
    kospi: Option<String>,
    usdkrw: Option<String>,
    urls: Mutex<Vec<String>>,
}

impl MetricClient {
    fn new(kospi: Option<&str>, usdkrw: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            kospi: kospi.map(str::to_owned),
            usdkrw: usdkrw.map(str::to_owned),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("lock").clone()
    }
}

impl HttpClient for MetricClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        self.urls.lock().expect("lock").push(request.url.clone());
        let body = if request.url.contains("metric=kospi") {
            self.kospi.clone()
        } else {
            self.usdkrw.clone()
        };
        Box::pin(async move {
            body.map(HttpResponse::ok_json)
                .ok_or_else(|| HttpError::new("connection refused"))
        })
    }
}

const KOSPI: &str = r#"{
    "metric": "kospi",
    "period": "1w",
    "series": [
        {"date": "2024-01-02", "value": 2669.81},
        {"date": "2024-01-03", "value": 2607.31},
        {"date": "2024-01-04", "value": 2587.02}
    ],
    "stats": {"min": 2587.02, "max": 2669.81, "avg": 2621.38, "change": -82.79, "changePct": -3.1}
}"#;

const USDKRW: &str = r#"{
    "metric": "usdkrw",
    "period": "1w",
    "series": [
        {"date": "2024-01-02", "value": 1300.4},
        {"date": "2024-01-03", "value": 1310.2}
    ],
    "stats": {}
}"#;

fn fetcher(client: Arc<MetricClient>) -> SeriesFetcher {
    let dir = std::env::temp_dir().join("marketpulse-dashboard-no-snapshot");
    let config =
        FetcherConfig::new("http://primary.test").with_fallback_path(dir.join("fallback.json"));
    SeriesFetcher::new(config, client)
}

fn date(value: &str) -> SeriesDate {
    SeriesDate::parse(value).expect("valid date")
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn when_both_series_load_system_builds_aligned_view() {
    // Given: Both series available with different lengths
    let client = MetricClient::new(Some(KOSPI), Some(USDKRW));
    let fetcher = fetcher(Arc::clone(&client));

    // When: The one-week dashboard is loaded
    let view = load_dashboard(&fetcher, &DashboardQuery::new(Period::OneWeek))
        .await
        .expect("dashboard loads");

    // Then: Rows follow the longer series with gaps on the shorter one
    assert_eq!(view.merged.len(), 3);
    assert_eq!(view.merged[2].secondary_value, None);
    assert_eq!(view.merged[2].date, date("2024-01-04"));
    assert!(!view.degraded);

    // Then: Missing stats are recomputed so both sides can be compared
    let comparison = view.comparison.expect("both series have stats");
    assert_eq!(comparison.direction, Direction::Opposite);
    assert_eq!(comparison.secondary.change, 9.8);

    // Then: The latest move compares the last two points
    let kospi = view.kospi_price.expect("kospi has points");
    assert_eq!(kospi.latest.value, 2587.02);
    assert!(!kospi.is_up());
    assert_eq!(client.urls().len(), 2);
}

#[tokio::test]
async fn when_one_series_is_unavailable_system_fails_the_dashboard() {
    // Given: USD/KRW unreachable and no snapshot on disk
    let client = MetricClient::new(Some(KOSPI), None);
    let fetcher = fetcher(client);

    // When: The dashboard is loaded
    let error = load_dashboard(&fetcher, &DashboardQuery::new(Period::OneWeek))
        .await
        .expect_err("usdkrw exhausted every source");

    // Then: The user-facing error is the exhausted-fallback message
    assert!(matches!(error, FetchError::ExhaustedFallback { .. }));
    assert_eq!(error.to_string(), "cannot reach server, try again later");
}

// =============================================================================
// Custom ranges
// =============================================================================

#[tokio::test]
async fn when_custom_range_is_inverted_system_sends_no_request() {
    // Given: A custom range whose start follows its end
    let client = MetricClient::new(Some(KOSPI), Some(USDKRW));
    let fetcher = fetcher(Arc::clone(&client));
    let query = DashboardQuery::custom(date("2024-02-01"), date("2024-01-01"));

    // When: The dashboard is loaded
    let error = load_dashboard(&fetcher, &query)
        .await
        .expect_err("inverted range");

    // Then: Validation fails up front
    assert_eq!(error.code(), "fetch.invalid_request");
    assert!(client.urls().is_empty());
}

#[tokio::test]
async fn when_custom_range_is_valid_system_passes_bounds_to_both_series() {
    // Given: A complete custom range
    let client = MetricClient::new(Some(KOSPI), Some(USDKRW));
    let fetcher = fetcher(Arc::clone(&client));
    let query = DashboardQuery::custom(date("2024-01-01"), date("2024-01-31"));

    // When: The dashboard is loaded
    load_dashboard(&fetcher, &query).await.expect("loads");

    // Then: Each request carries the date bounds
    let mut urls = client.urls();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "http://primary.test/api/series?metric=kospi&period=custom&startDate=2024-01-01&endDate=2024-01-31",
            "http://primary.test/api/series?metric=usdkrw&period=custom&startDate=2024-01-01&endDate=2024-01-31",
        ]
    );
}
