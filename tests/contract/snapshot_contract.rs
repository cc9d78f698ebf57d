//! Contract tests for the fallback snapshot document format
//!
//! Every snapshot producer must emit documents these tests accept, and every
//! consumer must read them the same way.

use marketpulse_core::{
    FallbackSnapshot, FetchError, Metric, Period, SeriesResponse, SnapshotBuilder, UtcDateTime,
};

/// A document as written by a scheduled snapshot job: a microsecond timestamp
/// with an explicit UTC offset, failed buckets with null stats, and an extra
/// bucket no reader asks for.
const PUBLISHED: &str = r#"{
  "kospi": {
    "1d": {"metric": "kospi", "period": "1d", "series": [{"date": "2025-01-03", "value": 2441.92}], "stats": {"min": 2441.92, "max": 2441.92, "avg": 2441.92, "change": 0.0, "changePct": 0.0}},
    "1w": {"metric": "kospi", "period": "1w", "series": [{"date": "2024-12-30", "value": 2399.49}, {"date": "2025-01-03", "value": 2441.92}], "stats": {"min": 2399.49, "max": 2441.92, "avg": 2420.71, "change": 42.43, "changePct": 1.77}},
    "1m": {"metric": "kospi", "period": "1m", "series": [{"date": "2024-12-06", "value": 2428.16}, {"date": "2025-01-03", "value": 2441.92}], "stats": {"min": 2428.16, "max": 2441.92, "avg": 2435.04, "change": 13.76, "changePct": 0.57}},
    "3m": {"metric": "kospi", "period": "3m", "series": [], "stats": null},
    "1y": {"metric": "kospi", "period": "1y", "series": [{"date": "2024-01-02", "value": 2669.81}], "stats": null}
  },
  "usdkrw": {
    "1d": {"metric": "usdkrw", "period": "1d", "series": [{"date": "2025-01-03", "value": 1467.5}], "stats": {}},
    "1w": {"metric": "usdkrw", "period": "1w", "series": [{"date": "2024-12-30", "value": 1472.5}, {"date": "2025-01-03", "value": 1467.5}], "stats": null},
    "1m": {"metric": "usdkrw", "period": "1m", "series": [{"date": "2024-12-06", "value": 1418.1}, {"date": "2025-01-03", "value": 1467.5}]},
    "3m": {"metric": "usdkrw", "period": "3m", "series": [{"date": "2024-10-04", "value": 1346.5}, {"date": "2025-01-03", "value": 1467.5}], "stats": {"min": 1346.5, "max": 1467.5, "avg": 1407.0, "change": 121.0, "changePct": 8.99}}
  },
  "updatedAt": "2025-01-03T21:00:04.512331+00:00"
}"#;

fn published() -> FallbackSnapshot {
    FallbackSnapshot::parse(PUBLISHED).expect("published snapshot parses")
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn contract_every_populated_bucket_is_served_as_fallback_data() {
    let snapshot = published();

    for metric in Metric::ALL {
        for period in Period::SNAPSHOT_PERIODS {
            if (metric, period) == (Metric::Kospi, Period::ThreeMonths) {
                continue;
            }
            let response = snapshot
                .lookup(metric, period)
                .unwrap_or_else(|error| panic!("{metric}/{period} should be served: {error}"));

            assert!(response.fallback, "{metric}/{period} must be marked");
            assert!(response.fallback_updated_at.is_some());
            assert!(response.fallback_period.is_none());
            assert!(!response.series.is_empty());
            assert!(
                response.stats.is_some(),
                "{metric}/{period} stats are filled when absent"
            );
            assert!(response
                .series
                .windows(2)
                .all(|pair| pair[0].date <= pair[1].date));
        }
    }
}

#[test]
fn contract_empty_bucket_is_no_data_not_an_empty_success() {
    let error = published()
        .lookup(Metric::Kospi, Period::ThreeMonths)
        .expect_err("empty bucket");

    assert_eq!(
        error,
        FetchError::NoData {
            metric: Metric::Kospi,
            period: Period::ThreeMonths
        }
    );
}

#[test]
fn contract_custom_period_reads_one_month_bucket() {
    let response = published()
        .lookup(Metric::Usdkrw, Period::Custom)
        .expect("1m bucket");

    assert_eq!(response.fallback_period, Some(Period::OneMonth));
    assert_eq!(response.series.len(), 2);
}

#[test]
fn contract_published_stats_are_kept_verbatim() {
    let response = published()
        .lookup(Metric::Kospi, Period::OneWeek)
        .expect("1w bucket");

    let stats = response.stats.expect("stats present");
    assert_eq!(stats.avg, 2420.71);
    assert_eq!(stats.change_pct, 1.77);
}

#[test]
fn contract_timestamp_with_offset_is_read_as_utc() {
    let updated_at = published().updated_at.expect("timestamp present");

    assert_eq!(
        updated_at.format_rfc3339(),
        UtcDateTime::parse("2025-01-03T21:00:04.512331Z")
            .expect("valid")
            .format_rfc3339()
    );
}

#[test]
fn contract_missing_metric_is_no_data() {
    let snapshot = FallbackSnapshot::parse(r#"{"updatedAt": "2025-01-03T21:00:04Z"}"#)
        .expect("minimal snapshot");

    assert!(matches!(
        snapshot.lookup(Metric::Kospi, Period::OneDay),
        Err(FetchError::NoData { .. })
    ));
}

// =============================================================================
// Writing
// =============================================================================

#[test]
fn contract_built_snapshot_is_readable_by_consumers() {
    let mut builder = SnapshotBuilder::new();
    let series: SeriesResponse = serde_json::from_str(
        r#"{"series": [{"date": "2025-01-02", "value": 2398.94}, {"date": "2025-01-03", "value": 2441.92}]}"#,
    )
    .expect("series parses");

    builder
        .record(Metric::Kospi, Period::OneWeek, Ok(series))
        .expect("recorded");
    builder
        .record(
            Metric::Kospi,
            Period::OneDay,
            Err(FetchError::Http { status: 503 }),
        )
        .expect("recorded");

    let updated_at = UtcDateTime::parse("2025-01-03T21:00:00Z").expect("valid");
    let (snapshot, report) = builder.finish(updated_at);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed.len(), 1);

    let written = snapshot.to_json_pretty().expect("serializes");
    let document: serde_json::Value = serde_json::from_str(&written).expect("json");
    assert_eq!(document["updatedAt"], "2025-01-03T21:00:00Z");
    assert_eq!(document["kospi"]["1d"]["series"], serde_json::json!([]));
    assert!(document["kospi"]["1d"]["stats"].is_null());

    let reread = FallbackSnapshot::parse(&written).expect("reparses");
    assert!(reread.lookup(Metric::Kospi, Period::OneWeek).is_ok());
    assert!(matches!(
        reread.lookup(Metric::Kospi, Period::OneDay),
        Err(FetchError::NoData { .. })
    ));
}
