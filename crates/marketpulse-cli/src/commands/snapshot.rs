use std::fs;
use std::path::Path;
use std::time::Duration;

use marketpulse_core::http_client::DEFAULT_TRANSPORT_TIMEOUT;
use marketpulse_core::{
    FallbackSnapshot, FetchRequest, FetcherConfig, Metric, Period, SnapshotBuilder, SnapshotReport,
    UtcDateTime,
};
use serde_json::{json, Value};

use crate::cli::SnapshotArgs;
use crate::error::CliError;

use super::{fetcher, CommandResult};

pub async fn run(
    args: &SnapshotArgs,
    config: FetcherConfig,
    explicit_timeout: bool,
) -> Result<CommandResult, CliError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.fallback_path().clone());

    // Snapshot builds are offline jobs; allow slow cold starts and never cache.
    let config = if explicit_timeout {
        config
    } else {
        config.with_timeout(DEFAULT_TRANSPORT_TIMEOUT)
    }
    .with_cache_ttl(Duration::ZERO);
    let fetcher = fetcher(config);

    let url = fetcher.config().api_base_url().to_owned();
    let status = fetcher
        .health()
        .await
        .map_err(|source| CliError::Unreachable {
            url: url.clone(),
            source,
        })?;
    tracing::info!(%url, %status, "backend healthy, building snapshot");

    let mut builder = SnapshotBuilder::new();
    for metric in Metric::ALL {
        for period in Period::SNAPSHOT_PERIODS {
            let request = FetchRequest::new(metric, period);
            let outcome = fetcher
                .fetch_primary(&request)
                .await
                .map(|response| response.with_request(&request));
            builder.record(metric, period, outcome)?;
        }
    }

    let (snapshot, report) = builder.finish(UtcDateTime::now());
    write_snapshot(&output, &snapshot)?;

    Ok(CommandResult::ok(summary(&output, &snapshot, &report)))
}

/// Writes the document, creating parent directories as needed.
fn write_snapshot(path: &Path, snapshot: &FallbackSnapshot) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, snapshot.to_json_pretty()?)?;
    Ok(())
}

fn summary(output: &Path, snapshot: &FallbackSnapshot, report: &SnapshotReport) -> Value {
    let failed: Vec<Value> = report
        .failed
        .iter()
        .map(|failure| {
            json!({
                "metric": failure.metric,
                "period": failure.period,
                "code": failure.error.code(),
                "error": failure.error.to_string(),
            })
        })
        .collect();

    json!({
        "output": output.display().to_string(),
        "updatedAt": snapshot.updated_at,
        "succeeded": report.succeeded,
        "failed": failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketpulse_core::{FetchError, SeriesResponse};

    fn built() -> (FallbackSnapshot, SnapshotReport) {
        let mut builder = SnapshotBuilder::new();
        let series: SeriesResponse =
            serde_json::from_str(r#"{"series": [{"date": "2025-01-03", "value": 2441.92}]}"#)
                .expect("series");
        builder
            .record(Metric::Kospi, Period::OneDay, Ok(series))
            .expect("recorded");
        builder
            .record(
                Metric::Usdkrw,
                Period::OneDay,
                Err(FetchError::timeout("no response within 30000 ms")),
            )
            .expect("recorded");
        builder.finish(UtcDateTime::parse("2025-01-03T21:00:00Z").expect("valid"))
    }

    #[test]
    fn writes_snapshot_into_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("public").join("fallback-data.json");
        let (snapshot, _) = built();

        write_snapshot(&path, &snapshot).expect("written");

        let written = fs::read_to_string(&path).expect("readable");
        let reread = FallbackSnapshot::parse(&written).expect("parses");
        assert!(reread.lookup(Metric::Kospi, Period::OneDay).is_ok());
        assert!(reread.lookup(Metric::Usdkrw, Period::OneDay).is_err());
    }

    #[test]
    fn summary_lists_failed_buckets() {
        let (snapshot, report) = built();

        let summary = summary(Path::new("out.json"), &snapshot, &report);

        assert_eq!(summary["succeeded"], 1);
        assert_eq!(summary["updatedAt"], "2025-01-03T21:00:00Z");
        assert_eq!(summary["failed"][0]["metric"], "usdkrw");
        assert_eq!(summary["failed"][0]["period"], "1d");
        assert_eq!(summary["failed"][0]["code"], "fetch.timeout");
    }
}
