//! Fallback snapshot documents.
//!
//! A snapshot is a static JSON document holding the last known series for every
//! metric and fixed period:
//!
//! ```json
//! {
//!   "updatedAt": "2025-01-06T00:00:00Z",
//!   "kospi":  { "1d": { "series": [...], "stats": {...} }, "1w": {...}, "1m": {...}, "3m": {...} },
//!   "usdkrw": { "1d": {...}, "1w": {...}, "1m": {...}, "3m": {...} }
//! }
//! ```
//!
//! Entries are decoded lazily so one malformed bucket does not hide the others.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{FetchError, Metric, Period, SeriesResponse, UtcDateTime};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackSnapshot {
    /// Absent when the stamp is missing or unreadable; the series stay usable.
    #[serde(
        rename = "updatedAt",
        default,
        deserialize_with = "lenient_updated_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<UtcDateTime>,
    #[serde(flatten)]
    entries: BTreeMap<String, Value>,
}

impl FallbackSnapshot {
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Extracts the entry serving `metric`/`period`, annotated as fallback data.
    ///
    /// Custom periods read the one-month bucket and report the substitution via
    /// `fallback_period`. A missing or empty entry is [`FetchError::NoData`].
    pub fn lookup(&self, metric: Metric, period: Period) -> Result<SeriesResponse, FetchError> {
        let key = period.snapshot_key();
        let no_data = || FetchError::NoData { metric, period };

        let entry = self
            .entries
            .get(metric.as_str())
            .and_then(|buckets| buckets.get(key.as_str()))
            .filter(|entry| !entry.is_null())
            .ok_or_else(no_data)?;

        let mut response = SeriesResponse::deserialize(entry)?.normalize();
        if response.is_empty() {
            return Err(no_data());
        }

        response.fallback = true;
        response.fallback_updated_at = self.updated_at;
        if key != period {
            response.fallback_period = Some(key);
        }
        Ok(response)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One bucket that could not be fetched while building a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFailure {
    pub metric: Metric,
    pub period: Period,
    pub error: FetchError,
}

/// Outcome of a snapshot build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub succeeded: usize,
    pub failed: Vec<SnapshotFailure>,
}

/// Assembles a [`FallbackSnapshot`] bucket by bucket.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entries: BTreeMap<String, BTreeMap<String, Value>>,
    report: SnapshotReport,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the outcome for one bucket. Failures are kept as an empty series
    /// with null stats so readers see the bucket exists but has no data.
    pub fn record(
        &mut self,
        metric: Metric,
        period: Period,
        outcome: Result<SeriesResponse, FetchError>,
    ) -> Result<(), serde_json::Error> {
        let response = match outcome {
            Ok(response) => {
                self.report.succeeded += 1;
                response
            }
            Err(error) => {
                self.report.failed.push(SnapshotFailure {
                    metric,
                    period,
                    error,
                });
                SeriesResponse::empty(metric, period)
            }
        };

        self.entries
            .entry(metric.as_str().to_owned())
            .or_default()
            .insert(period.as_str().to_owned(), serde_json::to_value(response)?);
        Ok(())
    }

    pub fn finish(self, updated_at: UtcDateTime) -> (FallbackSnapshot, SnapshotReport) {
        let entries = self
            .entries
            .into_iter()
            .map(|(metric, buckets)| (metric, Value::Object(buckets.into_iter().collect())))
            .collect();

        (
            FallbackSnapshot {
                updated_at: Some(updated_at),
                entries,
            },
            self.report,
        )
    }
}

fn lenient_updated_at<'de, D>(deserializer: D) -> Result<Option<UtcDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let stamp = match raw {
        Some(Value::String(stamp)) => stamp,
        None | Some(Value::Null) => return Ok(None),
        Some(other) => {
            tracing::warn!(updated_at = %other, "ignoring non-string snapshot timestamp");
            return Ok(None);
        }
    };

    match UtcDateTime::parse(&stamp) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable snapshot timestamp");
            Ok(None)
        }
    }
}
