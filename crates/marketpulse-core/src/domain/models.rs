use serde::{Deserialize, Deserializer, Serialize};

use crate::{Metric, Period, SeriesDate, UtcDateTime, ValidationError};

/// One dated observation of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: SeriesDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: SeriesDate, value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "value" });
        }
        Ok(Self { date, value })
    }

    /// Convenience constructor from an ISO date string.
    pub fn parse(date: &str, value: f64) -> Result<Self, ValidationError> {
        Self::new(SeriesDate::parse(date)?, value)
    }
}

/// Summary statistics over the points of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl SeriesStats {
    /// Derives period statistics: extremes, mean, and first-to-last change.
    ///
    /// Every field is rounded to two decimals. `change_pct` is zero when the
    /// first value is zero. Returns `None` for an empty series.
    pub fn from_series(series: &[SeriesPoint]) -> Option<Self> {
        let first = series.first()?.value;
        let last = series.last()?.value;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for point in series {
            min = min.min(point.value);
            max = max.max(point.value);
            sum += point.value;
        }

        let avg = sum / series.len() as f64;
        let change = last - first;
        let change_pct = if first == 0.0 {
            0.0
        } else {
            change / first * 100.0
        };

        Some(Self {
            min: round2(min),
            max: round2(max),
            avg: round2(avg),
            change: round2(change),
            change_pct: round2(change_pct),
        })
    }

    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

/// Series payload as served by the live endpoint and stored in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<SeriesDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<SeriesDate>,
    pub series: Vec<SeriesPoint>,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats: Option<SeriesStats>,
    /// Set when the data came from a degraded fallback source.
    #[serde(rename = "_fallback", default, skip_serializing_if = "is_false")]
    pub fallback: bool,
    #[serde(
        rename = "_fallbackUpdatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fallback_updated_at: Option<UtcDateTime>,
    /// Snapshot bucket actually served when it differs from the requested period.
    #[serde(
        rename = "_fallbackPeriod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fallback_period: Option<Period>,
}

impl SeriesResponse {
    pub fn new(series: Vec<SeriesPoint>) -> Self {
        let stats = SeriesStats::from_series(&series);
        Self {
            metric: None,
            period: None,
            start_date: None,
            end_date: None,
            series,
            stats,
            fallback: false,
            fallback_updated_at: None,
            fallback_period: None,
        }
    }

    /// Response stored for a bucket whose fetch failed.
    pub fn empty(metric: Metric, period: Period) -> Self {
        Self {
            metric: Some(metric),
            period: Some(period),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_request(mut self, request: &FetchRequest) -> Self {
        self.metric = Some(request.metric);
        self.period = Some(request.period);
        self.start_date = request.start_date;
        self.end_date = request.end_date;
        self
    }

    /// Sorts points oldest to newest and fills in missing statistics.
    pub fn normalize(mut self) -> Self {
        if !self
            .series
            .windows(2)
            .all(|pair| pair[0].date <= pair[1].date)
        {
            self.series.sort_by_key(|point| point.date);
        }
        if self.stats.is_none() {
            self.stats = SeriesStats::from_series(&self.series);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.series.last()
    }
}

/// Parameters identifying one series query. Also the query cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub metric: Metric,
    pub period: Period,
    pub start_date: Option<SeriesDate>,
    pub end_date: Option<SeriesDate>,
}

impl FetchRequest {
    /// Request without explicit bounds.
    pub const fn new(metric: Metric, period: Period) -> Self {
        Self {
            metric,
            period,
            start_date: None,
            end_date: None,
        }
    }

    /// Custom-range request. Rejects `start > end`.
    pub fn custom(
        metric: Metric,
        start: SeriesDate,
        end: SeriesDate,
    ) -> Result<Self, ValidationError> {
        Self::with_bounds(metric, Period::Custom, Some(start), Some(end))
    }

    /// Bounds only apply to the custom period and are dropped otherwise.
    pub fn with_bounds(
        metric: Metric,
        period: Period,
        start_date: Option<SeriesDate>,
        end_date: Option<SeriesDate>,
    ) -> Result<Self, ValidationError> {
        if !period.is_custom() {
            return Ok(Self::new(metric, period));
        }

        let request = Self {
            metric,
            period,
            start_date,
            end_date,
        };
        request.validate()?;
        Ok(request)
    }

    /// Checks the range invariant for requests assembled field by field.
    ///
    /// A custom period needs both bounds; any present pair must be ordered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(ValidationError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            }),
            (Some(_), Some(_)) => Ok(()),
            _ if self.period.is_custom() => Err(ValidationError::IncompleteRange),
            _ => Ok(()),
        }
    }

    /// Query string pairs for the live endpoint, bounds appended only when present.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("metric", self.metric.as_str().to_owned()),
            ("period", self.period.as_str().to_owned()),
        ];
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format_iso()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format_iso()));
        }
        pairs
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

// The backend answers `{}` for an empty series and snapshots store `null`;
// anything short of a complete object reads as absent.
fn lenient_stats<'de, D>(deserializer: D) -> Result<Option<SeriesStats>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct PartialStats {
        min: Option<f64>,
        max: Option<f64>,
        avg: Option<f64>,
        change: Option<f64>,
        change_pct: Option<f64>,
    }

    let partial = Option::<PartialStats>::deserialize(deserializer)?;
    Ok(partial.and_then(|stats| {
        Some(SeriesStats {
            min: stats.min?,
            max: stats.max?,
            avg: stats.avg?,
            change: stats.change?,
            change_pct: stats.change_pct?,
        })
    }))
}
