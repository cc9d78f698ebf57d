use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::{Metric, Period};

/// Validation and contract errors exposed by `marketpulse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid metric '{value}', expected one of kospi, usdkrw")]
    InvalidMetric { value: String },
    #[error("invalid period '{value}', expected one of 1d, 1w, 1m, 3m, custom")]
    InvalidPeriod { value: String },

    #[error("date must be an ISO-8601 calendar date (YYYY-MM-DD): '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be ISO-8601 date and time: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("custom range start {start} is after end {end}")]
    InvertedRange { start: String, end: String },
    #[error("custom period requires both a start date and an end date")]
    IncompleteRange,
}

/// Where a fetch attempt was directed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// The live series endpoint.
    Primary,
    /// An externally hosted snapshot document.
    RemoteSnapshot,
    /// The static snapshot file shipped next to the client.
    LocalSnapshot,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::RemoteSnapshot => "remote_snapshot",
            Self::LocalSnapshot => "local_snapshot",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single source attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceId,
    pub error: FetchError,
}

impl Display for SourceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Error raised while obtaining a series.
///
/// Only [`FetchError::ExhaustedFallback`] (and request validation) ever reaches a
/// caller of [`SeriesFetcher::fetch`](crate::SeriesFetcher::fetch); the other kinds
/// describe individual attempts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {message}")]
    Network { message: String, timed_out: bool },

    #[error("unexpected HTTP status {status}")]
    Http { status: u16 },

    #[error("malformed response: {message}")]
    Parse { message: String },

    #[error("no data for {metric}/{period}")]
    NoData { metric: Metric, period: Period },

    #[error("failed to read snapshot: {message}")]
    Io { message: String },

    #[error("cannot reach server, try again later")]
    ExhaustedFallback { attempts: Vec<SourceFailure> },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network {
                timed_out: true, ..
            } => "fetch.timeout",
            Self::Network { .. } => "fetch.network",
            Self::Http { .. } => "fetch.http",
            Self::Parse { .. } => "fetch.parse",
            Self::NoData { .. } => "fetch.no_data",
            Self::Io { .. } => "fetch.io",
            Self::ExhaustedFallback { .. } => "fetch.exhausted",
            Self::Validation(_) => "fetch.invalid_request",
        }
    }

    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                timed_out: true,
                ..
            }
        )
    }

    /// Attempts recorded before the fallback chain gave up.
    pub fn attempts(&self) -> &[SourceFailure] {
        match self {
            Self::ExhaustedFallback { attempts } => attempts,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(error.to_string())
    }
}
