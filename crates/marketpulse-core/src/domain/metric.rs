use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Real-world quantity tracked by a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// KOSPI stock index level.
    Kospi,
    /// USD/KRW exchange rate.
    Usdkrw,
}

impl Metric {
    pub const ALL: [Self; 2] = [Self::Kospi, Self::Usdkrw];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kospi => "kospi",
            Self::Usdkrw => "usdkrw",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kospi" => Ok(Self::Kospi),
            "usdkrw" => Ok(Self::Usdkrw),
            other => Err(ValidationError::InvalidMetric {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lookback window selector, or an explicit custom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "custom")]
    Custom,
}

impl Period {
    pub const ALL: [Self; 5] = [
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::Custom,
    ];

    /// Periods that have a dedicated bucket in a fallback snapshot.
    pub const SNAPSHOT_PERIODS: [Self; 4] =
        [Self::OneDay, Self::OneWeek, Self::OneMonth, Self::ThreeMonths];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::Custom => "custom",
        }
    }

    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }

    /// Snapshot bucket consulted for this period. Custom ranges have no bucket of
    /// their own and read the one-month window instead.
    pub const fn snapshot_key(self) -> Self {
        match self {
            Self::Custom => Self::OneMonth,
            other => other,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "1w" => Ok(Self::OneWeek),
            "1m" => Ok(Self::OneMonth),
            "3m" => Ok(Self::ThreeMonths),
            "custom" => Ok(Self::Custom),
            other => Err(ValidationError::InvalidPeriod {
                value: other.to_owned(),
            }),
        }
    }
}
