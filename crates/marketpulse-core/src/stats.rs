//! Derived statistics: latest move of a series and the co-movement of two series.

use serde::Serialize;

use crate::{SeriesPoint, SeriesStats};

/// Latest value and its move from the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub latest: SeriesPoint,
    pub previous: Option<SeriesPoint>,
    pub change: f64,
    pub change_pct: f64,
}

impl PriceChange {
    /// `None` for an empty series. A single point has no previous value and
    /// reports a zero change.
    pub fn from_series(series: &[SeriesPoint]) -> Option<Self> {
        let (latest, rest) = series.split_last()?;
        let previous = rest.last().copied();

        let (change, change_pct) = match previous {
            Some(previous) => {
                let change = latest.value - previous.value;
                let change_pct = if previous.value == 0.0 {
                    0.0
                } else {
                    change / previous.value * 100.0
                };
                (change, change_pct)
            }
            None => (0.0, 0.0),
        };

        Some(Self {
            latest: *latest,
            previous,
            change,
            change_pct,
        })
    }

    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

/// Whether two series moved the same way over a period.
///
/// This is a sign comparison only, not a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Together,
    Opposite,
}

impl Direction {
    /// Zero counts as an upward move.
    pub fn classify(primary_change: f64, secondary_change: f64) -> Self {
        if (primary_change >= 0.0) == (secondary_change >= 0.0) {
            Self::Together
        } else {
            Self::Opposite
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::Together => "both series moved in the same direction",
            Self::Opposite => "the series moved in opposite directions",
        }
    }
}

/// Side-by-side period statistics of two series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub primary: SeriesStats,
    pub secondary: SeriesStats,
    pub direction: Direction,
}

impl Comparison {
    pub fn from_stats(primary: SeriesStats, secondary: SeriesStats) -> Self {
        Self {
            primary,
            secondary,
            direction: Direction::classify(primary.change, secondary.change),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, value: f64) -> SeriesPoint {
        SeriesPoint::parse(date, value).expect("valid point")
    }

    #[test]
    fn change_is_latest_minus_previous() {
        let series = [
            point("2024-01-01", 90.0),
            point("2024-01-02", 100.0),
            point("2024-01-03", 105.0),
        ];

        let change = PriceChange::from_series(&series).expect("non-empty");

        assert_eq!(change.latest.value, 105.0);
        assert_eq!(change.previous.map(|p| p.value), Some(100.0));
        assert_eq!(change.change, 5.0);
        assert!((change.change_pct - 5.0).abs() < 1e-9);
        assert!(change.is_up());
    }

    #[test]
    fn single_point_reports_no_change() {
        let change = PriceChange::from_series(&[point("2024-01-01", 2500.0)]).expect("non-empty");

        assert_eq!(change.change, 0.0);
        assert_eq!(change.change_pct, 0.0);
        assert!(change.previous.is_none());
    }

    #[test]
    fn empty_series_has_no_price() {
        assert!(PriceChange::from_series(&[]).is_none());
    }

    #[test]
    fn zero_previous_value_does_not_divide() {
        let series = [point("2024-01-01", 0.0), point("2024-01-02", 3.0)];
        let change = PriceChange::from_series(&series).expect("non-empty");

        assert_eq!(change.change, 3.0);
        assert_eq!(change.change_pct, 0.0);
    }

    #[test]
    fn direction_is_decided_by_sign_alone() {
        assert_eq!(Direction::classify(1.2, 0.3), Direction::Together);
        assert_eq!(Direction::classify(1.2, -0.5), Direction::Opposite);
        assert_eq!(Direction::classify(-40.0, -0.01), Direction::Together);
        assert_eq!(Direction::classify(0.0, 0.0), Direction::Together);
        assert_eq!(Direction::classify(0.0, -0.01), Direction::Opposite);
    }

    #[test]
    fn comparison_uses_period_change() {
        let up = SeriesStats {
            min: 1.0,
            max: 3.0,
            avg: 2.0,
            change: 2.0,
            change_pct: 1.2,
        };
        let down = SeriesStats {
            change: -1.0,
            change_pct: -0.5,
            ..up
        };

        assert_eq!(Comparison::from_stats(up, up).direction, Direction::Together);
        assert_eq!(Comparison::from_stats(up, down).direction, Direction::Opposite);
    }
}
