//! Positional alignment of two independently dated series.
//!
//! Two series rarely share a calendar: one market may publish on a day the
//! other skips. Rather than intersecting dates, rows are paired by index so
//! both lines stay comparable, and each row keeps the original date of both
//! points for labelling.

use serde::Serialize;

use crate::{SeriesDate, SeriesPoint};

/// One row of an index-aligned pair of series.
///
/// A missing value is `None` (serialized as `null`), never zero, so a line
/// renderer can connect across the gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPoint {
    /// Axis label: the primary date, or the secondary date once primary is exhausted.
    pub date: SeriesDate,
    pub primary_value: Option<f64>,
    pub secondary_value: Option<f64>,
    pub primary_date: Option<SeriesDate>,
    pub secondary_date: Option<SeriesDate>,
}

/// Pairs `primary[i]` with `secondary[i]` for every index of the longer series.
pub fn merge(primary: &[SeriesPoint], secondary: &[SeriesPoint]) -> Vec<MergedPoint> {
    let len = primary.len().max(secondary.len());

    (0..len)
        .filter_map(|index| {
            let left = primary.get(index);
            let right = secondary.get(index);
            let date = left.or(right)?.date;

            Some(MergedPoint {
                date,
                primary_value: left.map(|point| point.value),
                secondary_value: right.map(|point| point.value),
                primary_date: left.map(|point| point.date),
                secondary_date: right.map(|point| point.date),
            })
        })
        .collect()
}
