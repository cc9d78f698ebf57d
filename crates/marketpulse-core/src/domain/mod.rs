//! # Domain Models
//!
//! Canonical types shared by the fetcher, the aligner, and the statistics helpers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Metric`] | Tracked quantity (KOSPI index, USD/KRW rate) |
//! | [`Period`] | Lookback window or custom range |
//! | [`SeriesDate`] | Validated ISO-8601 calendar date |
//! | [`SeriesPoint`] | One `(date, value)` observation |
//! | [`SeriesStats`] | Min/max/avg and change over a series |
//! | [`SeriesResponse`] | Series payload with provenance markers |
//! | [`FetchRequest`] | Query parameters, also the cache key |
//! | [`UtcDateTime`] | UTC timestamp carried by snapshot documents |
//!
//! Construction validates invariants: values are finite, dates are ISO calendar
//! dates, and custom ranges are never inverted.

mod date;
mod metric;
mod models;
mod timestamp;

pub use date::SeriesDate;
pub use metric::{Metric, Period};
pub use models::{FetchRequest, SeriesPoint, SeriesResponse, SeriesStats};
pub use timestamp::UtcDateTime;
