//! Combined KOSPI and USD/KRW view.
//!
//! Both series are requested concurrently; the view is assembled only once both
//! have resolved. Everything returned is plain data for a presentation layer.

use serde::Serialize;

use crate::align::{merge, MergedPoint};
use crate::stats::{Comparison, PriceChange};
use crate::{
    FetchError, FetchRequest, Metric, Period, SeriesDate, SeriesFetcher, SeriesResponse,
    ValidationError,
};

/// Period selection shared by both series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
    pub period: Period,
    pub start_date: Option<SeriesDate>,
    pub end_date: Option<SeriesDate>,
}

impl DashboardQuery {
    pub const fn new(period: Period) -> Self {
        Self {
            period,
            start_date: None,
            end_date: None,
        }
    }

    pub const fn custom(start_date: SeriesDate, end_date: SeriesDate) -> Self {
        Self {
            period: Period::Custom,
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    /// Fixed periods are always valid; a custom period needs both bounds in order.
    pub fn is_valid_custom_range(&self) -> bool {
        if !self.period.is_custom() {
            return true;
        }
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if start <= end)
    }

    pub fn request(&self, metric: Metric) -> Result<FetchRequest, ValidationError> {
        FetchRequest::with_bounds(metric, self.period, self.start_date, self.end_date)
    }
}

/// Everything needed to draw the dual-axis dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub kospi: SeriesResponse,
    pub usdkrw: SeriesResponse,
    /// KOSPI as the primary (left axis) series, USD/KRW as the secondary.
    pub merged: Vec<MergedPoint>,
    pub kospi_price: Option<PriceChange>,
    pub usdkrw_price: Option<PriceChange>,
    pub comparison: Option<Comparison>,
    /// True when either series was served from a fallback snapshot.
    pub degraded: bool,
}

impl DashboardView {
    pub fn from_responses(kospi: SeriesResponse, usdkrw: SeriesResponse) -> Self {
        let merged = merge(&kospi.series, &usdkrw.series);
        let comparison = kospi
            .stats
            .zip(usdkrw.stats)
            .map(|(left, right)| Comparison::from_stats(left, right));

        Self {
            merged,
            kospi_price: PriceChange::from_series(&kospi.series),
            usdkrw_price: PriceChange::from_series(&usdkrw.series),
            comparison,
            degraded: kospi.fallback || usdkrw.fallback,
            kospi,
            usdkrw,
        }
    }

    /// Both series have at least one point.
    pub fn has_data(&self) -> bool {
        !self.kospi.is_empty() && !self.usdkrw.is_empty()
    }
}

/// Fetches both series concurrently and joins them into a [`DashboardView`].
///
/// # Errors
///
/// Fails with [`FetchError::Validation`] before any request when the custom
/// range is incomplete or inverted, and with the first fetch error otherwise.
pub async fn load_dashboard(
    fetcher: &SeriesFetcher,
    query: &DashboardQuery,
) -> Result<DashboardView, FetchError> {
    let kospi_request = query.request(Metric::Kospi)?;
    let usdkrw_request = query.request(Metric::Usdkrw)?;

    let (kospi, usdkrw) = tokio::try_join!(
        fetcher.fetch(&kospi_request),
        fetcher.fetch(&usdkrw_request)
    )?;

    Ok(DashboardView::from_responses(kospi, usdkrw))
}
