use marketpulse_core::{DashboardQuery, SeriesFetcher};

use crate::cli::{RangeArgs, SeriesArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &SeriesArgs, fetcher: &SeriesFetcher) -> Result<CommandResult, CliError> {
    let request = query(&args.range).request(args.metric)?;
    let response = fetcher.fetch(&request).await?.with_request(&request);

    let degraded = response.fallback;
    Ok(CommandResult::ok(serde_json::to_value(response)?).with_degraded(degraded))
}

pub(super) fn query(range: &RangeArgs) -> DashboardQuery {
    DashboardQuery {
        period: range.period,
        start_date: range.start_date,
        end_date: range.end_date,
    }
}
