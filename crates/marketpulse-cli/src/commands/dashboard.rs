use marketpulse_core::{load_dashboard, SeriesFetcher};

use crate::cli::RangeArgs;
use crate::error::CliError;

use super::series::query;
use super::CommandResult;

pub async fn run(args: &RangeArgs, fetcher: &SeriesFetcher) -> Result<CommandResult, CliError> {
    let view = load_dashboard(fetcher, &query(args)).await?;

    if !view.has_data() {
        tracing::warn!("dashboard has an empty series for the selected period");
    }

    let degraded = view.degraded;
    Ok(CommandResult::ok(serde_json::to_value(view)?).with_degraded(degraded))
}
