use marketpulse_core::SeriesFetcher;
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

pub async fn run(fetcher: &SeriesFetcher) -> Result<CommandResult, CliError> {
    let url = fetcher.config().api_base_url().to_owned();
    let status = fetcher
        .health()
        .await
        .map_err(|source| CliError::Unreachable {
            url: url.clone(),
            source,
        })?;

    Ok(CommandResult::ok(json!({
        "apiBaseUrl": url,
        "status": status,
    })))
}
