mod dashboard;
mod health;
mod series;
mod snapshot;

use std::sync::Arc;
use std::time::Duration;

use marketpulse_core::{FetcherConfig, ReqwestHttpClient, SeriesFetcher};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    /// Some of the data came from a fallback snapshot.
    pub degraded: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            degraded: false,
        }
    }

    pub fn with_degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = config_for(cli);

    match &cli.command {
        Command::Series(args) => series::run(args, &fetcher(config)).await,
        Command::Dashboard(args) => dashboard::run(args, &fetcher(config)).await,
        Command::Health => health::run(&fetcher(config)).await,
        Command::Snapshot(args) => snapshot::run(args, config, cli.timeout_ms.is_some()).await,
    }
}

/// Environment configuration with command-line overrides applied.
fn config_for(cli: &Cli) -> FetcherConfig {
    let mut config = FetcherConfig::from_env();
    if let Some(url) = &cli.api_url {
        config = config.with_api_base_url(url.as_str());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }
    config
}

fn fetcher(config: FetcherConfig) -> SeriesFetcher {
    SeriesFetcher::new(config, Arc::new(ReqwestHttpClient::new()))
}
