//! CLI argument definitions for marketpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `series` | Fetch one series with snapshot fallback |
//! | `dashboard` | Load both series, aligned, with derived statistics |
//! | `health` | Probe the backend |
//! | `snapshot` | Rebuild the fallback snapshot document |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Fail when data came from a fallback snapshot |
//! | `--api-url` | env | Backend base URL |
//! | `--timeout-ms` | `10000` | Primary request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! marketpulse series --metric kospi --period 1m --pretty
//! marketpulse dashboard --period custom --start-date 2024-01-01 --end-date 2024-03-31
//! marketpulse snapshot --api-url https://backend.example.com --output public/fallback-data.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use marketpulse_core::{Metric, Period, SeriesDate};

/// KOSPI versus USD/KRW market pulse
#[derive(Debug, Parser)]
#[command(
    name = "marketpulse",
    author,
    version,
    about = "KOSPI versus USD/KRW series with snapshot fallback"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Exit with code 5 when any series was served from a fallback snapshot.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Backend base URL. Overrides MARKETPULSE_API_BASE_URL / API_BASE_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Primary request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one series, falling back to snapshots when the backend is down.
    ///
    /// # Examples
    ///
    ///   marketpulse series --metric usdkrw --period 1w
    ///   marketpulse series --metric kospi --period custom --start-date 2024-01-01 --end-date 2024-02-01
    Series(SeriesArgs),

    /// Load KOSPI and USD/KRW together with aligned rows and comparison.
    Dashboard(RangeArgs),

    /// Check that the backend answers /health.
    Health,

    /// Fetch every metric and fixed period from the backend and write a snapshot.
    ///
    /// Periods that fail are written as empty entries; the backend must pass
    /// a health check first.
    Snapshot(SnapshotArgs),
}

/// Period selection shared by `series` and `dashboard`.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// One of 1d, 1w, 1m, 3m, custom.
    #[arg(long, default_value = "1m")]
    pub period: Period,

    /// Inclusive start (YYYY-MM-DD); required with `--period custom`.
    #[arg(long)]
    pub start_date: Option<SeriesDate>,

    /// Inclusive end (YYYY-MM-DD); required with `--period custom`.
    #[arg(long)]
    pub end_date: Option<SeriesDate>,
}

/// Arguments for the `series` command.
#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// kospi or usdkrw.
    #[arg(long)]
    pub metric: Metric,

    #[command(flatten)]
    pub range: RangeArgs,
}

/// Arguments for the `snapshot` command.
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Destination file. Defaults to the configured fallback path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
