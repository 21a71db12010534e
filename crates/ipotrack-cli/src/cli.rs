//! CLI argument definitions for ipotrack.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sync` | Fold calendar entries into the dataset |
//! | `discover` | Stage IPOs missing from the dataset for review |
//! | `process` | Resolve staged pending entries into the dataset |
//! | `status` | Classify whether a ticker is still trading |
//! | `perf` | Debut-to-now performance for a tracked ticker |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--data-dir` | `data` | Directory holding the JSON dataset files |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--delay-ms` | `500` | Minimum spacing between provider calls |
//! | `--timeout-ms` | `30000` | HTTP request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Refresh the dataset from the FMP calendar
//! ipotrack sync
//!
//! # Stage anything Finnhub knows about that we do not track yet
//! ipotrack discover --from 2023-01-01
//!
//! # Resolve staged entries against real trading data
//! ipotrack process
//!
//! # One-off lookups
//! ipotrack status RDDT
//! ipotrack perf RDDT --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// IPO tracking and reconciliation CLI.
///
/// Maintains a local JSON dataset of IPO listings, reconciled against
/// provider calendars (FMP, Finnhub) and verified against real trading
/// data (Yahoo Finance daily history).
#[derive(Debug, Parser)]
#[command(
    name = "ipotrack",
    author,
    version,
    about = "IPO tracking and reconciliation CLI"
)]
pub struct Cli {
    /// Directory holding the JSON dataset files.
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Minimum spacing between per-ticker provider calls in milliseconds.
    ///
    /// Free provider tiers enforce per-minute call budgets; lowering this
    /// below the default risks rate-limit failures on large batches.
    #[arg(long, global = true, default_value_t = 500)]
    pub delay_ms: u64,

    /// HTTP request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 30_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🔄 Fold FMP IPO-calendar entries into the dataset.
    ///
    /// Requires `IPOTRACK_FMP_API_KEY` (or `FMP_API_KEY`). Without a
    /// credential the fetch degrades to an empty batch and only the
    /// dataset timestamp is refreshed.
    ///
    /// # Examples
    ///
    ///   ipotrack sync
    ///   ipotrack sync --from 2024-01-01 --to 2024-06-30
    Sync(WindowArgs),

    /// 🔍 Stage IPOs we do not track yet for manual review.
    ///
    /// Walks the Finnhub IPO calendar (requires `IPOTRACK_FINNHUB_API_KEY`
    /// or `FINNHUB_API_KEY`), drops withdrawn/postponed entries and
    /// anything already tracked, and rewrites the pending-review file.
    ///
    /// # Examples
    ///
    ///   ipotrack discover
    ///   ipotrack discover --from 2023-01-01
    Discover(WindowArgs),

    /// ✅ Resolve staged pending entries into the dataset.
    ///
    /// Each entry is verified against daily trading data; the accepted
    /// record carries the resolved debut price and the actual first trade
    /// date. The dataset is snapshotted before the merge, and entries that
    /// cannot be resolved are written to the failed file.
    Process,

    /// 📡 Classify whether a ticker is still trading.
    ///
    /// # Examples
    ///
    ///   ipotrack status RDDT
    Status(TickerArgs),

    /// 📈 Debut-to-now performance for a tracked ticker.
    ///
    /// Exits with code 3 if the ticker is not in the dataset.
    ///
    /// # Examples
    ///
    ///   ipotrack perf RDDT --pretty
    Perf(TickerArgs),
}

/// Calendar window shared by `sync` and `discover`.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Window start, ISO `YYYY-MM-DD`.
    ///
    /// Defaults to 90 days back for `sync` and one year back for
    /// `discover`.
    #[arg(long)]
    pub from: Option<String>,

    /// Window end, ISO `YYYY-MM-DD`.
    ///
    /// Defaults to 90 days ahead for `sync` (upcoming listings) and today
    /// for `discover`.
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for single-ticker commands.
#[derive(Debug, Args)]
pub struct TickerArgs {
    /// Exchange ticker (e.g. RDDT).
    pub ticker: String,
}
