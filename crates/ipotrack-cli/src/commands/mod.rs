mod discover;
mod perf;
mod process;
mod status;
mod sync;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use ipotrack_core::{
    CachedHistory, FileStore, HistorySource, HttpClient, IsoDate, Pacer, ReqwestHttpClient,
    YahooHistory,
};

use crate::cli::{Cli, Command, WindowArgs};
use crate::error::CliError;

/// Shared wiring handed to each command.
pub struct Context {
    pub store: FileStore,
    pub history: Arc<dyn HistorySource>,
    pub pacer: Pacer,
    pub timeout_ms: u64,
}

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let yahoo =
        YahooHistory::with_http_client(Arc::clone(&http_client)).with_timeout_ms(cli.timeout_ms);
    let history: Arc<dyn HistorySource> = Arc::new(CachedHistory::new(Arc::new(yahoo)));

    let context = Context {
        store: FileStore::new(&cli.data_dir),
        history,
        pacer: Pacer::new(Duration::from_millis(cli.delay_ms)),
        timeout_ms: cli.timeout_ms,
    };

    match &cli.command {
        Command::Sync(args) => sync::run(args, &context).await,
        Command::Discover(args) => discover::run(args, &context).await,
        Command::Process => process::run(&context).await,
        Command::Status(args) => status::run(args, &context).await,
        Command::Perf(args) => perf::run(args, &context).await,
    }
}

/// Resolve an optional `--from`/`--to` window against today.
fn parse_window(
    args: &WindowArgs,
    default_days_back: i64,
    default_days_ahead: i64,
) -> Result<(IsoDate, IsoDate), CliError> {
    let today = IsoDate::today_utc();
    let from = match &args.from {
        Some(raw) => IsoDate::parse(raw)?,
        None => today.plus_days(-default_days_back),
    };
    let to = match &args.to {
        Some(raw) => IsoDate::parse(raw)?,
        None => today.plus_days(default_days_ahead),
    };
    Ok((from, to))
}
