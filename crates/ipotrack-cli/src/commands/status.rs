use serde::Serialize;
use serde_json::Value;

use ipotrack_core::{IsoDate, StatusClassifier, Ticker, TradingStatus};

use crate::cli::TickerArgs;
use crate::error::CliError;

use super::Context;

#[derive(Debug, Serialize)]
struct StatusReport {
    ticker: String,
    #[serde(flatten)]
    status: TradingStatus,
}

pub async fn run(args: &TickerArgs, context: &Context) -> Result<Value, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;

    let classifier = StatusClassifier::new(context.history.clone());
    let status = classifier.classify(&ticker, IsoDate::today_utc()).await;

    Ok(serde_json::to_value(StatusReport {
        ticker: ticker.as_str().to_string(),
        status,
    })?)
}
