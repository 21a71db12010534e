use serde::Serialize;
use serde_json::Value;

use ipotrack_core::{
    compute_performance, CurrentValue, IsoDate, PerformanceResult, StatusClassifier, Ticker,
    TradingStatus,
};

use crate::cli::TickerArgs;
use crate::error::CliError;

use super::Context;

#[derive(Debug, Serialize)]
struct PerfReport {
    ticker: String,
    name: String,
    ipo_date: String,
    status: TradingStatus,
    performance: PerformanceResult,
}

pub async fn run(args: &TickerArgs, context: &Context) -> Result<Value, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;

    let dataset = context.store.load_dataset()?;
    let record = dataset
        .ipos
        .iter()
        .find(|record| record.ticker.eq_ignore_ascii_case(ticker.as_str()))
        .ok_or_else(|| CliError::NotTracked(ticker.as_str().to_string()))?;

    let classifier = StatusClassifier::new(context.history.clone());
    let status = classifier.classify(&ticker, IsoDate::today_utc()).await;

    let performance = compute_performance(record.ipo_price, CurrentValue::from(&status))?;

    Ok(serde_json::to_value(PerfReport {
        ticker: ticker.as_str().to_string(),
        name: record.name.clone(),
        ipo_date: record.ipo_date.clone(),
        status,
        performance,
    })?)
}
