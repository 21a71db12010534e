use serde_json::Value;

use ipotrack_core::{CalendarSource, FinnhubCalendar, IsoDate, PendingReviewPipeline};

use crate::cli::WindowArgs;
use crate::error::CliError;

use super::Context;

pub async fn run(args: &WindowArgs, context: &Context) -> Result<Value, CliError> {
    let (from, to) = super::parse_window(args, 365, 0)?;

    let calendar = FinnhubCalendar::from_env().with_timeout_ms(context.timeout_ms);
    if !calendar.has_credential() {
        eprintln!("warning: no Finnhub API key configured; the calendar fetch will be empty");
    }

    let pipeline = PendingReviewPipeline::new(context.store.clone(), context.history.clone())
        .with_pacer(context.pacer.clone());

    eprintln!("scanning {} calendar {from}..{to}", calendar.name());
    let report = pipeline
        .discover_missing(&calendar, from, to, IsoDate::today_utc())
        .await?;
    eprintln!(
        "discovery complete: fetched {}, staged {} for review ({} already tracked, {} rejected)",
        report.fetched, report.pending, report.already_tracked, report.rejected
    );

    Ok(serde_json::to_value(report)?)
}
