use serde_json::Value;

use ipotrack_core::{CalendarSource, FmpCalendar, IsoDate, PendingReviewPipeline};

use crate::cli::WindowArgs;
use crate::error::CliError;

use super::Context;

pub async fn run(args: &WindowArgs, context: &Context) -> Result<Value, CliError> {
    let (from, to) = super::parse_window(args, 90, 90)?;

    let calendar = FmpCalendar::from_env().with_timeout_ms(context.timeout_ms);
    if !calendar.has_credential() {
        eprintln!("warning: no FMP API key configured; the calendar fetch will be empty");
    }

    let pipeline = PendingReviewPipeline::new(context.store.clone(), context.history.clone())
        .with_pacer(context.pacer.clone());

    eprintln!("syncing {} calendar {from}..{to}", calendar.name());
    let report = pipeline
        .sync_calendar(&calendar, from, to, IsoDate::today_utc())
        .await?;
    eprintln!(
        "sync complete: fetched {}, added {}, tracking {}",
        report.fetched, report.added, report.total
    );

    Ok(serde_json::to_value(report)?)
}
