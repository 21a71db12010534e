use std::sync::Arc;

use serde_json::Value;

use ipotrack_core::{CalendarSource, FmpCalendar, IsoDate, PendingReviewPipeline};

use crate::error::CliError;

use super::Context;

pub async fn run(context: &Context) -> Result<Value, CliError> {
    // FMP fills in the sector for accepted entries when it has a profile.
    let calendar: Arc<dyn CalendarSource> =
        Arc::new(FmpCalendar::from_env().with_timeout_ms(context.timeout_ms));

    let pipeline = PendingReviewPipeline::new(context.store.clone(), context.history.clone())
        .with_calendar(calendar)
        .with_pacer(context.pacer.clone());

    eprintln!("resolving pending entries against trading data");
    let outcome = pipeline.process_pending(IsoDate::today_utc()).await?;
    eprintln!(
        "review complete: {} accepted, {} failed, {} skipped",
        outcome.succeeded, outcome.failed, outcome.skipped
    );
    if let Some(path) = &outcome.backup_path {
        eprintln!("dataset snapshot written to {}", path.display());
    }

    Ok(serde_json::to_value(outcome)?)
}
