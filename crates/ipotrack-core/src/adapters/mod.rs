//! Provider adapters.
//!
//! Each adapter maps one external provider's payloads into canonical shapes.
//! Raw provider structs never leave their module; everything downstream of
//! normalization works on [`PendingCandidate`](crate::PendingCandidate) and
//! [`DailySeries`](crate::DailySeries).

mod finnhub;
mod fmp;
mod yahoo;

use std::future::Future;
use std::pin::Pin;

use crate::domain::{IsoDate, PendingCandidate, Ticker};
use crate::history::ProviderError;

pub use finnhub::FinnhubCalendar;
pub use fmp::FmpCalendar;
pub use yahoo::YahooHistory;

/// IPO-calendar provider contract.
pub trait CalendarSource: Send + Sync {
    /// Provider name used in provenance tags and log lines.
    fn name(&self) -> &'static str;

    /// Whether a credential is configured. Without one, fetches degrade to
    /// empty result sets instead of failing.
    fn has_credential(&self) -> bool;

    /// IPO-calendar entries announced in `[from, to]`, normalized. Records
    /// missing a symbol or date are dropped during normalization.
    fn ipo_calendar<'a>(
        &'a self,
        from: IsoDate,
        to: IsoDate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PendingCandidate>, ProviderError>> + Send + 'a>>;

    /// Sector from the company-profile endpoint, when the provider has one.
    fn profile_sector<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, ProviderError>> + Send + 'a>>;
}

/// Resolve a provider-reported offer price to a number.
///
/// Providers report either a single value or a dash-separated marketed range
/// like `"31.00-34.00"`; the final offer conventionally prices at the top of
/// the range, so the upper bound wins. Malformed or missing input resolves
/// to `0.0`, which the `ipo_price > 0` acceptance invariant filters out
/// later rather than raising here.
pub fn parse_offer_price(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let candidate = match trimmed.rsplit_once('-') {
        Some((_, upper)) => upper.trim(),
        None => trimmed,
    };

    match candidate.parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => round2(price),
        _ => 0.0,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
