//! Debut-price resolution ladder.
//!
//! Newly listed tickers frequently have sparse or delayed history at
//! third-party providers. Rather than fail outright, resolution widens the
//! search progressively and records which rung produced the value.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::round2;
use crate::domain::{IsoDate, PriceQuote, PriceSource, Ticker};
use crate::history::{DailyRow, HistoryRequest, HistorySource, Period, ProviderError};

/// Calendar days scanned from the nominal listing date. Two weeks spans
/// weekends and holiday closures without drifting into unrelated trading.
const DEBUT_WINDOW_DAYS: i64 = 14;

const NO_DATA_REASON: &str = "no price data available";

/// Per-ticker resolution failure, retained for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionFailure {
    pub ticker: Ticker,
    pub reason: String,
}

impl ResolutionFailure {
    pub fn no_data(ticker: Ticker) -> Self {
        Self {
            ticker,
            reason: String::from(NO_DATA_REASON),
        }
    }

    pub fn from_provider(ticker: Ticker, error: &ProviderError) -> Self {
        Self {
            ticker,
            reason: error.message().to_string(),
        }
    }
}

impl Display for ResolutionFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.ticker, self.reason)
    }
}

/// Resolves an authoritative IPO opening price via an ordered fallback
/// ladder; the first rung that yields a usable row wins.
#[derive(Clone)]
pub struct PriceResolver {
    history: Arc<dyn HistorySource>,
}

impl PriceResolver {
    pub fn new(history: Arc<dyn HistorySource>) -> Self {
        Self { history }
    }

    /// Resolve the opening price for `ticker` around `target_date`.
    ///
    /// Ladder, first success wins:
    /// 1. open on the first trading day within 14 days of `target_date`
    /// 2. close on that same day if the open is zero/unavailable
    /// 3. close on the first trading day of the containing calendar month
    /// 4. earliest point in the lifetime history, open preferred over close
    ///
    /// The returned quote carries the actual trade date and the rung that
    /// produced it. Transport errors become a per-ticker failure.
    pub async fn resolve_opening_price(
        &self,
        ticker: &Ticker,
        target_date: IsoDate,
    ) -> Result<PriceQuote, ResolutionFailure> {
        match self.run_ladder(ticker, target_date).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => Err(ResolutionFailure::no_data(ticker.clone())),
            Err(error) => Err(ResolutionFailure::from_provider(ticker.clone(), &error)),
        }
    }

    async fn run_ladder(
        &self,
        ticker: &Ticker,
        target_date: IsoDate,
    ) -> Result<Option<PriceQuote>, ProviderError> {
        // Rungs 1 and 2: short window starting at the nominal date.
        let window = HistoryRequest::Range {
            start: target_date,
            end: target_date.plus_days(DEBUT_WINDOW_DAYS),
        };
        let series = self.history.daily_history(ticker, window).await?;
        if let Some(first) = series.first_row() {
            if let Some(quote) = quote_from_row(first, PriceSource::OpenPrice) {
                return Ok(Some(quote));
            }
            if let Some(quote) = close_from_row(first, PriceSource::ClosePrice) {
                return Ok(Some(quote));
            }
        }

        // Rung 3: first trading day of the containing month.
        let month = HistoryRequest::Range {
            start: target_date.first_of_month(),
            end: target_date.next_month_start(),
        };
        let series = self.history.daily_history(ticker, month).await?;
        if let Some(first) = series.first_row() {
            if let Some(quote) = close_from_row(first, PriceSource::MonthClosePrice) {
                return Ok(Some(quote));
            }
        }

        // Rung 4: lifetime lookback, open preferred.
        let series = self
            .history
            .daily_history(ticker, HistoryRequest::Period(Period::Max))
            .await?;
        if let Some(first) = series.first_row() {
            if let Some(quote) = quote_from_row(first, PriceSource::FirstAvailableOpen) {
                return Ok(Some(quote));
            }
            if let Some(quote) = close_from_row(first, PriceSource::FirstAvailableClose) {
                return Ok(Some(quote));
            }
        }

        Ok(None)
    }
}

// A usable row requires a strictly positive price.
fn quote_from_row(row: &DailyRow, source: PriceSource) -> Option<PriceQuote> {
    (row.open > 0.0).then(|| PriceQuote {
        price: round2(row.open),
        as_of_date: row.date,
        source,
    })
}

fn close_from_row(row: &DailyRow, source: PriceSource) -> Option<PriceQuote> {
    (row.close > 0.0).then(|| PriceQuote {
        price: round2(row.close),
        as_of_date: row.date,
        source,
    })
}
