//! Trading-status classification.
//!
//! Whether a ticker is still trading is recomputed on demand from price
//! history; it is never persisted. A merger often just produces a gap in
//! trading under the old ticker, indistinguishable from a delisting without
//! a corporate-actions feed, so "merged" stays an externally applied label.

use std::sync::Arc;

use crate::domain::{IsoDate, Ticker, TradingStatus};
use crate::history::{HistoryRequest, HistorySource, Period};

/// Gap between "now" and the last trade beyond which a quiet ticker is
/// considered delisted.
const DELISTED_GAP_DAYS: i64 = 30;

/// Short-horizon lookbacks tried in order before the lifetime query.
const SHORT_HORIZONS: [Period; 4] = [
    Period::OneDay,
    Period::FiveDays,
    Period::OneMonth,
    Period::ThreeMonths,
];

/// Classifies a ticker as active, delisted, or unknown from its history.
#[derive(Clone)]
pub struct StatusClassifier {
    history: Arc<dyn HistorySource>,
}

impl StatusClassifier {
    pub fn new(history: Arc<dyn HistorySource>) -> Self {
        Self { history }
    }

    /// Classify `ticker` as of `today`.
    ///
    /// Widening short-horizon lookups first; any hit means the ticker is
    /// active with the last close as its current price. Otherwise a
    /// lifetime lookup decides between delisted-with-last-trade and
    /// delisted-with-no-data. Provider errors classify as unknown with the
    /// diagnostic retained.
    pub async fn classify(&self, ticker: &Ticker, today: IsoDate) -> TradingStatus {
        match self.classify_inner(ticker, today).await {
            Ok(status) => status,
            Err(error) => TradingStatus::Unknown {
                detail: error.to_string(),
            },
        }
    }

    async fn classify_inner(
        &self,
        ticker: &Ticker,
        today: IsoDate,
    ) -> Result<TradingStatus, crate::history::ProviderError> {
        for period in SHORT_HORIZONS {
            let series = self
                .history
                .daily_history(ticker, HistoryRequest::Period(period))
                .await?;
            if let Some(last) = series.last_row() {
                if last.close > 0.0 {
                    return Ok(TradingStatus::Active {
                        current_price: crate::adapters::round2(last.close),
                    });
                }
            }
        }

        let series = self
            .history
            .daily_history(ticker, HistoryRequest::Period(Period::Max))
            .await?;
        match series.last_row() {
            Some(last) => {
                let delisted = TradingStatus::Delisted {
                    last_price: (last.close > 0.0).then(|| crate::adapters::round2(last.close)),
                    last_trade_date: Some(last.date),
                };
                let elapsed = today.days_since(last.date);
                if elapsed > DELISTED_GAP_DAYS {
                    return Ok(delisted);
                }
                // Last trade is recent but the short horizons were still
                // empty; the ticker has stopped printing, so it classifies
                // the same way. The 30-day boundary stays explicit above in
                // case this branch ever needs to differ.
                Ok(delisted)
            }
            None => Ok(TradingStatus::Delisted {
                last_price: None,
                last_trade_date: None,
            }),
        }
    }
}
