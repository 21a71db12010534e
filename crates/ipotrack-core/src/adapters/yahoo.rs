use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::{IsoDate, Ticker};
use crate::history::{DailyRow, DailySeries, HistoryRequest, HistorySource, Period, ProviderError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Daily history over the Yahoo chart API. No credential required.
#[derive(Clone)]
pub struct YahooHistory {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl Default for YahooHistory {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl YahooHistory {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(&self, ticker: &Ticker, request: &HistoryRequest) -> String {
        let symbol = urlencoding::encode(ticker.as_str());
        match request {
            HistoryRequest::Range { start, end } => {
                let period1 = unix_midnight(*start);
                let period2 = unix_midnight(*end);
                format!(
                    "{CHART_BASE_URL}/{symbol}?period1={period1}&period2={period2}&interval=1d"
                )
            }
            HistoryRequest::Period(period) => {
                format!(
                    "{CHART_BASE_URL}/{symbol}?range={}&interval=1d",
                    period.as_str()
                )
            }
        }
    }

    async fn fetch_series(
        &self,
        ticker: &Ticker,
        request: HistoryRequest,
    ) -> Result<DailySeries, ProviderError> {
        let url = self.chart_url(ticker, &request);
        let http_request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(http_request)
            .await
            .map_err(|error| {
                ProviderError::transport(format!("yahoo transport error: {}", error.message()))
            })?;

        // Unknown or delisted symbols come back as 404 with an error body;
        // that is an empty history, not a transport failure.
        if response.status == 404 {
            return Ok(DailySeries::empty(ticker.clone()));
        }
        if response.status == 429 {
            return Err(ProviderError::rate_limited("yahoo rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(ProviderError::transport(format!(
                "yahoo upstream returned status {}",
                response.status
            )));
        }

        parse_chart_body(ticker, &response.body)
    }
}

impl HistorySource for YahooHistory {
    fn daily_history<'a>(
        &'a self,
        ticker: &'a Ticker,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, ProviderError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_series(ticker, request).await })
    }
}

fn unix_midnight(date: IsoDate) -> i64 {
    date.into_inner().midnight().assume_utc().unix_timestamp()
}

// ---------------------------------------------------------------------------
// Raw chart payload. These shapes never leave this module.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn parse_chart_body(ticker: &Ticker, body: &str) -> Result<DailySeries, ProviderError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|error| ProviderError::internal(format!("malformed yahoo chart body: {error}")))?;

    let results = match envelope.chart.result {
        Some(results) => results,
        None => {
            // "No data found, symbol may be delisted" lands here.
            if envelope.chart.error.is_some() {
                return Ok(DailySeries::empty(ticker.clone()));
            }
            return Err(ProviderError::internal(
                "yahoo chart body had neither result nor error",
            ));
        }
    };

    let result = match results.into_iter().next() {
        Some(result) => result,
        None => return Ok(DailySeries::empty(ticker.clone())),
    };

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(DailySeries::empty(ticker.clone())),
    };

    let mut rows = Vec::with_capacity(result.timestamp.len());
    for (index, ts) in result.timestamp.iter().enumerate() {
        let date = match OffsetDateTime::from_unix_timestamp(*ts) {
            Ok(dt) => IsoDate::from_date(dt.date()),
            Err(_) => continue,
        };
        let open = quote.open.get(index).copied().flatten().unwrap_or(0.0);
        let close = quote.close.get(index).copied().flatten().unwrap_or(0.0);
        rows.push(DailyRow { date, open, close });
    }
    rows.sort_by_key(|row| row.date);

    Ok(DailySeries {
        ticker: ticker.clone(),
        rows,
    })
}
