use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::{parse_offer_price, CalendarSource};
use crate::domain::{IsoDate, PendingCandidate, ProviderStatus, Ticker};
use crate::error::NormalizationError;
use crate::history::ProviderError;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};

const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// One calendar request covers at most this many days; the free tier caps
/// both response size and call rate, so long ranges are walked in chunks.
const CHUNK_DAYS: i64 = 90;

/// Finnhub IPO calendar.
///
/// Prices frequently arrive as marketed ranges (`"31.00-34.00"`); the
/// normalizer resolves them to the upper bound. Without an API key every
/// fetch degrades to an empty result set.
#[derive(Clone)]
pub struct FinnhubCalendar {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    timeout_ms: u64,
    chunk_delay: Duration,
}

impl FinnhubCalendar {
    /// Credential from `IPOTRACK_FINNHUB_API_KEY`, falling back to
    /// `FINNHUB_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = env::var("IPOTRACK_FINNHUB_API_KEY")
            .or_else(|_| env::var("FINNHUB_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            api_key,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            chunk_delay: Duration::from_secs(1),
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            chunk_delay: Duration::ZERO,
        }
    }

    /// Delay between chunked calendar calls (free tier: 60 calls/minute).
    pub fn with_chunk_delay(mut self, chunk_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch_chunk(
        &self,
        api_key: &str,
        from: IsoDate,
        to: IsoDate,
    ) -> Result<Vec<PendingCandidate>, ProviderError> {
        let url = format!(
            "{FINNHUB_BASE_URL}/calendar/ipo?from={from}&to={to}&token={}",
            urlencoding::encode(api_key)
        );
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|error| {
            ProviderError::transport(format!("finnhub transport error: {}", error.message()))
        })?;

        if response.status == 429 {
            return Err(ProviderError::rate_limited("finnhub rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(ProviderError::transport(format!(
                "finnhub upstream returned status {}",
                response.status
            )));
        }

        let body: RawFinnhubCalendar = serde_json::from_str(&response.body).map_err(|error| {
            ProviderError::internal(format!("malformed finnhub calendar body: {error}"))
        })?;

        Ok(body
            .ipo_calendar
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.normalize().ok())
            .collect())
    }
}

impl CalendarSource for FinnhubCalendar {
    fn name(&self) -> &'static str {
        "Finnhub"
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn ipo_calendar<'a>(
        &'a self,
        from: IsoDate,
        to: IsoDate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PendingCandidate>, ProviderError>> + Send + 'a>>
    {
        Box::pin(async move {
            let api_key = match &self.api_key {
                Some(key) => key.clone(),
                None => return Ok(Vec::new()),
            };

            let mut all = Vec::new();
            let mut current = from;
            while current <= to {
                let chunk_end = current.plus_days(CHUNK_DAYS).min(to);
                let chunk = self.fetch_chunk(&api_key, current, chunk_end).await?;
                all.extend(chunk);

                current = chunk_end.plus_days(1);
                if current <= to && !self.chunk_delay.is_zero() {
                    tokio::time::sleep(self.chunk_delay).await;
                }
            }
            Ok(all)
        })
    }

    fn profile_sector<'a>(
        &'a self,
        _ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, ProviderError>> + Send + 'a>> {
        // The Finnhub IPO calendar carries no sector data and the profile
        // endpoint sits behind a different entitlement tier.
        Box::pin(async move { Ok(None) })
    }
}

// ---------------------------------------------------------------------------
// Raw Finnhub payloads. These shapes never leave this module.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFinnhubCalendar {
    #[serde(rename = "ipoCalendar", default)]
    ipo_calendar: Vec<Option<RawFinnhubIpo>>,
}

#[derive(Debug, Deserialize)]
struct RawFinnhubIpo {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RawFinnhubIpo {
    fn normalize(self) -> Result<PendingCandidate, NormalizationError> {
        let symbol = self
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(NormalizationError::MissingSymbol)?;
        let ticker = Ticker::parse(symbol)?;

        let date_str = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| NormalizationError::MissingDate {
                ticker: ticker.as_str().to_string(),
            })?;
        let ipo_date = IsoDate::parse(date_str).map_err(NormalizationError::Validation)?;

        Ok(PendingCandidate {
            ticker,
            name: self
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| String::from("Unknown")),
            ipo_date,
            ipo_price: self.price.as_deref().map(parse_offer_price).unwrap_or(0.0),
            exchange: self
                .exchange
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| String::from("Unknown")),
            sector: String::from("Unknown"),
            provider_status: self
                .status
                .as_deref()
                .map(ProviderStatus::parse)
                .unwrap_or(ProviderStatus::Unknown),
            source: String::from("Finnhub"),
        })
    }
}
