use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{parse_offer_price, CalendarSource};
use crate::domain::{IsoDate, PendingCandidate, ProviderStatus, Ticker};
use crate::error::NormalizationError;
use crate::history::ProviderError;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};

const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Financial Modeling Prep IPO calendar and company profiles.
///
/// Without an API key every fetch degrades to an empty result set; the
/// pipeline then falls back on the existing dataset.
#[derive(Clone)]
pub struct FmpCalendar {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl FmpCalendar {
    /// Credential from `IPOTRACK_FMP_API_KEY`, falling back to `FMP_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = env::var("IPOTRACK_FMP_API_KEY")
            .or_else(|_| env::var("FMP_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            api_key,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn get_json(&self, url: String) -> Result<String, ProviderError> {
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|error| {
            ProviderError::transport(format!("fmp transport error: {}", error.message()))
        })?;

        if response.status == 429 {
            return Err(ProviderError::rate_limited("fmp rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(ProviderError::transport(format!(
                "fmp upstream returned status {}",
                response.status
            )));
        }
        Ok(response.body)
    }
}

impl CalendarSource for FmpCalendar {
    fn name(&self) -> &'static str {
        "Financial Modeling Prep"
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
                Some(key) => key,
                None => return Ok(Vec::new()),
            };

            let url = format!(
                "{FMP_BASE_URL}/ipo_calendar?from={from}&to={to}&apikey={}",
                urlencoding::encode(api_key)
            );
            let body = self.get_json(url).await?;

            let raw: Vec<RawFmpIpo> = serde_json::from_str(&body).map_err(|error| {
                ProviderError::internal(format!("malformed fmp calendar body: {error}"))
            })?;

            // Per-record normalization failures drop the record, never the batch.
            Ok(raw
                .into_iter()
                .filter_map(|entry| entry.normalize().ok())
                .collect())
        })
    }

    fn profile_sector<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = match &self.api_key {
                Some(key) => key,
                None => return Ok(None),
            };

            let url = format!(
                "{FMP_BASE_URL}/profile/{}?apikey={}",
                urlencoding::encode(ticker.as_str()),
                urlencoding::encode(api_key)
            );
            let body = self.get_json(url).await?;

            let profiles: Vec<RawFmpProfile> = serde_json::from_str(&body).map_err(|error| {
                ProviderError::internal(format!("malformed fmp profile body: {error}"))
            })?;

            Ok(profiles
                .into_iter()
                .next()
                .and_then(|profile| profile.sector)
                .filter(|sector| !sector.trim().is_empty()))
        })
    }
}

// ---------------------------------------------------------------------------
// Raw FMP payloads. These shapes never leave this module.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFmpIpo {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    date: Option<String>,
    /// Reported as a number or a string depending on the deal.
    #[serde(default)]
    price: Option<serde_json::Value>,
    #[serde(default)]
    exchange: Option<String>,
}

impl RawFmpIpo {
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

        let name = self
            .company
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| ticker.as_str().to_string());

        let ipo_price = match &self.price {
            Some(serde_json::Value::Number(n)) => {
                parse_offer_price(&n.to_string())
            }
            Some(serde_json::Value::String(s)) => parse_offer_price(s),
            _ => 0.0,
        };

        Ok(PendingCandidate {
            ticker,
            name,
            ipo_date,
            ipo_price,
            exchange: self
                .exchange
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| String::from("Unknown")),
            sector: String::from("Unknown"),
            // The FMP calendar has no lifecycle field.
            provider_status: ProviderStatus::Unknown,
            source: String::from("Financial Modeling Prep"),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawFmpProfile {
    #[serde(default)]
    sector: Option<String>,
}
