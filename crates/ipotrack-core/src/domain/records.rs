use serde::{Deserialize, Serialize};

use ipotrack_store::{IpoRecord, PendingRecord};

use crate::domain::{IsoDate, Ticker};
use crate::error::ValidationError;

pub(crate) const UNKNOWN: &str = "Unknown";

/// Validated canonical IPO entry, the single internal record shape
/// regardless of provider origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub ticker: Ticker,
    pub name: String,
    pub ipo_date: IsoDate,
    pub ipo_price: f64,
    pub exchange: String,
    pub sector: String,
}

impl CanonicalRecord {
    pub fn new(
        ticker: Ticker,
        name: impl Into<String>,
        ipo_date: IsoDate,
        ipo_price: f64,
        exchange: impl Into<String>,
        sector: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !ipo_price.is_finite() || ipo_price <= 0.0 {
            return Err(ValidationError::NonPositivePrice { value: ipo_price });
        }

        Ok(Self {
            ticker,
            name,
            ipo_date,
            ipo_price,
            exchange: non_empty_or_unknown(exchange.into()),
            sector: non_empty_or_unknown(sector.into()),
        })
    }

    pub fn into_stored(self) -> IpoRecord {
        IpoRecord {
            ticker: self.ticker.into(),
            name: self.name,
            ipo_date: self.ipo_date.format_iso(),
            ipo_price: self.ipo_price,
            exchange: self.exchange,
            sector: self.sector,
        }
    }
}

impl TryFrom<&IpoRecord> for CanonicalRecord {
    type Error = ValidationError;

    fn try_from(record: &IpoRecord) -> Result<Self, Self::Error> {
        Self::new(
            Ticker::parse(&record.ticker)?,
            record.name.clone(),
            IsoDate::parse(&record.ipo_date)?,
            record.ipo_price,
            record.exchange.clone(),
            record.sector.clone(),
        )
    }
}

fn non_empty_or_unknown(value: String) -> String {
    if value.trim().is_empty() {
        String::from(UNKNOWN)
    } else {
        value
    }
}

/// Provider-reported lifecycle tag on a calendar entry, used to filter
/// candidates before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Priced,
    Filed,
    Expected,
    Withdrawn,
    Postponed,
    Unknown,
}

impl ProviderStatus {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "priced" => Self::Priced,
            "filed" => Self::Filed,
            "expected" => Self::Expected,
            "withdrawn" => Self::Withdrawn,
            "postponed" => Self::Postponed,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priced => "priced",
            Self::Filed => "filed",
            Self::Expected => "expected",
            Self::Withdrawn => "withdrawn",
            Self::Postponed => "postponed",
            Self::Unknown => "unknown",
        }
    }

    /// Candidates with these statuses never become pending entries.
    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::Withdrawn | Self::Postponed)
    }
}

/// Provider-sourced record not yet in the canonical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCandidate {
    pub ticker: Ticker,
    pub name: String,
    pub ipo_date: IsoDate,
    /// Nominal offer price as reported; `0.0` when the provider's price
    /// string was missing or malformed (filtered out by the merge).
    pub ipo_price: f64,
    pub exchange: String,
    pub sector: String,
    pub provider_status: ProviderStatus,
    pub source: String,
}

impl PendingCandidate {
    pub fn into_stored(self) -> PendingRecord {
        PendingRecord {
            ticker: self.ticker.into(),
            name: self.name,
            ipo_date: self.ipo_date.format_iso(),
            ipo_price: self.ipo_price,
            exchange: self.exchange,
            sector: self.sector,
            status: self.provider_status.as_str().to_string(),
            source: self.source,
        }
    }
}

impl TryFrom<&PendingRecord> for PendingCandidate {
    type Error = ValidationError;

    fn try_from(record: &PendingRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            ticker: Ticker::parse(&record.ticker)?,
            name: record.name.clone(),
            ipo_date: IsoDate::parse(&record.ipo_date)?,
            ipo_price: record.ipo_price,
            exchange: non_empty_or_unknown(record.exchange.clone()),
            sector: non_empty_or_unknown(record.sector.clone()),
            provider_status: ProviderStatus::parse(&record.status),
            source: record.source.clone(),
        })
    }
}

/// Which rung of the resolution ladder produced a price. Retained for
/// audit and debugging alongside every resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    OpenPrice,
    ClosePrice,
    MonthClosePrice,
    FirstAvailableOpen,
    FirstAvailableClose,
}

impl PriceSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenPrice => "open_price",
            Self::ClosePrice => "close_price",
            Self::MonthClosePrice => "month_close_price",
            Self::FirstAvailableOpen => "first_available_open",
            Self::FirstAvailableClose => "first_available_close",
        }
    }
}

/// Result of a price lookup, with provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    /// Actual trade date the price belongs to (not the nominal announced
    /// listing date).
    pub as_of_date: IsoDate,
    pub source: PriceSource,
}

/// Trading status of a listed security, recomputed per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradingStatus {
    Active {
        current_price: f64,
    },
    Delisted {
        last_price: Option<f64>,
        last_trade_date: Option<IsoDate>,
    },
    Unknown {
        detail: String,
    },
}

/// Sentinel label for a security whose current value is not a price.
///
/// `Merged` is applied externally (a corporate-actions feed would be needed
/// to detect it); the classifier never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Delisted,
    Merged,
    Unknown,
}

/// Current value of a listing: a live price or a sentinel status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentValue {
    Price(f64),
    Label(StatusLabel),
}

impl From<&TradingStatus> for CurrentValue {
    fn from(status: &TradingStatus) -> Self {
        match status {
            TradingStatus::Active { current_price } => Self::Price(*current_price),
            TradingStatus::Delisted { .. } => Self::Label(StatusLabel::Delisted),
            TradingStatus::Unknown { .. } => Self::Label(StatusLabel::Unknown),
        }
    }
}

/// Debut-to-now performance of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub ipo_open_price: f64,
    pub current: CurrentValue,
    pub price_change: Option<f64>,
    pub percent_change: Option<f64>,
}
