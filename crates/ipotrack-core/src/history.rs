//! Daily price-history source contract.
//!
//! Both the resolution ladder and the status classifier run on top of this
//! trait. Providers are treated as unreliable: any call may fail, return
//! empty, or return partial data, and callers convert errors into per-ticker
//! outcomes rather than batch failures.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::domain::{IsoDate, Ticker};
use crate::error::ValidationError;

/// Named lookback period, mirroring the ranges daily-history providers
/// accept directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    Max,
}

impl Period {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::Max => "max",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "1d" => Ok(Self::OneDay),
            "5d" => Ok(Self::FiveDays),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "max" => Ok(Self::Max),
            other => Err(ValidationError::InvalidPeriod {
                value: other.to_owned(),
            }),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// History query: either an explicit half-open date range `[start, end)` or
/// a named lookback period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRequest {
    Range { start: IsoDate, end: IsoDate },
    Period(Period),
}

/// One daily row. Prices of `0.0` mean "no usable value" (some providers
/// emit zero-filled rows around a debut).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: IsoDate,
    pub open: f64,
    pub close: f64,
}

/// Daily history for one ticker, rows sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub ticker: Ticker,
    pub rows: Vec<DailyRow>,
}

impl DailySeries {
    pub fn empty(ticker: Ticker) -> Self {
        Self {
            ticker,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_row(&self) -> Option<&DailyRow> {
        self.rows.first()
    }

    pub fn last_row(&self) -> Option<&DailyRow> {
        self.rows.last()
    }
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Transport,
    RateLimited,
    InvalidRequest,
    MissingCredential,
    Internal,
}

/// Structured provider error. Transport and rate-limit failures are
/// retryable in principle; the pipeline converts all of them into
/// per-ticker failures instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
    retryable: bool,
}

impl ProviderError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn missing_credential(provider: &str) -> Self {
        Self {
            kind: ProviderErrorKind::MissingCredential,
            message: format!("no API credential configured for {provider}"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Daily-history provider contract.
///
/// Implementations must be `Send + Sync`; the pipeline shares one source
/// across sequential per-ticker calls.
pub trait HistorySource: Send + Sync {
    /// Fetch daily rows for a ticker over a range or named period.
    ///
    /// An empty series is a normal outcome (sparse or delayed data for a
    /// fresh listing), not an error.
    fn daily_history<'a>(
        &'a self,
        ticker: &'a Ticker,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<DailySeries, ProviderError>> + Send + 'a>>;
}
