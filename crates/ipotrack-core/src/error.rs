use thiserror::Error;

/// Validation and contract errors exposed by `ipotrack-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("date must be ISO YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("company name cannot be empty")]
    EmptyName,

    #[error("ipo_price must be positive and finite, got {value}")]
    NonPositivePrice { value: f64 },

    #[error("invalid period '{value}', expected one of 1d, 5d, 1mo, 3mo, max")]
    InvalidPeriod { value: String },
}

/// Per-record normalization failure. A record that cannot be normalized is
/// dropped; it never aborts a batch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("provider record has no symbol")]
    MissingSymbol,
    #[error("provider record for '{ticker}' has no listing date")]
    MissingDate { ticker: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] ipotrack_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Provider(#[from] crate::history::ProviderError),

    // An accepted record always carries a positive debut price; hitting this
    // means an upstream invariant was bypassed.
    #[error("ipo open price must be positive, got {value}")]
    NonPositiveOpenPrice { value: f64 },
}
