//! Canonical domain types for the IPO dataset.
//!
//! All provider payloads are normalized into these shapes at the adapter
//! boundary; nothing downstream sees raw provider fields. Construction
//! validates the store invariants (uppercase unique ticker, parseable date,
//! positive debut price).

mod date;
mod records;
mod ticker;

pub use date::IsoDate;
pub use records::{
    CanonicalRecord, CurrentValue, PendingCandidate, PerformanceResult, PriceQuote, PriceSource,
    ProviderStatus, StatusLabel, TradingStatus,
};
pub use ticker::Ticker;
