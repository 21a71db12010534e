//! Core contracts for ipotrack.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Provider adapters for IPO calendars and daily price history
//! - The debut-price resolution ladder
//! - The trading-status classifier
//! - Merge/dedup and the pending-review pipeline
//! - TTL caching and request pacing

pub mod adapters;
pub mod cache;
pub mod classifier;
pub mod domain;
pub mod error;
pub mod history;
pub mod http_client;
pub mod merge;
pub mod performance;
pub mod pipeline;
pub mod resolver;
pub mod throttle;

pub use adapters::{parse_offer_price, CalendarSource, FinnhubCalendar, FmpCalendar, YahooHistory};
pub use cache::{CachedHistory, TtlCache};
pub use classifier::StatusClassifier;
pub use domain::{
    CanonicalRecord, CurrentValue, IsoDate, PendingCandidate, PerformanceResult, PriceQuote,
    PriceSource, ProviderStatus, StatusLabel, Ticker, TradingStatus,
};
pub use error::{CoreError, NormalizationError, ValidationError};
pub use history::{
    DailyRow, DailySeries, HistoryRequest, HistorySource, Period, ProviderError, ProviderErrorKind,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use ipotrack_store::{
    DateRange, Dataset, FailedEntry, FailedFile, FileStore, IpoRecord, PendingFile, PendingRecord,
    StoreError,
};
pub use merge::{filter_valid, merge_records};
pub use performance::compute_performance;
pub use pipeline::{DiscoveryReport, PendingReviewPipeline, ReviewOutcome, SyncReport};
pub use resolver::{PriceResolver, ResolutionFailure};
pub use throttle::Pacer;
