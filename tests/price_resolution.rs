//! Behavior-driven tests for debut-price resolution.
//!
//! These tests verify HOW the fallback ladder behaves for the data shapes
//! freshly listed tickers actually produce: delayed first prints, zero
//! opens, and history that only exists under a wider lookback.

use std::collections::HashMap;

use ipotrack_core::{PriceResolver, PriceSource, Ticker};
use ipotrack_tests::{date, row, Arc, ScriptedHistory};

fn resolver_for(ticker: &str, rows: Vec<ipotrack_core::DailyRow>) -> PriceResolver {
    PriceResolver::new(Arc::new(ScriptedHistory {
        rows_by_ticker: HashMap::from([(ticker.to_string(), rows)]),
        ..Default::default()
    }))
}

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid test ticker")
}

#[tokio::test]
async fn when_the_debut_window_has_a_print_the_open_price_wins() {
    // Given: a listing that traded on its announced date
    let resolver = resolver_for("RDDT", vec![row("2024-03-21", 47.0, 50.44)]);

    // When: the debut price is resolved
    let quote = resolver
        .resolve_opening_price(&ticker("RDDT"), date("2024-03-21"))
        .await
        .expect("resolution should succeed");

    // Then: the first open wins and the provenance says so
    assert_eq!(quote.price, 47.0);
    assert_eq!(quote.source, PriceSource::OpenPrice);
    assert_eq!(quote.as_of_date, date("2024-03-21"));
}

#[tokio::test]
async fn when_the_first_print_is_late_the_actual_trade_date_is_kept() {
    // Given: a listing whose first print arrived three days after the
    // announced date (a weekend debut)
    let resolver = resolver_for("ALAB", vec![row("2024-03-25", 52.56, 62.03)]);

    // When: the debut price is resolved against the announced date
    let quote = resolver
        .resolve_opening_price(&ticker("ALAB"), date("2024-03-22"))
        .await
        .expect("resolution should succeed");

    // Then: the quote is dated by the trade, not the announcement
    assert_eq!(quote.price, 52.56);
    assert_eq!(quote.as_of_date, date("2024-03-25"));
}

#[tokio::test]
async fn when_the_open_is_zero_filled_the_same_day_close_is_used() {
    // Given: a provider that zero-fills the open around the debut
    let resolver = resolver_for("RDDT", vec![row("2024-03-21", 0.0, 50.44)]);

    // When: the debut price is resolved
    let quote = resolver
        .resolve_opening_price(&ticker("RDDT"), date("2024-03-21"))
        .await
        .expect("resolution should succeed");

    // Then: the close on the same day is used instead
    assert_eq!(quote.price, 50.44);
    assert_eq!(quote.source, PriceSource::ClosePrice);
}

#[tokio::test]
async fn when_the_listing_traded_earlier_in_the_month_the_month_close_is_used() {
    // Given: a listing that actually started trading before its recorded
    // date, so the forward window misses it
    let resolver = resolver_for("EARL", vec![row("2024-03-05", 21.0, 22.5)]);

    // When: the debut price is resolved against the later recorded date
    let quote = resolver
        .resolve_opening_price(&ticker("EARL"), date("2024-03-21"))
        .await
        .expect("resolution should succeed");

    // Then: the first trading day of the month supplies the close
    assert_eq!(quote.price, 22.5);
    assert_eq!(quote.source, PriceSource::MonthClosePrice);
}

#[tokio::test]
async fn when_only_lifetime_history_exists_the_earliest_open_is_used() {
    // Given: a listing whose recorded date is long after it started
    // trading (a relisting or a bad calendar entry)
    let resolver = resolver_for(
        "OLD",
        vec![row("2022-11-09", 18.0, 17.2), row("2022-11-10", 17.5, 17.9)],
    );

    // When: the debut price is resolved
    let quote = resolver
        .resolve_opening_price(&ticker("OLD"), date("2024-03-21"))
        .await
        .expect("resolution should succeed");

    // Then: the earliest lifetime open wins
    assert_eq!(quote.price, 18.0);
    assert_eq!(quote.source, PriceSource::FirstAvailableOpen);
    assert_eq!(quote.as_of_date, date("2022-11-09"));
}

#[tokio::test]
async fn when_no_rung_yields_data_the_failure_names_the_ticker() {
    // Given: a ticker with no trading data anywhere
    let resolver = PriceResolver::new(Arc::new(ScriptedHistory::default()));

    // When: resolution is attempted
    let failure = resolver
        .resolve_opening_price(&ticker("GONE"), date("2023-05-01"))
        .await
        .expect_err("resolution should fail");

    // Then: the failure is attributable for manual review
    assert_eq!(failure.ticker.as_str(), "GONE");
    assert_eq!(failure.reason, "no price data available");
}

#[tokio::test]
async fn when_the_provider_errors_the_failure_carries_the_diagnostic() {
    // Given: an upstream outage
    let resolver = PriceResolver::new(Arc::new(ScriptedHistory {
        fail_with: Some(ipotrack_core::ProviderError::transport("connection reset")),
        ..Default::default()
    }));

    // When: resolution is attempted
    let failure = resolver
        .resolve_opening_price(&ticker("RDDT"), date("2024-03-21"))
        .await
        .expect_err("resolution should fail");

    // Then: the provider diagnostic is preserved per ticker
    assert_eq!(failure.reason, "connection reset");
}
