//! Behavior-driven tests for trading-status classification and the
//! debut-to-now performance arithmetic built on top of it.

use std::collections::HashMap;

use ipotrack_core::{
    compute_performance, CoreError, CurrentValue, Period, StatusClassifier, StatusLabel, Ticker,
    TradingStatus,
};
use ipotrack_tests::{date, row, Arc, ScriptedHistory};

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid test ticker")
}

// =============================================================================
// Status classification
// =============================================================================

#[tokio::test]
async fn when_recent_prints_exist_the_ticker_is_active_at_the_last_close() {
    // Given: a ticker with prints inside the one-day window
    let classifier = StatusClassifier::new(Arc::new(ScriptedHistory {
        period_rows: HashMap::from([(
            (String::from("RDDT"), Period::OneDay),
            vec![row("2024-05-31", 62.15, 62.15), row("2024-06-01", 63.40, 63.40)],
        )]),
        ..Default::default()
    }));

    // When: the ticker is classified
    let status = classifier.classify(&ticker("RDDT"), date("2024-06-01")).await;

    // Then: it is active at the most recent close
    assert_eq!(
        status,
        TradingStatus::Active {
            current_price: 63.40
        }
    );
}

#[tokio::test]
async fn when_only_the_quarterly_window_has_prints_the_ticker_is_still_active() {
    // Given: a thinly traded ticker with nothing in the short windows
    let classifier = StatusClassifier::new(Arc::new(ScriptedHistory {
        period_rows: HashMap::from([(
            (String::from("THIN"), Period::ThreeMonths),
            vec![row("2024-04-12", 8.05, 8.05)],
        )]),
        ..Default::default()
    }));

    // When: the ticker is classified
    let status = classifier.classify(&ticker("THIN"), date("2024-06-01")).await;

    // Then: the widening lookback still finds it trading
    assert_eq!(status, TradingStatus::Active { current_price: 8.05 });
}

#[tokio::test]
async fn when_prints_stopped_long_ago_the_ticker_is_delisted_with_its_last_trade() {
    // Given: a ticker whose lifetime history ends 45 days ago
    let classifier = StatusClassifier::new(Arc::new(ScriptedHistory {
        rows_by_ticker: HashMap::from([(
            String::from("DEAD"),
            vec![row("2024-03-01", 12.0, 12.0), row("2024-04-17", 3.21, 3.21)],
        )]),
        ..Default::default()
    }));

    // When: the ticker is classified
    let status = classifier.classify(&ticker("DEAD"), date("2024-06-01")).await;

    // Then: it is delisted and the last observed trade is retained
    assert_eq!(
        status,
        TradingStatus::Delisted {
            last_price: Some(3.21),
            last_trade_date: Some(date("2024-04-17")),
        }
    );
}

#[tokio::test]
async fn when_no_history_exists_the_ticker_is_delisted_without_details() {
    // Given: a ticker no provider knows about
    let classifier = StatusClassifier::new(Arc::new(ScriptedHistory::default()));

    // When: the ticker is classified
    let status = classifier.classify(&ticker("VOID"), date("2024-06-01")).await;

    // Then: it is delisted with no last-trade information
    assert_eq!(
        status,
        TradingStatus::Delisted {
            last_price: None,
            last_trade_date: None,
        }
    );
}

#[tokio::test]
async fn when_the_provider_fails_the_status_is_unknown_with_the_reason() {
    // Given: an upstream outage
    let classifier = StatusClassifier::new(Arc::new(ScriptedHistory {
        fail_with: Some(ipotrack_core::ProviderError::transport("upstream unavailable")),
        ..Default::default()
    }));

    // When: the ticker is classified
    let status = classifier.classify(&ticker("RDDT"), date("2024-06-01")).await;

    // Then: the status is unknown rather than a guess, with the diagnostic
    match status {
        TradingStatus::Unknown { detail } => {
            assert!(detail.contains("upstream unavailable"));
        }
        other => panic!("expected unknown status, got {other:?}"),
    }
}

// =============================================================================
// Performance
// =============================================================================

#[test]
fn when_a_current_price_is_known_performance_is_rounded_to_cents() {
    // Given: a debut at 34.00 now trading at 45.50
    let result =
        compute_performance(34.0, CurrentValue::Price(45.50)).expect("performance should compute");

    // Then: both axes are rounded to two decimals
    assert_eq!(result.price_change, Some(11.50));
    assert_eq!(result.percent_change, Some(33.82));
}

#[test]
fn when_the_ticker_is_delisted_performance_has_no_numeric_change() {
    // Given: a listing whose current value is a sentinel label
    let result = compute_performance(34.0, CurrentValue::Label(StatusLabel::Delisted))
        .expect("performance should compute");

    // Then: the label passes through and no change is fabricated
    assert_eq!(result.current, CurrentValue::Label(StatusLabel::Delisted));
    assert_eq!(result.price_change, None);
    assert_eq!(result.percent_change, None);
}

#[test]
fn when_the_recorded_debut_price_is_not_positive_the_defect_is_loud() {
    // Given: a corrupted record with a zero debut price

    // When: performance is computed against it
    let error = compute_performance(0.0, CurrentValue::Price(10.0)).expect_err("must fail");

    // Then: the error names the invariant instead of dividing by zero
    assert!(matches!(error, CoreError::NonPositiveOpenPrice { .. }));
}

#[test]
fn when_classification_feeds_performance_the_label_mapping_is_stable() {
    // Given: the three classifier outcomes
    let active = TradingStatus::Active { current_price: 45.5 };
    let delisted = TradingStatus::Delisted {
        last_price: Some(3.21),
        last_trade_date: Some(date("2024-04-17")),
    };
    let unknown = TradingStatus::Unknown {
        detail: String::from("upstream unavailable"),
    };

    // Then: each maps to the expected current value
    assert_eq!(CurrentValue::from(&active), CurrentValue::Price(45.5));
    assert_eq!(
        CurrentValue::from(&delisted),
        CurrentValue::Label(StatusLabel::Delisted)
    );
    assert_eq!(
        CurrentValue::from(&unknown),
        CurrentValue::Label(StatusLabel::Unknown)
    );
}
