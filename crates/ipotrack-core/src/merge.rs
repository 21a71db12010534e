//! Merge and dedup of incoming records against the canonical dataset.
//!
//! Operates on raw stored records rather than validated domain records so
//! that an existing entry that has since become invalid is still carried
//! through the merge and only excluded by the post-merge validity filter.

use std::collections::HashSet;

use ipotrack_store::IpoRecord;

/// Fold `incoming` into `existing` without creating ticker duplicates.
///
/// First occurrence wins: an incoming record whose uppercased ticker is
/// already present (in the existing set or earlier in the same batch) is
/// silently dropped, never merged or overwritten. The result is re-sorted
/// by `ipo_date` descending; the sort is stable, so ties keep their
/// original relative order.
pub fn merge_records(existing: Vec<IpoRecord>, incoming: Vec<IpoRecord>) -> Vec<IpoRecord> {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|record| record.ticker.to_ascii_uppercase())
        .collect();

    let mut merged = existing;
    for record in incoming {
        let key = record.ticker.to_ascii_uppercase();
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.insert(key);
        merged.push(record);
    }

    merged.sort_by(|a, b| b.ipo_date.cmp(&a.ipo_date));
    merged
}

/// Post-merge validity filter: drop records lacking a ticker or date, or
/// with a non-positive price. Runs after the merge so only the persisted
/// output is affected.
pub fn filter_valid(records: Vec<IpoRecord>) -> Vec<IpoRecord> {
    records
        .into_iter()
        .filter(|record| {
            !record.ticker.trim().is_empty()
                && !record.ipo_date.trim().is_empty()
                && record.ipo_price > 0.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, date: &str, price: f64) -> IpoRecord {
        IpoRecord {
            ticker: ticker.to_string(),
            name: format!("{ticker} Inc"),
            ipo_date: date.to_string(),
            ipo_price: price,
            exchange: String::from("NYSE"),
            sector: String::from("Unknown"),
        }
    }

    #[test]
    fn merge_skips_existing_tickers_case_insensitively() {
        let existing = vec![record("RDDT", "2024-03-21", 34.0)];
        let incoming = vec![record("rddt", "2024-03-22", 99.0)];

        let merged = merge_records(existing, incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].ipo_price, 34.0);
    }

    #[test]
    fn first_occurrence_wins_within_a_batch() {
        let incoming = vec![
            record("ALAB", "2024-03-20", 36.0),
            record("ALAB", "2024-03-20", 40.0),
        ];

        let merged = merge_records(Vec::new(), incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].ipo_price, 36.0);
    }

    #[test]
    fn result_is_sorted_newest_first() {
        let existing = vec![record("ARM", "2023-09-14", 51.0)];
        let incoming = vec![
            record("RDDT", "2024-03-21", 34.0),
            record("CART", "2023-09-19", 30.0),
        ];

        let merged = merge_records(existing, incoming);
        let tickers: Vec<&str> = merged.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["RDDT", "CART", "ARM"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let incoming = vec![
            record("RDDT", "2024-03-21", 34.0),
            record("ALAB", "2024-03-20", 36.0),
        ];

        let once = merge_records(Vec::new(), incoming.clone());
        let twice = merge_records(once.clone(), incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_runs_after_merge_and_drops_invalid_records() {
        let existing = vec![record("BAD", "", 12.0)];
        let incoming = vec![
            record("RDDT", "2024-03-21", 34.0),
            record("ZERO", "2024-01-10", 0.0),
        ];

        let merged = merge_records(existing, incoming);
        // The invalid existing record survives the merge itself.
        assert_eq!(merged.len(), 3);

        let valid = filter_valid(merged);
        let tickers: Vec<&str> = valid.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["RDDT"]);
    }

    #[test]
    fn no_two_records_share_an_uppercased_ticker() {
        let incoming = vec![
            record("RDDT", "2024-03-21", 34.0),
            record("Rddt", "2024-03-21", 35.0),
            record("ALAB", "2024-03-20", 36.0),
        ];

        let merged = merge_records(Vec::new(), incoming);
        let mut keys: Vec<String> = merged
            .iter()
            .map(|r| r.ticker.to_ascii_uppercase())
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), merged.len());
    }
}
