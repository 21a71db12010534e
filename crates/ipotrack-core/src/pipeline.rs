//! Batch pipelines over the canonical dataset.
//!
//! Three flows share the store and pacing machinery: calendar sync folds
//! provider entries straight into the dataset, discovery stages unseen
//! entries for manual review, and pending review resolves staged entries
//! into accepted records with verified debut prices.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use ipotrack_store::{DateRange, Dataset, FailedEntry, FailedFile, FileStore, IpoRecord, PendingFile};

use crate::adapters::CalendarSource;
use crate::domain::{CanonicalRecord, IsoDate, PendingCandidate};
use crate::error::CoreError;
use crate::history::HistorySource;
use crate::merge::{filter_valid, merge_records};
use crate::resolver::PriceResolver;
use crate::throttle::Pacer;

/// Counts from one pending-review pass. A failure never aborts the batch;
/// everything resolvable still lands in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Snapshot taken before the merge, when anything was accepted.
    pub backup_path: Option<PathBuf>,
}

/// Counts from one calendar sync pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub added: usize,
    pub total: usize,
    pub last_updated: String,
}

/// Counts from one discovery pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryReport {
    pub fetched: usize,
    pub rejected: usize,
    pub already_tracked: usize,
    pub pending: usize,
}

/// Orchestrates the sync, discovery, and pending-review flows against a
/// single file store.
#[derive(Clone)]
pub struct PendingReviewPipeline {
    store: FileStore,
    resolver: PriceResolver,
    calendar: Option<Arc<dyn CalendarSource>>,
    pacer: Pacer,
}

impl PendingReviewPipeline {
    pub fn new(store: FileStore, history: Arc<dyn HistorySource>) -> Self {
        Self {
            store,
            resolver: PriceResolver::new(history),
            calendar: None,
            pacer: Pacer::default(),
        }
    }

    /// Calendar used for the sector lookup on accepted entries.
    pub fn with_calendar(mut self, calendar: Arc<dyn CalendarSource>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Resolve staged pending entries into the canonical dataset.
    ///
    /// Entries with a rejected provider status (withdrawn, postponed) and
    /// tickers already tracked are skipped. Each remaining entry is resolved
    /// through the price ladder; the accepted record carries the resolved
    /// price and the actual first trade date, not the announced one. The
    /// dataset is snapshotted before the merge, and unresolvable entries are
    /// written to the failed file for manual review.
    pub async fn process_pending(&self, today: IsoDate) -> Result<ReviewOutcome, CoreError> {
        let Some(pending) = self.store.load_pending()? else {
            return Ok(ReviewOutcome::default());
        };
        if pending.pending_entries.is_empty() {
            return Ok(ReviewOutcome::default());
        }

        let mut dataset = self.store.load_dataset()?;
        let mut seen = tracked_tickers(&dataset);

        let mut accepted: Vec<IpoRecord> = Vec::new();
        let mut failed: Vec<FailedEntry> = Vec::new();
        let mut skipped = 0usize;

        for raw in &pending.pending_entries {
            let candidate = match PendingCandidate::try_from(raw) {
                Ok(candidate) => candidate,
                Err(error) => {
                    failed.push(FailedEntry {
                        ticker: raw.ticker.clone(),
                        name: raw.name.clone(),
                        ipo_date: raw.ipo_date.clone(),
                        error: error.to_string(),
                    });
                    continue;
                }
            };

            if candidate.provider_status.is_rejected() {
                skipped += 1;
                continue;
            }
            // Ticker is already normalized to uppercase.
            let key = candidate.ticker.as_str().to_string();
            if seen.contains(&key) {
                skipped += 1;
                continue;
            }

            self.pacer.wait().await;
            match self
                .resolver
                .resolve_opening_price(&candidate.ticker, candidate.ipo_date)
                .await
            {
                Ok(quote) => {
                    let sector = self.sector_for(&candidate).await;
                    match CanonicalRecord::new(
                        candidate.ticker.clone(),
                        candidate.name.clone(),
                        quote.as_of_date,
                        quote.price,
                        candidate.exchange.clone(),
                        sector,
                    ) {
                        Ok(record) => {
                            seen.insert(key);
                            accepted.push(record.into_stored());
                        }
                        Err(error) => failed.push(FailedEntry {
                            ticker: raw.ticker.clone(),
                            name: raw.name.clone(),
                            ipo_date: raw.ipo_date.clone(),
                            error: error.to_string(),
                        }),
                    }
                }
                Err(failure) => failed.push(FailedEntry {
                    ticker: raw.ticker.clone(),
                    name: raw.name.clone(),
                    ipo_date: raw.ipo_date.clone(),
                    error: failure.reason,
                }),
            }
        }

        let succeeded = accepted.len();
        let mut backup_path = None;
        if !accepted.is_empty() {
            backup_path = Some(self.store.backup_dataset(&dataset)?);
            dataset.ipos = filter_valid(merge_records(std::mem::take(&mut dataset.ipos), accepted));
            dataset.last_updated = today.format_iso();
            self.store.save_dataset(&dataset)?;
        }
        if !failed.is_empty() {
            self.store.save_failed(&FailedFile {
                generated_at: today.format_iso(),
                failed_count: failed.len(),
                failed_entries: failed.clone(),
            })?;
        }

        Ok(ReviewOutcome {
            succeeded,
            failed: failed.len(),
            skipped,
            backup_path,
        })
    }

    /// Fold calendar entries announced in `[from, to]` straight into the
    /// dataset. Entries with a rejected status are dropped; the post-merge
    /// validity filter drops anything without a positive price. An empty
    /// fetch still refreshes `last_updated`.
    pub async fn sync_calendar(
        &self,
        calendar: &dyn CalendarSource,
        from: IsoDate,
        to: IsoDate,
        today: IsoDate,
    ) -> Result<SyncReport, CoreError> {
        let candidates = calendar.ipo_calendar(from, to).await?;
        let mut dataset = self.store.load_dataset()?;

        let fetched = candidates.len();
        let existing_valid = filter_valid(dataset.ipos.clone()).len();

        let incoming: Vec<IpoRecord> = candidates
            .into_iter()
            .filter(|candidate| !candidate.provider_status.is_rejected())
            .map(stored_record)
            .collect();

        dataset.ipos = filter_valid(merge_records(std::mem::take(&mut dataset.ipos), incoming));
        dataset.last_updated = today.format_iso();
        self.store.save_dataset(&dataset)?;

        Ok(SyncReport {
            fetched,
            added: dataset.ipos.len().saturating_sub(existing_valid),
            total: dataset.ipos.len(),
            last_updated: dataset.last_updated,
        })
    }

    /// Stage calendar entries that are not yet tracked for manual review.
    ///
    /// Rejected statuses never become pending entries. The pending file is
    /// rewritten on every pass so it always reflects the latest window.
    pub async fn discover_missing(
        &self,
        calendar: &dyn CalendarSource,
        from: IsoDate,
        to: IsoDate,
        today: IsoDate,
    ) -> Result<DiscoveryReport, CoreError> {
        let candidates = calendar.ipo_calendar(from, to).await?;
        let dataset = self.store.load_dataset()?;
        let mut seen = tracked_tickers(&dataset);

        let fetched = candidates.len();
        let mut rejected = 0usize;
        let mut already_tracked = 0usize;
        let mut entries = Vec::new();
        for candidate in candidates {
            if candidate.provider_status.is_rejected() {
                rejected += 1;
                continue;
            }
            let key = candidate.ticker.as_str().to_string();
            if seen.contains(&key) {
                already_tracked += 1;
                continue;
            }
            seen.insert(key);
            entries.push(candidate.into_stored());
        }

        let pending = PendingFile {
            generated_at: today.format_iso(),
            source: format!("{} IPO Calendar API", calendar.name()),
            date_range: DateRange {
                from: from.format_iso(),
                to: to.format_iso(),
            },
            existing_count: dataset.ipos.len(),
            pending_count: entries.len(),
            pending_entries: entries,
        };
        self.store.save_pending(&pending)?;

        Ok(DiscoveryReport {
            fetched,
            rejected,
            already_tracked,
            pending: pending.pending_count,
        })
    }

    async fn sector_for(&self, candidate: &PendingCandidate) -> String {
        if candidate.sector != "Unknown" {
            return candidate.sector.clone();
        }
        if let Some(calendar) = &self.calendar {
            if let Ok(Some(sector)) = calendar.profile_sector(&candidate.ticker).await {
                if !sector.trim().is_empty() {
                    return sector;
                }
            }
        }
        String::from("Unknown")
    }
}

fn tracked_tickers(dataset: &Dataset) -> HashSet<String> {
    dataset
        .ipos
        .iter()
        .map(|record| record.ticker.to_ascii_uppercase())
        .collect()
}

fn stored_record(candidate: PendingCandidate) -> IpoRecord {
    IpoRecord {
        ticker: candidate.ticker.into(),
        name: candidate.name,
        ipo_date: candidate.ipo_date.format_iso(),
        ipo_price: candidate.ipo_price,
        exchange: candidate.exchange,
        sector: candidate.sector,
    }
}
