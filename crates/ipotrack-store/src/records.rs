use serde::{Deserialize, Serialize};

/// One persisted IPO entry in the canonical dataset.
///
/// Fields are intentionally loose (`String`/`f64`); `ipotrack-core` validates
/// them when lifting into domain records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoRecord {
    pub ticker: String,
    pub name: String,
    pub ipo_date: String,
    pub ipo_price: f64,
    #[serde(default = "unknown")]
    pub exchange: String,
    #[serde(default = "unknown")]
    pub sector: String,
}

fn unknown() -> String {
    String::from("Unknown")
}

/// Top-level shape of the canonical dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub last_updated: String,
    pub source: String,
    pub ipos: Vec<IpoRecord>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            last_updated: String::new(),
            source: String::from("Multiple sources"),
            ipos: Vec::new(),
        }
    }
}

/// Candidate entry awaiting review, as written by the discovery pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRecord {
    pub ticker: String,
    pub name: String,
    pub ipo_date: String,
    pub ipo_price: f64,
    #[serde(default = "unknown")]
    pub exchange: String,
    #[serde(default = "unknown")]
    pub sector: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub source: String,
}

/// Inclusive date range covered by a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

/// Top-level shape of the pending-review file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingFile {
    pub generated_at: String,
    pub source: String,
    pub date_range: DateRange,
    pub existing_count: usize,
    pub pending_count: usize,
    pub pending_entries: Vec<PendingRecord>,
}

/// Entry that could not be resolved, retained for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub ticker: String,
    pub name: String,
    pub ipo_date: String,
    pub error: String,
}

/// Top-level shape of the failed-entries file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub generated_at: String,
    pub failed_count: usize,
    pub failed_entries: Vec<FailedEntry>,
}
