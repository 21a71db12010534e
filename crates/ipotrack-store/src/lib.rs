//! Flat-file persistence for the ipotrack canonical dataset.
//!
//! This crate owns the durable representation of the IPO database:
//!
//! - the canonical dataset file (`ipos.json`)
//! - the pending-review file (`pending_ipos.json`)
//! - the failed-entries file (`failed_ipos.json`)
//! - the pre-merge backup snapshot (`ipos_backup.json`)
//!
//! Records are stored as plain strings and floats so that a legacy or
//! partially damaged file still loads; schema validation happens at the
//! domain boundary in `ipotrack-core`.

mod error;
mod file_store;
mod records;

pub use error::StoreError;
pub use file_store::FileStore;
pub use records::{
    DateRange, Dataset, FailedEntry, FailedFile, IpoRecord, PendingFile, PendingRecord,
};
