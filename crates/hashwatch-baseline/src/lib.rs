//! Baseline persistence and snapshot diffing for hashwatch.
//!
//! A baseline is a [`Snapshot`] persisted to an explicit storage location.
//! This crate owns the on-disk representation (a versioned, human-readable
//! JSON envelope) and the classification of differences between a baseline
//! and a fresh snapshot.
//!
//! # Example
//!
//! ```rust,no_run
//! use hashwatch_baseline::{diff, BaselineStore};
//! use hashwatch_scan::{ScanConfig, SnapshotScanner};
//!
//! let store = BaselineStore::new("/var/lib/hashwatch/baseline.json");
//! let baseline = store.load().unwrap();
//!
//! let outcome = SnapshotScanner::new()
//!     .scan(&ScanConfig::new(&baseline.root))
//!     .unwrap();
//!
//! let changes = diff(&baseline, &outcome.snapshot);
//! println!("{} added, {} removed, {} modified",
//!     changes.added.len(), changes.removed.len(), changes.modified.len());
//! ```

mod diff;
mod store;

pub use diff::diff;
pub use store::{BaselineStore, BASELINE_VERSION};

// Re-export core types for convenience
pub use hashwatch_core::{BaselineError, ChangeSet, Digest, HashAlgorithm, Snapshot};
