//! Core types and errors for hashwatch.
//!
//! This crate provides the fundamental data structures shared across the
//! hashwatch ecosystem: snapshots, digests, change sets, scan configuration,
//! and the error taxonomy.

mod algorithm;
mod changes;
mod config;
mod error;
mod snapshot;

pub use algorithm::HashAlgorithm;
pub use changes::ChangeSet;
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{BaselineError, ScanError, ScanWarning, WarningKind};
pub use snapshot::{Digest, Snapshot};
