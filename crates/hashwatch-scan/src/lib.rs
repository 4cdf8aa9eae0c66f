//! Directory traversal and content hashing engine for hashwatch.
//!
//! This crate turns a directory tree into a [`Snapshot`]: a mapping from
//! root-relative path to content digest.
//!
//! # Overview
//!
//! - **Parallel hashing** via rayon, bounded by a configurable pool size
//! - **Pruned traversal** via jwalk; excluded directories are never entered
//! - **Per-file fault tolerance**: unreadable files become warnings, not
//!   failures
//! - **Interruptible** between files for long scans
//!
//! # Example
//!
//! ```rust,no_run
//! use hashwatch_scan::{ScanConfig, SnapshotScanner};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let scanner = SnapshotScanner::new();
//! let outcome = scanner.scan(&config).unwrap();
//!
//! println!("Hashed {} files", outcome.snapshot.len());
//! println!("Skipped {} unreadable files", outcome.warnings.len());
//! ```

mod hasher;
mod scanner;
mod walker;

pub use hasher::hash_file;
pub use scanner::{ScanOutcome, SnapshotScanner};
pub use walker::{walk, FileEntry};

// Re-export core types for convenience
pub use hashwatch_core::{
    Digest, HashAlgorithm, ScanConfig, ScanError, ScanWarning, Snapshot, WarningKind,
};
