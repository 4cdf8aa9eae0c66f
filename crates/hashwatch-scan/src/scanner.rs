//! Scan engine: walker + hasher composed into snapshot production.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rayon::prelude::*;

use hashwatch_core::{Digest, ScanConfig, ScanError, ScanWarning, Snapshot};

use crate::hasher::hash_file;
use crate::walker::{walk, FileEntry};

/// Result of a completed scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// The freshly built snapshot.
    pub snapshot: Snapshot,
    /// Per-file problems encountered; these files are absent from the
    /// snapshot.
    pub warnings: Vec<ScanWarning>,
    /// Wall-clock duration of the scan.
    pub scan_duration: Duration,
}

/// Produces a [`Snapshot`] of a directory tree.
///
/// Hashing of independent files is parallelized across a rayon pool bounded
/// by `config.threads`; snapshot assembly goes through a concurrent map so
/// workers never race on the result. One file's failure never cancels its
/// siblings.
pub struct SnapshotScanner;

impl SnapshotScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan a directory tree into a snapshot.
    ///
    /// Fails only on structural problems: the root missing or not a
    /// directory. Unreadable files are collected as warnings.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
        self.scan_interruptible(config, &AtomicBool::new(false))
    }

    /// Like [`scan`](Self::scan), but checks `interrupt` between files and
    /// returns [`ScanError::Interrupted`] once it is set. A file that is
    /// already being hashed runs to completion; the flag is never checked
    /// mid-hash.
    pub fn scan_interruptible(
        &self,
        config: &ScanConfig,
        interrupt: &AtomicBool,
    ) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        // Enumerate candidates first; traversal problems become warnings.
        let mut warnings = Vec::new();
        let mut entries: Vec<FileEntry> = Vec::new();
        for result in walk(&root, config) {
            if interrupt.load(Ordering::Relaxed) {
                return Err(ScanError::Interrupted);
            }
            match result {
                Ok(entry) => entries.push(entry),
                Err(warning) => warnings.push(warning),
            }
        }

        let digests: DashMap<String, Digest> = DashMap::new();
        let hash_warnings: Mutex<Vec<ScanWarning>> = Mutex::new(Vec::new());

        let hash_all = || {
            entries.par_iter().for_each(|entry| {
                if interrupt.load(Ordering::Relaxed) {
                    return;
                }
                match hash_file(&entry.path, config.algorithm) {
                    Ok(digest) => {
                        digests.insert(entry.key.clone(), digest);
                    }
                    Err(err) => {
                        tracing::warn!(
                            path = %entry.path.display(),
                            error = %err,
                            "skipping unreadable file"
                        );
                        hash_warnings
                            .lock()
                            .expect("warning collector poisoned")
                            .push(ScanWarning::read_error(&entry.path, &err));
                    }
                }
            });
        };

        match config.threads {
            0 => hash_all(),
            n => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ScanError::Other {
                    message: format!("failed to build hashing pool: {e}"),
                })?
                .install(hash_all),
        }

        if interrupt.load(Ordering::Relaxed) {
            return Err(ScanError::Interrupted);
        }

        let mut snapshot = Snapshot::new(root, config.algorithm);
        for (key, digest) in digests {
            snapshot.insert(key, digest);
        }
        warnings.extend(
            hash_warnings
                .into_inner()
                .expect("warning collector poisoned"),
        );

        let scan_duration = start.elapsed();
        tracing::debug!(
            files = snapshot.len(),
            warnings = warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan complete"
        );

        Ok(ScanOutcome {
            snapshot,
            warnings,
            scan_duration,
        })
    }
}

impl Default for SnapshotScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashwatch_core::HashAlgorithm;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "nested").unwrap();
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let outcome = SnapshotScanner::new().scan(&config).unwrap();

        assert_eq!(outcome.snapshot.len(), 3);
        assert!(outcome.snapshot.contains("file1.txt"));
        assert!(outcome.snapshot.contains("dir1/file2.txt"));
        assert!(outcome.snapshot.contains("dir1/subdir/file3.txt"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_snapshot_digests_match_hasher() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let outcome = SnapshotScanner::new().scan(&config).unwrap();

        let expected = hash_file(&temp.path().join("file1.txt"), HashAlgorithm::Blake3).unwrap();
        assert_eq!(outcome.snapshot.digest("file1.txt"), Some(&expected));
    }

    #[test]
    fn test_excluded_directory_absent_from_snapshot() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let outcome = SnapshotScanner::new().scan(&config).unwrap();

        assert!(!outcome.snapshot.paths().any(|p| p.starts_with(".git")));
    }

    #[test]
    fn test_root_with_dot_components_yields_same_keys() {
        let temp = create_test_tree();
        let direct = SnapshotScanner::new()
            .scan(&ScanConfig::new(temp.path()))
            .unwrap();

        // Same root spelled differently; canonicalization must converge.
        let indirect_root = temp.path().join("dir1").join("..");
        let indirect = SnapshotScanner::new()
            .scan(&ScanConfig::new(indirect_root))
            .unwrap();

        assert!(direct.snapshot.same_contents(&indirect.snapshot));
    }

    #[test]
    fn test_missing_root_fails_up_front() {
        let temp = TempDir::new().unwrap();
        let config = ScanConfig::new(temp.path().join("nope"));

        let err = SnapshotScanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "not a dir").unwrap();

        let err = SnapshotScanner::new().scan(&ScanConfig::new(&file)).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_preset_interrupt_aborts() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());
        let interrupt = AtomicBool::new(true);

        let err = SnapshotScanner::new()
            .scan_interruptible(&config, &interrupt)
            .unwrap_err();
        assert!(matches!(err, ScanError::Interrupted));
    }

    #[test]
    fn test_bounded_thread_pool() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .threads(2usize)
            .build()
            .unwrap();

        let outcome = SnapshotScanner::new().scan(&config).unwrap();
        assert_eq!(outcome.snapshot.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_skipped_with_warning() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("ok1.txt"), "readable").unwrap();
        fs::write(root.join("ok2.txt"), "also readable").unwrap();
        let locked = root.join("locked.txt");
        fs::write(&locked, "no entry").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read anything; nothing to assert then.
        if fs::File::open(&locked).is_ok() {
            return;
        }

        let outcome = SnapshotScanner::new().scan(&ScanConfig::new(root)).unwrap();

        assert_eq!(outcome.snapshot.len(), 2);
        assert!(!outcome.snapshot.contains("locked.txt"));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].path.ends_with("locked.txt"));
    }
}
