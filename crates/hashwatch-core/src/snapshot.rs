//! Snapshot and digest types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithm::HashAlgorithm;

/// Lowercase hex digest of a file's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Build a digest from raw hash bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in hex characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest is empty (never true for a computed digest).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Digest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Complete observed state of a directory tree at one point in time.
///
/// Keys are root-relative paths with `/` separators, so the same logical
/// file maps to the same key no matter which working directory the tool was
/// invoked from. A snapshot is never mutated after a scan produces it;
/// verification always builds a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Digest algorithm used for every file in this snapshot.
    pub algorithm: HashAlgorithm,

    /// Canonical root path that was scanned.
    pub root: PathBuf,

    /// When the scan was performed.
    pub created_at: DateTime<Utc>,

    /// Root-relative path -> content digest.
    pub files: BTreeMap<String, Digest>,
}

impl Snapshot {
    /// Create an empty snapshot for a root.
    pub fn new(root: impl Into<PathBuf>, algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            root: root.into(),
            created_at: Utc::now(),
            files: BTreeMap::new(),
        }
    }

    /// Record a file digest. Keys are unique; a second insert for the same
    /// path replaces the first.
    pub fn insert(&mut self, path: impl Into<String>, digest: Digest) {
        self.files.insert(path.into(), digest);
    }

    /// Digest for a path, if present.
    pub fn digest(&self, path: &str) -> Option<&Digest> {
        self.files.get(path)
    }

    /// Whether a path is present.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the snapshot has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over (path, digest) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Digest)> {
        self.files.iter()
    }

    /// Iterate over paths in key order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    /// Whether two snapshots observed the same content: same algorithm and
    /// digest-for-digest identical file maps. Ignores timestamps.
    pub fn same_contents(&self, other: &Snapshot) -> bool {
        self.algorithm == other.algorithm && self.files == other.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_from_bytes() {
        let digest = Digest::from_bytes(&[0xab; 32]);
        assert_eq!(digest.len(), 64);
        assert!(digest.as_str().starts_with("abab"));
        assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_snapshot_insert_and_lookup() {
        let mut snapshot = Snapshot::new("/data", HashAlgorithm::Blake3);
        snapshot.insert("a.txt", Digest::from("h1"));
        snapshot.insert("sub/b.txt", Digest::from("h2"));

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains("a.txt"));
        assert_eq!(snapshot.digest("sub/b.txt"), Some(&Digest::from("h2")));
        assert!(snapshot.digest("missing").is_none());
    }

    #[test]
    fn test_snapshot_keys_unique() {
        let mut snapshot = Snapshot::new("/data", HashAlgorithm::Blake3);
        snapshot.insert("a.txt", Digest::from("h1"));
        snapshot.insert("a.txt", Digest::from("h2"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.digest("a.txt"), Some(&Digest::from("h2")));
    }

    #[test]
    fn test_same_contents_ignores_timestamp() {
        let mut a = Snapshot::new("/data", HashAlgorithm::Blake3);
        a.insert("a.txt", Digest::from("h1"));

        let mut b = Snapshot::new("/data", HashAlgorithm::Blake3);
        b.created_at = a.created_at + chrono::Duration::seconds(60);
        b.insert("a.txt", Digest::from("h1"));

        assert!(a.same_contents(&b));

        b.insert("a.txt", Digest::from("h9"));
        assert!(!a.same_contents(&b));
    }

    #[test]
    fn test_same_contents_requires_same_algorithm() {
        let a = Snapshot::new("/data", HashAlgorithm::Blake3);
        let b = Snapshot::new("/data", HashAlgorithm::Sha256);
        assert!(!a.same_contents(&b));
    }
}
