//! Classified differences between two snapshots.

use serde::{Deserialize, Serialize};

/// Paths classified by how they changed between a baseline and a fresh
/// snapshot.
///
/// A path appears in at most one of the three sets; a path in neither is
/// unchanged. Together with the unchanged paths, the three sets partition
/// the union of both snapshots' key sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// In the new snapshot, not in the baseline.
    pub added: Vec<String>,
    /// In the baseline, not in the new snapshot.
    pub removed: Vec<String>,
    /// In both, with differing digests.
    pub modified: Vec<String>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no changes were detected.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Whether any change was detected.
    pub fn has_changes(&self) -> bool {
        !self.is_empty()
    }

    /// Total number of changed paths.
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}
