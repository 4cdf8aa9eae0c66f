//! Snapshot comparison.

use hashwatch_core::{ChangeSet, Snapshot};

/// Classify every path across two snapshots.
///
/// Baseline pass: paths absent from `current` are removed; paths present
/// with a different digest are modified. Current pass: paths absent from
/// the baseline are added. Shared paths with equal digests are implicitly
/// unchanged and not enumerated.
///
/// Keys are compared as exact strings. The walker's normalization (root-
/// relative, `/`-separated) is what guarantees a renamed working directory
/// never shows up as a remove-plus-add pair.
pub fn diff(baseline: &Snapshot, current: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::new();

    for (path, old_digest) in baseline.iter() {
        match current.digest(path) {
            None => changes.removed.push(path.clone()),
            Some(new_digest) if new_digest != old_digest => changes.modified.push(path.clone()),
            Some(_) => {}
        }
    }

    for path in current.paths() {
        if !baseline.contains(path) {
            changes.added.push(path.clone());
        }
    }

    // BTreeMap iteration keeps each set sorted.
    changes
}
