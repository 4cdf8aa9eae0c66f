//! Baseline persistence.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hashwatch_core::{BaselineError, HashAlgorithm, Snapshot};

/// Current on-disk format version.
pub const BASELINE_VERSION: u32 = 1;

/// Versioned envelope around the persisted snapshot.
#[derive(Serialize, Deserialize)]
struct BaselineFile {
    version: u32,
    #[serde(flatten)]
    snapshot: Snapshot,
}

/// Owns the on-disk representation of a baseline at one explicit location.
///
/// The location is always threaded in by the caller; there is no implicit
/// working-directory default. Exactly one active baseline exists per
/// location, overwritten wholesale by each save.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    /// Create a store for the given location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured storage location.
    pub fn location(&self) -> &Path {
        &self.path
    }

    /// Whether a baseline file exists at the location.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Persist a snapshot as the new baseline.
    ///
    /// Writes to a temp file in the same directory, then renames over the
    /// target, so a crash mid-write leaves any prior baseline intact.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), BaselineError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BaselineError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| BaselineError::Io {
                path: temp_path.clone(),
                source: e,
            })?;

        let envelope = BaselineFile {
            version: BASELINE_VERSION,
            snapshot: snapshot.clone(),
        };

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &envelope).map_err(|e| {
            BaselineError::Corrupt {
                path: temp_path.clone(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|e| BaselineError::Io {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| BaselineError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            files = snapshot.len(),
            "baseline saved"
        );
        Ok(())
    }

    /// Load the baseline.
    ///
    /// A missing file is [`BaselineError::NotFound`]; an unparseable or
    /// wrong-version file is [`BaselineError::Corrupt`]. Callers for whom a
    /// missing baseline is acceptable use
    /// [`load_or_empty`](Self::load_or_empty) instead.
    pub fn load(&self) -> Result<Snapshot, BaselineError> {
        let file = File::open(&self.path).map_err(|e| BaselineError::io(&self.path, e))?;
        let reader = BufReader::new(file);

        let envelope: BaselineFile =
            serde_json::from_reader(reader).map_err(|e| BaselineError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if envelope.version != BASELINE_VERSION {
            return Err(BaselineError::Corrupt {
                path: self.path.clone(),
                message: format!(
                    "unsupported baseline version {} (expected {})",
                    envelope.version, BASELINE_VERSION
                ),
            });
        }

        Ok(envelope.snapshot)
    }

    /// Load the baseline, mapping a missing file to an empty snapshot for
    /// the given root and algorithm. Corrupt storage still fails.
    pub fn load_or_empty(
        &self,
        root: impl Into<PathBuf>,
        algorithm: HashAlgorithm,
    ) -> Result<Snapshot, BaselineError> {
        match self.load() {
            Ok(snapshot) => Ok(snapshot),
            Err(err) if err.is_not_found() => Ok(Snapshot::new(root, algorithm)),
            Err(err) => Err(err),
        }
    }
}
