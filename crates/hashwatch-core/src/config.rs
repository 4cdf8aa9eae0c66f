//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::algorithm::HashAlgorithm;

/// Directory names pruned from every traversal unless overridden.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", ".svn", ".hg"];

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Digest algorithm for file contents.
    #[builder(default)]
    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Directory names whose subtrees are pruned entirely.
    #[builder(default = "default_exclude_dirs()")]
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Follow symbolic links. Off by default to avoid cycles; symlink
    /// entries are skipped rather than hashed.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Number of worker threads for hashing (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path with defaults.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            algorithm: HashAlgorithm::default(),
            exclude_dirs: default_exclude_dirs(),
            follow_symlinks: false,
            include_hidden: true,
            threads: 0,
        }
    }

    /// Check if a directory name is on the exclusion denylist.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .algorithm(HashAlgorithm::Sha256)
            .threads(4usize)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.threads, 4);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_config_requires_root() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_default_exclusions() {
        let config = ScanConfig::new("/test");
        assert!(config.is_excluded_dir(".git"));
        assert!(config.is_excluded_dir(".hg"));
        assert!(!config.is_excluded_dir("src"));
    }

    #[test]
    fn test_custom_exclusions_replace_defaults() {
        let config = ScanConfig::builder()
            .root("/test")
            .exclude_dirs(vec!["node_modules".to_string()])
            .build()
            .unwrap();

        assert!(config.is_excluded_dir("node_modules"));
        assert!(!config.is_excluded_dir(".git"));
    }
}
