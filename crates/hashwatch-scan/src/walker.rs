//! Pruned directory traversal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use hashwatch_core::{ScanConfig, ScanWarning, WarningKind};

/// A regular file discovered during traversal.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path, used for reading the file.
    pub path: PathBuf,
    /// Root-relative key with `/` separators, used as the snapshot key.
    pub key: String,
}

/// Lazily enumerate regular files under `root`.
///
/// Directories on the exclusion denylist are pruned before descent, so none
/// of their descendants are ever visited. Symbolic links are not followed
/// unless the config says so; symlink entries themselves are skipped.
/// Traversal errors surface as warnings rather than ending the walk.
///
/// `root` should already be canonical; keys are computed by stripping it
/// from each entry's path, so the same tree yields the same keys no matter
/// what working directory the process runs in.
pub fn walk(
    root: &Path,
    config: &ScanConfig,
) -> impl Iterator<Item = Result<FileEntry, ScanWarning>> {
    let excluded: Vec<String> = config.exclude_dirs.clone();
    let parallelism = match config.threads {
        0 => Parallelism::RayonDefaultPool {
            busy_timeout: std::time::Duration::from_millis(100),
        },
        n => Parallelism::RayonNewPool(n),
    };

    let walker = WalkDir::new(root)
        .parallelism(parallelism)
        .skip_hidden(!config.include_hidden)
        .follow_links(config.follow_symlinks)
        .process_read_dir(move |_depth, _dir_path, _state, children| {
            children.retain(|entry| match entry {
                Ok(entry) => {
                    !(entry.file_type().is_dir()
                        && excluded.iter().any(|d| entry.file_name() == OsStr::new(d)))
                }
                Err(_) => true,
            });
        });

    let root = root.to_path_buf();
    walker.into_iter().filter_map(move |entry_result| {
        match entry_result {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let path = entry.path();
                match relative_key(&root, &path) {
                    Some(key) => Some(Ok(FileEntry { path, key })),
                    None => Some(Err(ScanWarning::new(
                        path,
                        "entry outside scan root",
                        WarningKind::ReadError,
                    ))),
                }
            }
            Err(err) => {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                Some(Err(ScanWarning::new(
                    path,
                    err.to_string(),
                    WarningKind::ReadError,
                )))
            }
        }
    })
}

/// Root-relative path joined with `/`, independent of platform separators.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for component in rel.components() {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(&component.as_os_str().to_string_lossy());
    }
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("src")).unwrap();
        fs::create_dir(root.join("src/nested")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::create_dir(root.join(".git/objects")).unwrap();

        fs::write(root.join("top.txt"), "top").unwrap();
        fs::write(root.join("src/lib.rs"), "lib").unwrap();
        fs::write(root.join("src/nested/deep.rs"), "deep").unwrap();
        fs::write(root.join(".git/config"), "vcs metadata").unwrap();
        fs::write(root.join(".git/objects/aa"), "object").unwrap();

        temp
    }

    fn collect_keys(root: &Path, config: &ScanConfig) -> BTreeSet<String> {
        walk(root, config)
            .filter_map(|r| r.ok())
            .map(|entry| entry.key)
            .collect()
    }

    #[test]
    fn test_yields_only_regular_files() {
        let temp = create_test_tree();
        let root = temp.path().canonicalize().unwrap();
        let keys = collect_keys(&root, &ScanConfig::new(&root));

        assert!(keys.contains("top.txt"));
        assert!(keys.contains("src/lib.rs"));
        assert!(keys.contains("src/nested/deep.rs"));
        // Directories themselves are never yielded
        assert!(!keys.contains("src"));
    }

    #[test]
    fn test_excluded_subtree_fully_pruned() {
        let temp = create_test_tree();
        let root = temp.path().canonicalize().unwrap();
        let keys = collect_keys(&root, &ScanConfig::new(&root));

        assert!(!keys.iter().any(|k| k.starts_with(".git")));
    }

    #[test]
    fn test_exclusion_matches_name_not_prefix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(".github")).unwrap();
        fs::write(root.join(".github/workflow.yml"), "ci").unwrap();

        let root = root.canonicalize().unwrap();
        let keys = collect_keys(&root, &ScanConfig::new(&root));

        // ".github" must not be caught by the ".git" denylist entry
        assert!(keys.contains(".github/workflow.yml"));
    }

    #[test]
    fn test_keys_use_forward_slashes_relative_to_root() {
        let temp = create_test_tree();
        let root = temp.path().canonicalize().unwrap();
        let keys = collect_keys(&root, &ScanConfig::new(&root));

        for key in &keys {
            assert!(!key.starts_with('/'), "key should be relative: {key}");
            assert!(!key.contains('\\'), "key should use /: {key}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed() {
        let temp = create_test_tree();
        let root = temp.path();
        std::os::unix::fs::symlink(root.join("src"), root.join("link-to-src")).unwrap();
        std::os::unix::fs::symlink(root.join("top.txt"), root.join("link-to-file")).unwrap();

        let root = root.canonicalize().unwrap();
        let keys = collect_keys(&root, &ScanConfig::new(&root));

        assert!(!keys.iter().any(|k| k.starts_with("link-to-src")));
        assert!(!keys.contains("link-to-file"));
    }
}
