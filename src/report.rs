//! Text rendering for verification results.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use color_eyre::eyre::{Context, Result};

use hashwatch_core::ChangeSet;

/// Render a change set as the human-readable verification report.
pub fn render_text(changes: &ChangeSet, root: &Path, baseline: &Path) -> String {
    let mut out = String::new();
    let line = "─".repeat(70);

    out.push('\n');
    out.push_str(&line);
    out.push_str("\n Integrity Report\n");
    out.push_str(&format!(" Tree:     {}\n", root.display()));
    out.push_str(&format!(" Baseline: {}\n", baseline.display()));
    out.push_str(&format!(
        " Checked:  {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&line);
    out.push('\n');

    if changes.is_empty() {
        out.push_str("\n No changes detected.\n");
        return out;
    }

    if !changes.added.is_empty() {
        out.push_str(&format!("\n Added ({}):\n", changes.added.len()));
        for path in &changes.added {
            out.push_str(&format!("   + {path}\n"));
        }
    }
    if !changes.removed.is_empty() {
        out.push_str(&format!("\n Removed ({}):\n", changes.removed.len()));
        for path in &changes.removed {
            out.push_str(&format!("   - {path}\n"));
        }
    }
    if !changes.modified.is_empty() {
        out.push_str(&format!("\n Modified ({}):\n", changes.modified.len()));
        for path in &changes.modified {
            out.push_str(&format!("   ~ {path}\n"));
        }
    }

    out.push_str(&format!("\n {} change(s) total\n", changes.total()));
    out
}

/// Write the report text into a timestamped file under `dir`.
pub fn write_report(dir: &Path, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;

    let name = format!("report_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(name);
    fs::write(&path, text)
        .with_context(|| format!("failed to write report {}", path.display()))?;

    Ok(path)
}
