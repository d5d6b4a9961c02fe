//! Directory linting.
//!
//! Recursively scans a directory for script files and lints each one with
//! its own registry, in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::config::LintConfig;
use crate::error::{LintError, LintResult};
use crate::linter::{lint_source, LintOutput};

const EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];
const SKIPPED_DIRS: &[&str] = &["node_modules"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintFailure {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryReport {
    pub outputs: Vec<LintOutput>,
    pub failures: Vec<LintFailure>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

/// Every lintable file under `dir`, sorted.
pub fn find_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_script(entry.path()))
        .map(DirEntry::into_path)
        .collect();
    files.sort();
    files
}

// ═══════════════════════════════════════════════════════════════════════════════
// LINTING
// ═══════════════════════════════════════════════════════════════════════════════

pub fn lint_file(path: &Path, config: &LintConfig) -> LintResult<LintOutput> {
    let path_str = path.to_string_lossy().to_string();
    let source = fs::read_to_string(path).map_err(|source| LintError::Io {
        path: path_str.clone(),
        source,
    })?;
    lint_source(&source, &path_str, config)
}

/// Lint every script under `dir`. Files that cannot be read or parsed are
/// reported as failures and do not stop the run.
pub fn lint_directory(dir: &Path, config: &LintConfig) -> LintResult<DirectoryReport> {
    if !dir.is_dir() {
        return Err(LintError::Io {
            path: dir.to_string_lossy().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let files = find_script_files(dir);
    tracing::debug!(dir = %dir.display(), files = files.len(), "linting directory");

    let results: Vec<(PathBuf, LintResult<LintOutput>)> = files
        .into_par_iter()
        .map(|path| {
            let result = lint_file(&path, config);
            (path, result)
        })
        .collect();

    let mut report = DirectoryReport::default();
    for (path, result) in results {
        match result {
            Ok(output) => report.outputs.push(output),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to lint file");
                report.failures.push(LintFailure {
                    path: path.to_string_lossy().to_string(),
                    message: error.to_string(),
                });
            }
        }
    }
    Ok(report)
}
