//! On-disk cache of lint results.
//!
//! Entries are keyed by file path and hold a hash of the source and the
//! configuration they were produced with, so either changing invalidates
//! the entry. A hit also requires the stored output to belong to the
//! requested path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::LintConfig;
use crate::error::{LintError, LintResult};
use crate::linter::{lint_source, LintOutput};

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub output: LintOutput,
}

pub struct ResultCache {
    cache_dir: PathBuf,
}

impl ResultCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> LintResult<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|source| LintError::Io {
            path: cache_dir.to_string_lossy().to_string(),
            source,
        })?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn compute_hash(source: &str, config: &LintConfig) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(serde_json::to_vec(config).unwrap_or_default());
        format!("{:x}", hasher.finalize())
    }

    /// Flattened path plus a digest of the original one.
    fn entry_path(&self, file_path: &str) -> PathBuf {
        let safe_name = file_path.replace(['/', '\\', ':'], "_");
        let digest = format!("{:x}", Sha256::digest(file_path.as_bytes()));
        self.cache_dir.join(format!("{}-{}.json", safe_name, &digest[..16]))
    }

    pub fn get(&self, file_path: &str, source: &str, config: &LintConfig) -> Option<LintOutput> {
        let entry_path = self.entry_path(file_path);
        let data = fs::read_to_string(&entry_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(file = file_path, %error, "dropping corrupt cache entry");
                fs::remove_file(&entry_path).ok();
                return None;
            }
        };

        (entry.output.file == file_path && entry.hash == Self::compute_hash(source, config))
            .then_some(entry.output)
    }

    pub fn set(&self, file_path: &str, source: &str, config: &LintConfig, output: &LintOutput) {
        let entry = CacheEntry {
            hash: Self::compute_hash(source, config),
            output: output.clone(),
        };
        let entry_path = self.entry_path(file_path);
        match serde_json::to_string(&entry) {
            Ok(data) => {
                if let Err(error) = fs::write(&entry_path, data) {
                    tracing::warn!(file = file_path, %error, "failed to write cache entry");
                }
            }
            Err(error) => tracing::warn!(file = file_path, %error, "failed to encode cache entry"),
        }
    }

    /// Cached output for `source`, linting and storing it on a miss.
    pub fn lint(&self, source: &str, file_path: &str, config: &LintConfig) -> LintResult<LintOutput> {
        if let Some(output) = self.get(file_path, source, config) {
            tracing::debug!(file = file_path, "cache hit");
            return Ok(output);
        }
        let output = lint_source(source, file_path, config)?;
        self.set(file_path, source, config, &output);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SOURCE: &str = "const A = (props) => <img>{props.a}</img>;";

    #[test]
    fn test_hit_after_lint() {
        let dir = tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("cache")).unwrap();
        let config = LintConfig::default();

        assert!(cache.get("src/a.jsx", SOURCE, &config).is_none());
        let output = cache.lint(SOURCE, "src/a.jsx", &config).unwrap();
        assert_eq!(cache.get("src/a.jsx", SOURCE, &config), Some(output));
    }

    #[test]
    fn test_source_or_config_change_misses() {
        let dir = tempdir().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let config = LintConfig::default();
        cache.lint(SOURCE, "a.jsx", &config).unwrap();

        assert!(cache.get("a.jsx", "const B = 1;", &config).is_none());

        let mut other = LintConfig::default();
        other.rules.void_dom_elements_no_children = false;
        assert!(cache.get("a.jsx", SOURCE, &other).is_none());
    }

    #[test]
    fn test_flattened_paths_do_not_share_entries() {
        let dir = tempdir().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let config = LintConfig::default();
        assert_ne!(cache.entry_path("a/b.jsx"), cache.entry_path("a_b.jsx"));

        let nested = cache.lint(SOURCE, "a/b.jsx", &config).unwrap();
        assert!(cache.get("a_b.jsx", SOURCE, &config).is_none());

        let flat = cache.lint(SOURCE, "a_b.jsx", &config).unwrap();
        assert_eq!(cache.get("a/b.jsx", SOURCE, &config).unwrap().file, "a/b.jsx");
        assert_eq!(cache.get("a_b.jsx", SOURCE, &config), Some(flat));
        assert_eq!(nested.file, "a/b.jsx");
    }

    #[test]
    fn test_entry_for_another_file_misses() {
        let dir = tempdir().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let config = LintConfig::default();
        let output = lint_source(SOURCE, "other.jsx", &config).unwrap();
        let entry = CacheEntry {
            hash: ResultCache::compute_hash(SOURCE, &config),
            output,
        };
        fs::write(cache.entry_path("a.jsx"), serde_json::to_string(&entry).unwrap()).unwrap();

        assert!(cache.get("a.jsx", SOURCE, &config).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let dir = tempdir().unwrap();
        let cache = ResultCache::new(dir.path()).unwrap();
        let entry_path = cache.entry_path("a.jsx");
        fs::write(&entry_path, "{ not json").unwrap();

        assert!(cache.get("a.jsx", SOURCE, &LintConfig::default()).is_none());
        assert!(!entry_path.exists());
    }
}
