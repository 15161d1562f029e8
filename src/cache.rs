//! Summary cache
//!
//! One plain-text file per key under the cache directory. The key is the
//! filename stem of the summarized document, so two documents sharing a stem
//! share a cache entry. Entries never expire; concurrent writers to the same
//! key race and the last write wins.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::CacheError;

const SUMMARY_SUFFIX: &str = "_summary.txt";

#[derive(Debug, Clone)]
pub struct SummaryCache {
    dir: PathBuf,
}

impl SummaryCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache key for a document: its filename without the extension.
    #[must_use]
    pub fn key_for(document: &Path) -> String {
        document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}{SUMMARY_SUFFIX}"))
    }

    /// Whether an entry exists for `key`. A cache directory that cannot be
    /// inspected is an error, not a miss.
    pub async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        tokio::fs::try_exists(self.path_for(key))
            .await
            .map_err(|e| CacheError::Io {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Cache hit for {} ({} chars)", key, text.chars().count());
                Ok(Some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub async fn put(&self, key: &str, summary: &str) -> Result<(), CacheError> {
        let io_err = |e: std::io::Error| CacheError::Io {
            key: key.to_string(),
            reason: e.to_string(),
        };
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        let path = self.path_for(key);
        tokio::fs::write(&path, summary.as_bytes())
            .await
            .map_err(io_err)?;
        debug!("Cached summary to {}", path.display());
        Ok(())
    }
}
