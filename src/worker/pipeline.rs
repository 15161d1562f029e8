use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::info;

use crate::ai::{Summarizer, SummarizerSettings, create_summarizer};
use crate::cache::SummaryCache;
use crate::core::config::AppConfig;
use crate::core::models::DateKey;
use crate::errors::{DigestError, ExtractError};
use crate::extract::extract_text;
use crate::fetch::{DailyFetcher, ReqwestTransport};

/// Fetch, extract, summarize and cache.
pub struct DigestPipeline {
    fetcher: DailyFetcher,
    cache: SummaryCache,
    summarizer: Arc<dyn Summarizer>,
    timezone: Option<Tz>,
}

impl DigestPipeline {
    #[must_use]
    pub fn new(
        fetcher: DailyFetcher,
        cache: SummaryCache,
        summarizer: Arc<dyn Summarizer>,
        timezone: Option<Tz>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            summarizer,
            timezone,
        }
    }

    /// Wires the HTTP fetcher, file cache and configured summarizer.
    ///
    /// # Errors
    ///
    /// Fails before any network activity when `MODEL_API_KEY` is missing or
    /// the provider is unknown.
    pub fn from_config(config: &AppConfig) -> Result<Self, DigestError> {
        let api_key = config.require_model_api_key()?;
        let summarizer = create_summarizer(&SummarizerSettings {
            provider: &config.model_provider,
            api_key,
            model_name: &config.model_name,
            system_prompt: config.system_prompt.as_deref(),
            timeout: config.http_timeout,
        })?;

        let cache = SummaryCache::new(&config.cache_dir);
        let transport = Arc::new(ReqwestTransport::new(config.http_timeout)?);
        let fetcher = DailyFetcher::new(
            transport,
            &config.boe_base_url,
            &config.download_dir,
            cache.clone(),
        )?;

        Ok(Self::new(fetcher, cache, summarizer, config.timezone))
    }

    #[must_use]
    pub fn today(&self) -> DateKey {
        DateKey::today(self.timezone)
    }

    /// Today's digest.
    pub async fn produce_daily_summary(&self, force_refresh: bool) -> Result<String, DigestError> {
        self.produce_summary_for(self.today(), force_refresh).await
    }

    pub async fn produce_summary_for(
        &self,
        key: DateKey,
        force_refresh: bool,
    ) -> Result<String, DigestError> {
        info!("Fetching bulletin for {}", key);
        let document = self.fetcher.fetch(key).await?;
        self.process_file(&document.path, force_refresh).await
    }

    /// Summarizes a local document, reusing the cached digest for its stem
    /// unless `force_refresh` is set. A forced run still overwrites the cache.
    pub async fn process_file(&self, path: &Path, force_refresh: bool) -> Result<String, DigestError> {
        let key = SummaryCache::key_for(path);
        info!("Processing file {} (cache key {})", path.display(), key);

        if !force_refresh && let Some(cached) = self.cache.get(&key).await? {
            info!("Using cached summary ({} chars)", cached.chars().count());
            return Ok(cached);
        }

        let owned: PathBuf = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || extract_text(&owned))
            .await
            .map_err(|e| ExtractError::Io(format!("extraction task failed: {e}")))??;
        info!("Extracted {} characters", text.chars().count());

        let summary = self.summarizer.summarize(&text).await?;
        info!("Generated summary ({} chars)", summary.chars().count());

        self.cache.put(&key, &summary).await?;
        Ok(summary)
    }
}
