//! Daily bulletin download
//!
//! Downloads the day's summary document once per calendar day. The summary
//! cache is the only "already done today" gate: when today's summary is
//! cached and the document is still on disk, no request is made.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{info, warn};
use url::Url;

use crate::cache::SummaryCache;
use crate::core::models::{DailyDocument, DateKey};
use crate::errors::FetchError;

/// The upstream rejects default library agents.
pub const FETCH_USER_AGENT: &str = concat!("boe-digest/", env!("CARGO_PKG_VERSION"));
pub const FETCH_ACCEPT: &str = "application/xml";

#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Plain HTTP GET, swappable for tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpReply, FetchError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpReply, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}

pub struct DailyFetcher {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    download_dir: PathBuf,
    cache: SummaryCache,
}

impl DailyFetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        download_dir: impl Into<PathBuf>,
        cache: SummaryCache,
    ) -> Result<Self, FetchError> {
        // Without the trailing slash `join` would replace the last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| FetchError::Transport(format!("Invalid base URL {base_url}: {e}")))?;
        Ok(Self {
            transport,
            base_url,
            download_dir: download_dir.into(),
            cache,
        })
    }

    #[must_use]
    pub fn url_for(&self, key: DateKey) -> String {
        self.base_url
            .join(&key.to_string())
            .map_or_else(|_| format!("{}{key}", self.base_url), |u| u.to_string())
    }

    #[must_use]
    pub fn path_for(&self, key: DateKey) -> PathBuf {
        self.download_dir.join(format!("{}.xml", key.document_stem()))
    }

    /// Fetches the document for `key`.
    ///
    /// # Errors
    ///
    /// [`FetchError::NotYetPublished`] when the upstream answers 400; nothing
    /// is written in that case.
    pub async fn fetch(&self, key: DateKey) -> Result<DailyDocument, FetchError> {
        let path = self.path_for(key);
        let source_url = self.url_for(key);

        let cached = self
            .cache
            .contains(&key.document_stem())
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;
        if cached {
            let on_disk = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| FetchError::Io(format!("{}: {e}", path.display())))?;
            if on_disk {
                info!("Summary for {} already cached, skipping download", key);
                return Ok(DailyDocument {
                    key,
                    source_url,
                    path,
                    downloaded: false,
                });
            }
            info!("Summary for {} cached but document missing, downloading", key);
        }

        info!("Fetching bulletin for {} from {}", key, source_url);
        let reply = self
            .transport
            .get(
                &source_url,
                &[
                    (ACCEPT.as_str(), FETCH_ACCEPT),
                    (USER_AGENT.as_str(), FETCH_USER_AGENT),
                ],
            )
            .await?;

        if reply.status == 400 {
            warn!(
                "Upstream returned 400 for {}; the bulletin is probably not published yet",
                key
            );
            return Err(FetchError::NotYetPublished(key.to_string()));
        }

        if !(200..300).contains(&reply.status) {
            return Err(FetchError::Http {
                status: reply.status,
                body: String::from_utf8_lossy(&reply.body).into_owned(),
            });
        }

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;
        tokio::fs::write(&path, &reply.body)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        info!("Saved {} bytes to {}", reply.body.len(), path.display());
        Ok(DailyDocument {
            key,
            source_url,
            path,
            downloaded: true,
        })
    }
}
