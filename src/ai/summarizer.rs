use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::client::GeminiClient;
use super::prompt::resolve_system_prompt;
use crate::errors::SummarizeError;

/// Turns extracted document text into a digest.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

pub struct GeminiSummarizer {
    client: GeminiClient,
    system_prompt: String,
}

impl GeminiSummarizer {
    #[must_use]
    pub fn new(client: GeminiClient, system_prompt: Option<&str>) -> Self {
        Self {
            client,
            system_prompt: resolve_system_prompt(system_prompt),
        }
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.client.generate(&self.system_prompt, text).await
    }
}

/// Settings shared by every provider.
#[derive(Debug, Clone)]
pub struct SummarizerSettings<'a> {
    pub provider: &'a str,
    pub api_key: &'a str,
    pub model_name: &'a str,
    pub system_prompt: Option<&'a str>,
    pub timeout: Duration,
}

/// Builds the summarizer named by `settings.provider`.
///
/// # Errors
///
/// [`SummarizeError::UnsupportedProvider`] for unknown provider names.
pub fn create_summarizer(
    settings: &SummarizerSettings<'_>,
) -> Result<Arc<dyn Summarizer>, SummarizeError> {
    match settings.provider.trim().to_ascii_lowercase().as_str() {
        "gemini" => {
            let client = GeminiClient::new(
                settings.api_key.to_string(),
                settings.model_name.to_string(),
                settings.timeout,
            )?;
            Ok(Arc::new(GeminiSummarizer::new(client, settings.system_prompt)))
        }
        other => Err(SummarizeError::UnsupportedProvider(other.to_string())),
    }
}
