//! Generative-language (Gemini) API client
//!
//! Encapsulates the HTTP exchange with the `generateContent` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::prompt::build_user_message;
use crate::errors::SummarizeError;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Request body for `models/{model}:generateContent`.
#[must_use]
pub fn build_request_body(system_prompt: &str, text: &str) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": system_prompt }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_user_message(text) }]
        }]
    })
}

/// Concatenates the text parts of the first candidate.
#[must_use]
pub fn extract_candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())?;

    let collected: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    let text = collected.concat();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model_name: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model_name: String,
        timeout: Duration,
    ) -> Result<Self, SummarizeError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizeError::Remote(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            model_name,
            api_base: GEMINI_API_BASE.to_string(),
        })
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// # Errors
    ///
    /// Returns [`SummarizeError::Remote`] for transport failures, non-2xx
    /// statuses, undecodable bodies, and responses without candidate text.
    pub async fn generate(&self, system_prompt: &str, text: &str) -> Result<String, SummarizeError> {
        #[cfg(feature = "debug-logs")]
        debug!("Using system prompt:\n{}", system_prompt);

        info!(
            "Requesting summary from {} (~{} input tokens)",
            self.model_name,
            estimate_tokens(text)
        );

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model_name
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(system_prompt, text))
            .send()
            .await
            .map_err(|e| SummarizeError::Remote(format!("Gemini API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(SummarizeError::Remote(format!(
                "Gemini API error (status {status}): {error_text}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SummarizeError::Remote(format!("Failed to parse Gemini response: {e}")))?;

        let summary = extract_candidate_text(&body).ok_or_else(|| {
            let reason = body
                .get("promptFeedback")
                .and_then(|f| f.get("blockReason"))
                .and_then(|r| r.as_str())
                .unwrap_or("no candidates returned");
            SummarizeError::Remote(format!("Gemini returned no summary: {reason}"))
        })?;

        debug!("Generated summary ({} chars)", summary.chars().count());
        Ok(summary)
    }
}
