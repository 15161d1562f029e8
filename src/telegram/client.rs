//! Telegram Bot API client module
//!
//! Thin wrapper over the HTTP Bot API: `sendMessage` for delivery and
//! `getUpdates` for long polling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::core::models::ChatId;
use crate::errors::DeliveryError;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Payload of a `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn success(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            description: None,
            error_code: None,
        }
    }

    #[must_use]
    pub fn failure(error_code: i64, description: &str) -> Self {
        Self {
            ok: false,
            result: None,
            description: Some(description.to_string()),
            error_code: Some(error_code),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

/// Sends a single message; swappable for tests.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        message: &OutgoingMessage,
    ) -> Result<ApiResponse<Value>, DeliveryError>;
}

pub struct TelegramClient {
    http: Client,
    method_base: String,
}

impl TelegramClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        Self::with_api_base(TELEGRAM_API_BASE, token, timeout)
    }

    pub fn with_api_base(
        api_base: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            method_base: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
        timeout: Option<Duration>,
    ) -> Result<ApiResponse<T>, DeliveryError> {
        let mut request = self
            .http
            .post(format!("{}/{method}", self.method_base))
            .json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error statuses still carry the JSON envelope with a description.
        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(DeliveryError::Http(format!(
                "Unparseable {method} response: {e}"
            ))),
            Err(_) => Err(DeliveryError::Http(format!("HTTP {status}: {body}"))),
        }
    }

    /// # Errors
    pub async fn get_me(&self) -> Result<User, DeliveryError> {
        let response: ApiResponse<User> = self.call("getMe", &json!({}), None).await?;
        match response {
            ApiResponse {
                ok: true,
                result: Some(user),
                ..
            } => Ok(user),
            other => Err(DeliveryError::Api {
                description: other
                    .description
                    .unwrap_or_else(|| "getMe failed".to_string()),
            }),
        }
    }

    /// Long-polls for updates after `offset`, waiting up to `poll_timeout`.
    ///
    /// # Errors
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout: Duration,
    ) -> Result<Vec<Update>, DeliveryError> {
        let mut payload = json!({
            "timeout": poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            payload["offset"] = json!(offset);
        }

        // The HTTP timeout has to outlast the server-side long poll.
        let http_timeout = poll_timeout + Duration::from_secs(10);
        let response: ApiResponse<Vec<Update>> = self
            .call("getUpdates", &payload, Some(http_timeout))
            .await?;

        if !response.ok {
            return Err(DeliveryError::Api {
                description: response
                    .description
                    .unwrap_or_else(|| "getUpdates failed".to_string()),
            });
        }
        Ok(response.result.unwrap_or_default())
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        message: &OutgoingMessage,
    ) -> Result<ApiResponse<Value>, DeliveryError> {
        debug!(
            "sendMessage to {} ({} chars, parse_mode={:?})",
            message.chat_id,
            message.text.chars().count(),
            message.parse_mode
        );
        let payload = serde_json::to_value(message)
            .map_err(|e| DeliveryError::Http(format!("Failed to encode message: {e}")))?;
        self.call("sendMessage", &payload, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outgoing_message_omits_plain_parse_mode() {
        let message = OutgoingMessage {
            chat_id: ChatId(42),
            text: "hola".to_string(),
            parse_mode: None,
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "chat_id": 42, "text": "hola" })
        );

        let styled = OutgoingMessage {
            parse_mode: Some("MarkdownV2"),
            ..message
        };
        assert_eq!(
            serde_json::to_value(&styled).unwrap()["parse_mode"],
            "MarkdownV2"
        );
    }

    #[test]
    fn error_envelope_parses() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities: Character '.' is reserved"}"#;
        let resp: ApiResponse<Value> = serde_json::from_str(body).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error_code, Some(400));
        assert!(resp.description.unwrap().contains("can't parse entities"));
    }

    #[test]
    fn updates_parse_with_optional_fields() {
        let body = r#"{"ok":true,"result":[
            {"update_id":10,"message":{"message_id":1,"chat":{"id":42,"type":"private"},"from":{"id":42,"is_bot":false,"username":"ana"},"text":"/status"}},
            {"update_id":11,"edited_message":{"message_id":2}}
        ]}"#;
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = resp.result.unwrap();
        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, ChatId(42));
        assert_eq!(message.text.as_deref(), Some("/status"));
        assert!(updates[1].message.is_none());
    }
}
