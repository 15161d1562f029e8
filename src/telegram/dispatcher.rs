use std::sync::Arc;

use tracing::{info, warn};

use super::chunk::{MESSAGE_LIMIT, split_message};
use super::client::{ChatTransport, OutgoingMessage};
use crate::core::models::{ChatId, ParseMode};
use crate::errors::DeliveryError;

/// Whether a rejected send failed only because of malformed markup.
#[must_use]
pub fn is_markup_parse_error(description: &str) -> bool {
    let lowered = description.to_ascii_lowercase();
    lowered.contains("can't parse entities") || lowered.contains("can't find end of the entity")
}

/// Delivers text to a chat, splitting and falling back to plain text as needed.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    limit: usize,
}

impl Dispatcher {
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            limit: MESSAGE_LIMIT,
        }
    }

    /// Sends `text` to `target` as one or more ordered chunks.
    ///
    /// # Errors
    ///
    /// Stops at the first chunk that cannot be delivered.
    pub async fn deliver(
        &self,
        target: ChatId,
        text: &str,
        mode: ParseMode,
    ) -> Result<(), DeliveryError> {
        let chunks = split_message(text, self.limit);
        if chunks.len() > 1 {
            info!("Message to {} split into {} chunks", target, chunks.len());
        }
        for chunk in chunks {
            self.send_chunk(target, chunk, mode).await?;
        }
        Ok(())
    }

    async fn send_chunk(
        &self,
        target: ChatId,
        text: String,
        mode: ParseMode,
    ) -> Result<(), DeliveryError> {
        let message = OutgoingMessage {
            chat_id: target,
            text,
            parse_mode: mode.as_api_value(),
        };
        let response = self.transport.send_message(&message).await?;
        if response.ok {
            return Ok(());
        }

        let description = response
            .description
            .unwrap_or_else(|| "unknown error".to_string());

        if message.parse_mode.is_some() && is_markup_parse_error(&description) {
            warn!(
                "Markup rejected for {} ({}), retrying as plain text",
                target, description
            );
            let plain = OutgoingMessage {
                parse_mode: None,
                ..message
            };
            let retry = self.transport.send_message(&plain).await?;
            if retry.ok {
                return Ok(());
            }
            return Err(DeliveryError::Api {
                description: retry
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Err(DeliveryError::Api { description })
    }
}
