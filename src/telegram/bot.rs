use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, info, warn};

use super::client::{IncomingMessage, TelegramClient};
use super::commands::{
    self, Command, HELP_TEXT, NOT_PUBLISHED_TEXT, NOT_SUBSCRIBED_TEXT, STATUS_NOT_SUBSCRIBED_TEXT,
    SUMMARY_PENDING_TEXT, UNREGISTERED_TEXT,
};
use crate::core::models::{ChatId, ParseMode};
use crate::errors::DigestError;
use crate::worker::{DigestService, SharedDigestService};

const POLL_TIMEOUT: Duration = Duration::from_secs(25);

fn poll_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(250)
        .max_delay(Duration::from_secs(60))
        .map(jitter)
}

async fn reply(service: &DigestService, chat: ChatId, text: &str) {
    if let Err(e) = service.dispatcher().deliver(chat, text, ParseMode::Plain).await {
        error!("Failed to reply to {}: {}", chat, e);
    }
}

/// Human-readable reason for a failed on-demand summary.
#[must_use]
pub fn failure_reply(error: &DigestError) -> String {
    match error {
        e if e.is_not_yet_published() => NOT_PUBLISHED_TEXT.to_string(),
        other => commands::error_text(&other.to_string()),
    }
}

/// Executes one command for `chat`. Every command produces a reply.
pub async fn handle_command(
    service: &DigestService,
    chat: ChatId,
    command: Command,
    send_time: &str,
) {
    match command {
        Command::Start | Command::Unknown(_) => reply(service, chat, HELP_TEXT).await,
        Command::Register => match service.store().add(chat).await {
            Ok(true) => reply(service, chat, &commands::registered_text(send_time)).await,
            Ok(false) => {
                reply(service, chat, &commands::already_registered_text(send_time)).await;
            }
            Err(e) => {
                error!("Register failed for {}: {}", chat, e);
                reply(service, chat, &commands::error_text(&e.to_string())).await;
            }
        },
        Command::Unregister => match service.store().remove(chat).await {
            Ok(true) => reply(service, chat, UNREGISTERED_TEXT).await,
            Ok(false) => reply(service, chat, NOT_SUBSCRIBED_TEXT).await,
            Err(e) => {
                error!("Unregister failed for {}: {}", chat, e);
                reply(service, chat, &commands::error_text(&e.to_string())).await;
            }
        },
        Command::Status => match service.store().contains(chat).await {
            Ok(true) => reply(service, chat, &commands::status_subscribed_text(send_time)).await,
            Ok(false) => reply(service, chat, STATUS_NOT_SUBSCRIBED_TEXT).await,
            Err(e) => reply(service, chat, &commands::error_text(&e.to_string())).await,
        },
        Command::Summary => {
            reply(service, chat, SUMMARY_PENDING_TEXT).await;
            if let Err(e) = service.deliver_daily_summary_to(chat, false).await {
                warn!("On-demand summary for {} failed at {} stage: {}", chat, e.stage(), e);
                reply(service, chat, &failure_reply(&e)).await;
            }
        }
    }
}

/// Long-polling command loop.
pub struct TelegramBot {
    client: Arc<TelegramClient>,
    service: SharedDigestService,
    send_time: String,
}

impl TelegramBot {
    #[must_use]
    pub fn new(client: Arc<TelegramClient>, service: SharedDigestService, send_time: String) -> Self {
        Self {
            client,
            service,
            send_time,
        }
    }

    /// Polls for updates until `shutdown` resolves. Polling errors are
    /// retried with capped exponential backoff.
    pub async fn run<S>(self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        match self.client.get_me().await {
            Ok(me) => info!(
                "Bot connected as @{}",
                me.username.as_deref().unwrap_or("unknown")
            ),
            Err(e) => warn!("Could not identify bot account: {}", e),
        }

        tokio::pin!(shutdown);
        let mut offset: Option<i64> = None;
        let mut backoff = poll_backoff();

        loop {
            let polled = tokio::select! {
                () = &mut shutdown => break,
                polled = self.client.get_updates(offset, POLL_TIMEOUT) => polled,
            };

            match polled {
                Ok(updates) => {
                    backoff = poll_backoff();
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        if let Some(message) = update.message {
                            self.dispatch(message);
                        }
                    }
                }
                Err(e) => {
                    let delay = backoff.next().unwrap_or(Duration::from_secs(60));
                    warn!("Polling failed: {} (retrying in {}ms)", e, delay.as_millis());
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
        info!("Bot stopped");
    }

    fn dispatch(&self, message: IncomingMessage) {
        let Some(command) = message.text.as_deref().and_then(Command::parse) else {
            return;
        };
        let chat = message.chat.id;
        info!("Command {:?} from {}", command, chat);

        let service = Arc::clone(&self.service);
        let send_time = self.send_time.clone();
        tokio::spawn(async move {
            handle_command(&service, chat, command, &send_time).await;
        });
    }
}
