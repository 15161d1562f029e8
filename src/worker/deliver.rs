use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::pipeline::DigestPipeline;
use crate::core::config::AppConfig;
use crate::core::models::{ChatId, ParseMode};
use crate::errors::DigestError;
use crate::store::SubscriberStore;
use crate::telegram::{Dispatcher, TelegramClient};

/// Outcome of delivering one digest to many chats.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<ChatId>,
    pub failed: Vec<(ChatId, String)>,
}

impl BroadcastReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Sends `text` to every target independently. Chunks for one target stay in
/// order; targets are served concurrently and one failure never stops the rest.
pub async fn broadcast_summary(
    dispatcher: &Dispatcher,
    targets: impl IntoIterator<Item = ChatId>,
    text: &str,
    mode: ParseMode,
    correlation_id: &str,
) -> BroadcastReport {
    let sends = targets.into_iter().map(|target| async move {
        let result = dispatcher.deliver(target, text, mode).await;
        (target, result)
    });

    let mut report = BroadcastReport::default();
    for (target, result) in join_all(sends).await {
        match result {
            Ok(()) => {
                info!("Sent to {} (corr_id={})", target, correlation_id);
                report.delivered.push(target);
            }
            Err(e) => {
                error!("Failed to send to {}: {} (corr_id={})", target, e, correlation_id);
                report.failed.push((target, e.to_string()));
            }
        }
    }
    report
}

/// The pipeline plus everything needed to get its output to subscribers.
pub struct DigestService {
    pipeline: DigestPipeline,
    store: SubscriberStore,
    dispatcher: Dispatcher,
    parse_mode: ParseMode,
    broadcast_lock: Mutex<()>,
}

impl DigestService {
    #[must_use]
    pub fn new(pipeline: DigestPipeline, store: SubscriberStore, dispatcher: Dispatcher) -> Self {
        Self {
            pipeline,
            store,
            dispatcher,
            parse_mode: ParseMode::MarkdownV2,
            broadcast_lock: Mutex::new(()),
        }
    }

    /// Builds the production service and the Telegram client it sends through.
    ///
    /// # Errors
    ///
    /// Missing `TELEGRAM_BOT_TOKEN` or `MODEL_API_KEY`, or an unusable database path.
    pub async fn from_config(
        config: &AppConfig,
    ) -> Result<(Self, Arc<TelegramClient>), DigestError> {
        let token = config.require_bot_token()?;
        let pipeline = DigestPipeline::from_config(config)?;
        let client = Arc::new(TelegramClient::new(token, config.http_timeout)?);
        let store = SubscriberStore::open(&config.database_path).await?;
        let dispatcher = Dispatcher::new(client.clone());
        Ok((Self::new(pipeline, store, dispatcher), client))
    }

    #[must_use]
    pub fn pipeline(&self) -> &DigestPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn store(&self) -> &SubscriberStore {
        &self.store
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Produces today's digest and sends it to every subscriber.
    ///
    /// With no subscribers nothing is fetched or summarized. A call made while
    /// another broadcast is running is refused with
    /// [`DigestError::BroadcastInProgress`].
    pub async fn broadcast_daily_summary(&self) -> Result<BroadcastReport, DigestError> {
        let Ok(_guard) = self.broadcast_lock.try_lock() else {
            warn!("Broadcast already running; skipping this trigger");
            return Err(DigestError::BroadcastInProgress);
        };

        let correlation_id = Uuid::new_v4().to_string();
        let subscribers = self.store.all().await?;
        if subscribers.is_empty() {
            info!("No subscribers to notify (corr_id={})", correlation_id);
            return Ok(BroadcastReport::default());
        }

        let summary = self.pipeline.produce_daily_summary(false).await?;

        info!(
            "Sending digest to {} subscribers (corr_id={})",
            subscribers.len(),
            correlation_id
        );
        let report = broadcast_summary(
            &self.dispatcher,
            subscribers,
            &summary,
            self.parse_mode,
            &correlation_id,
        )
        .await;
        info!(
            "Broadcast complete: {} delivered, {} failed (corr_id={})",
            report.delivered.len(),
            report.failed.len(),
            correlation_id
        );
        Ok(report)
    }

    /// Produces today's digest and sends it only to `target`.
    pub async fn deliver_daily_summary_to(
        &self,
        target: ChatId,
        force_refresh: bool,
    ) -> Result<(), DigestError> {
        let summary = self.pipeline.produce_daily_summary(force_refresh).await?;
        self.dispatcher
            .deliver(target, &summary, self.parse_mode)
            .await?;
        info!("Digest delivered to {}", target);
        Ok(())
    }

    /// Summarizes a local file and sends the result to `target`.
    pub async fn deliver_file_summary_to(
        &self,
        path: &std::path::Path,
        target: ChatId,
        force_refresh: bool,
    ) -> Result<(), DigestError> {
        let summary = self.pipeline.process_file(path, force_refresh).await?;
        self.dispatcher
            .deliver(target, &summary, self.parse_mode)
            .await?;
        Ok(())
    }
}

/// Shared handle used by the bot loop and the scheduler.
pub type SharedDigestService = Arc<DigestService>;
