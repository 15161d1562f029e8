/// BOE digest - fetches the daily bulletin of the Spanish official gazette,
/// condenses it with a generative-language model and delivers the digest to
/// Telegram subscribers.
///
/// # Architecture
///
/// A single long-lived process runs two activities side by side:
/// 1. A Telegram long-polling loop answering subscriber commands
/// 2. A daily job that broadcasts the digest to every subscriber
///
/// Both share one [`worker::DigestService`], which composes:
/// - [`fetch::DailyFetcher`] for the day's document (plain HTTP GET)
/// - [`extract`] for turning the document into text
/// - [`ai::Summarizer`] for the remote summarization call
/// - [`cache::SummaryCache`] so each document is summarized once
/// - [`store::SubscriberStore`] (SQLite) for delivery targets
/// - [`telegram::Dispatcher`] for chunked, markup-tolerant delivery
///
/// # Example
///
/// ```no_run
/// use boe_digest::core::config::AppConfig;
/// use boe_digest::worker::DigestPipeline;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     boe_digest::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let pipeline = DigestPipeline::from_config(&config)?;
///     let summary = pipeline.produce_daily_summary(false).await?;
///     println!("{summary}");
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod cache;
pub mod core;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod store;
pub mod telegram;
pub mod worker;

pub use ai::estimate_tokens;
pub use errors::DigestError;

/// Configure structured logging.
///
/// Level comes from `RUST_LOG` (default `info`); `LOG_FORMAT=json` switches to
/// JSON lines. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// boe_digest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
}
