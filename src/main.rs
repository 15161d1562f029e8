use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use boe_digest::core::config::AppConfig;
use boe_digest::telegram::TelegramBot;
use boe_digest::worker::{DailySchedule, DigestPipeline, DigestService, spawn_daily_job};

#[derive(Parser)]
#[command(name = "boe-digest", version, about = "Daily BOE digest delivered over Telegram")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the Telegram bot and the daily broadcast
    Bot,
    /// Produce today's summary and print it
    Pipeline {
        /// Ignore a cached summary and regenerate it
        #[arg(long)]
        force: bool,
    },
    /// Produce today's summary and send it to CHAT_ID
    Send {
        #[arg(long)]
        force: bool,
    },
    /// Summarize a local PDF or XML file and send it to CHAT_ID
    Process {
        file: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    boe_digest::setup_logging();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(mode: Mode) -> Result<()> {
    let config = AppConfig::from_env().context("configuration")?;

    match mode {
        Mode::Bot => run_bot(&config).await,
        Mode::Pipeline { force } => {
            let pipeline = DigestPipeline::from_config(&config)?;
            let summary = pipeline.produce_daily_summary(force).await?;
            println!("{summary}");
            Ok(())
        }
        Mode::Send { force } => {
            let target = config.require_chat_id()?;
            let (service, _client) = DigestService::from_config(&config).await?;
            service.deliver_daily_summary_to(target, force).await?;
            info!("Summary sent successfully");
            Ok(())
        }
        Mode::Process { file, force } => {
            if !file.exists() {
                bail!("File not found: {}", file.display());
            }
            let target = config.require_chat_id()?;
            let (service, _client) = DigestService::from_config(&config).await?;
            service.deliver_file_summary_to(&file, target, force).await?;
            info!("Summary sent successfully");
            Ok(())
        }
    }
}

async fn run_bot(config: &AppConfig) -> Result<()> {
    info!("Starting BOE digest bot");
    let (service, client) = DigestService::from_config(config).await?;
    let service = Arc::new(service);

    let schedule = DailySchedule::new(config.daily_send_time, config.timezone);
    match service.store().count().await {
        Ok(count) => info!("Current subscribers: {}", count),
        Err(e) => warn!("Could not count subscribers: {}", e),
    }

    let job = spawn_daily_job(Arc::clone(&service), schedule);
    let bot = TelegramBot::new(client, Arc::clone(&service), schedule.display_time());

    bot.run(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await;

    job.abort();
    service.store().close().await;
    Ok(())
}
