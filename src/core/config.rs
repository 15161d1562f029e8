use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;

use super::models::ChatId;
use crate::errors::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.boe.es/datosabiertos/api/boe/sumario/";
pub const DEFAULT_MODEL_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL_NAME: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: Option<String>,
    pub chat_id: Option<ChatId>,
    pub model_api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub model_provider: String,
    pub model_name: String,
    pub boe_base_url: String,
    pub download_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub database_path: PathBuf,
    pub daily_send_time: NaiveTime,
    pub timezone: Option<Tz>,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let chat_id = get("CHAT_ID")
            .map(|raw| {
                raw.parse::<ChatId>().map_err(|e| ConfigError::Invalid {
                    var: "CHAT_ID",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let daily_send_time = match get("DAILY_SEND_TIME") {
            Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| {
                ConfigError::Invalid {
                    var: "DAILY_SEND_TIME",
                    reason: format!("{e} (expected HH:MM)"),
                }
            })?,
            None => NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
        };

        let timezone = get("DIGEST_TIMEZONE")
            .map(|raw| {
                raw.trim().parse::<Tz>().map_err(|e| ConfigError::Invalid {
                    var: "DIGEST_TIMEZONE",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "HTTP_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(30),
        };

        Ok(Self {
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            chat_id,
            model_api_key: get("MODEL_API_KEY"),
            system_prompt: get("SYSTEM_PROMPT"),
            model_provider: get("MODEL_PROVIDER")
                .unwrap_or_else(|| DEFAULT_MODEL_PROVIDER.to_string()),
            model_name: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            boe_base_url: get("BOE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            download_dir: get("DOWNLOAD_DIR").map_or_else(|| PathBuf::from("downloads"), PathBuf::from),
            cache_dir: get("CACHE_DIR").map_or_else(|| PathBuf::from("cache"), PathBuf::from),
            database_path: get("DATABASE_PATH")
                .map_or_else(|| PathBuf::from("data/bot.db"), PathBuf::from),
            daily_send_time,
            timezone,
            http_timeout,
        })
    }

    pub fn require_bot_token(&self) -> Result<&str, ConfigError> {
        self.telegram_bot_token
            .as_deref()
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
    }

    pub fn require_chat_id(&self) -> Result<ChatId, ConfigError> {
        self.chat_id.ok_or(ConfigError::Missing("CHAT_ID"))
    }

    pub fn require_model_api_key(&self) -> Result<&str, ConfigError> {
        self.model_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("MODEL_API_KEY"))
    }
}
