use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Calendar day a bulletin belongs to, rendered as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in `tz`, or in the process-local zone when `tz` is `None`.
    #[must_use]
    pub fn today(tz: Option<Tz>) -> Self {
        match tz {
            Some(tz) => Self(Utc::now().with_timezone(&tz).date_naive()),
            None => Self(Local::now().date_naive()),
        }
    }

    /// Stem shared by the downloaded document and its cached summary.
    #[must_use]
    pub fn document_stem(&self) -> String {
        format!("boe_{self}")
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y%m%d").map(Self)
    }
}

/// The day's source document as saved on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyDocument {
    pub key: DateKey,
    pub source_url: String,
    pub path: PathBuf,
    /// `false` when an earlier download was reused instead of fetching.
    pub downloaded: bool,
}

/// Telegram chat identifier, the delivery target of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Markup mode requested from the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    MarkdownV2,
    Markdown,
    Plain,
}

impl ParseMode {
    #[must_use]
    pub fn as_api_value(self) -> Option<&'static str> {
        match self {
            ParseMode::MarkdownV2 => Some("MarkdownV2"),
            ParseMode::Markdown => Some("Markdown"),
            ParseMode::Plain => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_renders_compact_form() {
        let key = DateKey::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(key.to_string(), "20240307");
        assert_eq!(key.document_stem(), "boe_20240307");
        assert_eq!("20240307".parse::<DateKey>().unwrap(), key);
    }

    #[test]
    fn chat_id_parses_negative_group_ids() {
        assert_eq!("-100123".parse::<ChatId>().unwrap(), ChatId(-100_123));
        assert!("abc".parse::<ChatId>().is_err());
    }

    #[test]
    fn plain_mode_has_no_api_value() {
        assert_eq!(ParseMode::Plain.as_api_value(), None);
        assert_eq!(ParseMode::default().as_api_value(), Some("MarkdownV2"));
    }
}
