use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream answers 400 until the day's bulletin is out.
    #[error("The bulletin for {0} is not published yet")]
    NotYetPublished(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to send HTTP request: {0}")]
    Transport(String),

    #[error("Failed to store downloaded document: {0}")]
    Io(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported file type: {extension}. Supported types: {supported}")]
    Unsupported { extension: String, supported: String },

    #[error("No text content in {0}")]
    EmptyContent(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Failed to read file: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Failed to generate summary: {0}")]
    Remote(String),

    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),
}

impl From<reqwest::Error> for SummarizeError {
    fn from(error: reqwest::Error) -> Self {
        SummarizeError::Remote(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Telegram API error: {description}")]
    Api { description: String },

    #[error("Failed to send Telegram message: {0}")]
    Http(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(error: reqwest::Error) -> Self {
        DeliveryError::Http(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Summary cache I/O failed for {key}: {reason}")]
    Io { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Subscriber database error: {0}")]
    Database(String),

    #[error("Failed to prepare database location: {0}")]
    Io(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::Database(error.to_string())
    }
}

/// Top-level failure of a digest run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("A broadcast is already running")]
    BroadcastInProgress,
}

impl DigestError {
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            DigestError::Config(_) => "config",
            DigestError::Fetch(_) => "fetch",
            DigestError::Extract(_) => "extract",
            DigestError::Summarize(_) => "summarize",
            DigestError::Cache(_) => "cache",
            DigestError::Store(_) => "store",
            DigestError::Delivery(_) | DigestError::BroadcastInProgress => "deliver",
        }
    }

    #[must_use]
    pub fn is_not_yet_published(&self) -> bool {
        matches!(self, DigestError::Fetch(FetchError::NotYetPublished(_)))
    }
}
