use std::error::Error;

use boe_digest::errors::{
    CacheError, ConfigError, DeliveryError, DigestError, ExtractError, FetchError, StoreError,
    SummarizeError,
};

#[test]
fn test_errors_implement_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    assert_error(&ConfigError::Missing("CHAT_ID"));
    assert_error(&FetchError::Transport("timeout".into()));
    assert_error(&DigestError::BroadcastInProgress);
}

#[test]
fn test_error_display() {
    assert_eq!(
        ConfigError::Missing("TELEGRAM_BOT_TOKEN").to_string(),
        "Missing required environment variable: TELEGRAM_BOT_TOKEN"
    );
    assert_eq!(
        FetchError::Http {
            status: 500,
            body: "oops".into()
        }
        .to_string(),
        "Upstream returned HTTP 500: oops"
    );
    assert_eq!(
        ExtractError::NotFound("/tmp/x.pdf".into()).to_string(),
        "File not found: /tmp/x.pdf"
    );
    assert_eq!(
        DeliveryError::Api {
            description: "Bad Request: chat not found".into()
        }
        .to_string(),
        "Telegram API error: Bad Request: chat not found"
    );
}

#[test]
fn test_digest_error_is_transparent() {
    let inner = SummarizeError::Remote("quota".into());
    let expected = inner.to_string();
    let wrapped = DigestError::from(inner);
    assert_eq!(wrapped.to_string(), expected);
}

#[test]
fn test_digest_error_stage() {
    let cases: Vec<(DigestError, &str)> = vec![
        (ConfigError::Missing("CHAT_ID").into(), "config"),
        (FetchError::NotYetPublished("20240101".into()).into(), "fetch"),
        (ExtractError::EmptyContent("a.xml".into()).into(), "extract"),
        (SummarizeError::Remote("x".into()).into(), "summarize"),
        (
            CacheError::Io {
                key: "boe_20240101".into(),
                reason: "denied".into(),
            }
            .into(),
            "cache",
        ),
        (StoreError::Database("locked".into()).into(), "store"),
        (DeliveryError::Http("reset".into()).into(), "deliver"),
        (DigestError::BroadcastInProgress, "deliver"),
    ];

    for (error, stage) in cases {
        assert_eq!(error.stage(), stage, "{error}");
    }
}

#[test]
fn test_not_yet_published_detection() {
    let pending: DigestError = FetchError::NotYetPublished("20240101".into()).into();
    let other: DigestError = FetchError::Http {
        status: 404,
        body: String::new(),
    }
    .into();

    assert!(pending.is_not_yet_published());
    assert!(!other.is_not_yet_published());
}
