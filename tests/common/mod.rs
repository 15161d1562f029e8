#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use boe_digest::ai::Summarizer;
use boe_digest::cache::SummaryCache;
use boe_digest::core::models::{ChatId, DateKey};
use boe_digest::errors::{DeliveryError, FetchError, SummarizeError};
use boe_digest::fetch::{DailyFetcher, HttpReply, HttpTransport};
use boe_digest::store::SubscriberStore;
use boe_digest::telegram::{ApiResponse, ChatTransport, Dispatcher, OutgoingMessage};
use boe_digest::worker::{DigestPipeline, DigestService};

pub const BASE_URL: &str = "https://bulletin.test/api/sumario/";

/// Records every GET and answers with a fixed reply.
pub struct FakeHttp {
    reply: HttpReply,
    pub calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeHttp {
    pub fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: HttpReply {
                status,
                body: body.as_bytes().to_vec(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for FakeHttp {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpReply, FetchError> {
        self.calls.lock().unwrap().push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        ));
        Ok(self.reply.clone())
    }
}

/// Returns a canned summary, or fails when built with `failing`.
pub struct FakeSummarizer {
    reply: Result<String, String>,
    pub inputs: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    pub fn returning(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(summary.to_string()),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(reason.to_string()),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.reply.clone().map_err(SummarizeError::Remote)
    }
}

/// Records every `sendMessage`. Scripted responses are used first, then
/// chats listed in `blocked` fail and everything else succeeds.
#[derive(Default)]
pub struct FakeChat {
    pub sent: Mutex<Vec<OutgoingMessage>>,
    pub script: Mutex<VecDeque<Result<ApiResponse<Value>, String>>>,
    pub blocked: Mutex<HashSet<ChatId>>,
}

impl FakeChat {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_response(&self, response: ApiResponse<Value>) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_transport_error(&self, reason: &str) {
        self.script.lock().unwrap().push_back(Err(reason.to_string()));
    }

    pub fn block(&self, chat: ChatId) {
        self.blocked.lock().unwrap().insert(chat);
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat)
            .map(|m| m.text)
            .collect()
    }
}

#[async_trait]
impl ChatTransport for FakeChat {
    async fn send_message(
        &self,
        message: &OutgoingMessage,
    ) -> Result<ApiResponse<Value>, DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next.map_err(DeliveryError::Http);
        }
        if self.blocked.lock().unwrap().contains(&message.chat_id) {
            return Ok(ApiResponse::failure(
                403,
                "Forbidden: bot was blocked by the user",
            ));
        }
        Ok(ApiResponse::success(json!({ "message_id": 1 })))
    }
}

/// A fully wired service over temp directories and fakes.
pub struct Harness {
    pub dir: TempDir,
    pub http: Arc<FakeHttp>,
    pub summarizer: Arc<FakeSummarizer>,
    pub chat: Arc<FakeChat>,
    pub cache: SummaryCache,
    pub service: DigestService,
}

impl Harness {
    pub async fn new(http: Arc<FakeHttp>, summarizer: Arc<FakeSummarizer>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let cache = SummaryCache::new(dir.path().join("cache"));
        let fetcher = DailyFetcher::new(
            http.clone(),
            BASE_URL,
            dir.path().join("downloads"),
            cache.clone(),
        )
        .unwrap();
        let pipeline = DigestPipeline::new(fetcher, cache.clone(), summarizer.clone(), None);
        let store = SubscriberStore::open(&dir.path().join("data/bot.db"))
            .await
            .unwrap();
        let chat = FakeChat::new();
        let service = DigestService::new(pipeline, store, Dispatcher::new(chat.clone()));

        Self {
            dir,
            http,
            summarizer,
            chat,
            cache,
            service,
        }
    }

    pub fn today(&self) -> DateKey {
        self.service.pipeline().today()
    }

    pub fn downloads(&self) -> std::path::PathBuf {
        self.dir.path().join("downloads")
    }

    pub fn document_path(&self) -> std::path::PathBuf {
        self.downloads()
            .join(format!("{}.xml", self.today().document_stem()))
    }
}

/// An XML body of exactly `len` characters.
pub fn xml_body(len: usize) -> String {
    let head = "<sumario><item>Real Decreto</item><item>";
    let tail = "</item></sumario>";
    let filler = len.saturating_sub(head.len() + tail.len());
    format!("{head}{}{tail}", "a".repeat(filler))
}
