//! Shared doubles for service tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use studio_llm::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse, Message,
    StopReason, TokenUsage,
};
use studio_store::{BackendMode, MemoryBackend, Persistence, Query, Row};

use crate::{ServiceConfig, StudioService};

mock! {
    pub Store {}

    #[async_trait]
    impl Persistence for Store {
        async fn select(&self, table: &str, query: &Query) -> studio_store::Result<Vec<Row>>;
        async fn insert(&self, table: &str, record: Row) -> studio_store::Result<Row>;
        async fn update(&self, table: &str, id: &str, patch: Row) -> studio_store::Result<Row>;
        async fn delete(&self, table: &str, id: &str) -> studio_store::Result<()>;
        fn mode(&self) -> BackendMode;
    }
}

/// Completion provider returning a fixed reply and recording requests
pub struct CannedProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CannedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for CannedProvider {
    async fn complete(&self, request: CompletionRequest) -> studio_llm::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                message: Message::assistant(text.clone()),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 12,
                    output_tokens: 7,
                },
            }),
            Err(message) => Err(CompletionError::RequestFailed(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Service over the seeded memory backend, without a completion provider
pub fn seeded_service() -> (StudioService, Arc<MemoryBackend>) {
    let store = Arc::new(MemoryBackend::seeded());
    let service = StudioService::new(store.clone(), ServiceConfig::default());
    (service, store)
}

/// Service over the seeded memory backend with `provider` attached
pub fn service_with(provider: Arc<CannedProvider>) -> (StudioService, Arc<MemoryBackend>) {
    let (service, store) = seeded_service();
    (service.with_completion(provider), store)
}
