//! Scripted provider for tests: canned answers, recorded calls, no network.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CompletionRequest, LlmProvider, LlmResponse};
use crate::types::{AuditError, Result};

/// A request as seen by the scripted provider
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub max_output_tokens: u32,
}

type Responder = Box<dyn Fn(&CompletionRequest<'_>) -> Result<String> + Send + Sync>;

pub struct ScriptedProvider {
    responder: Responder,
    configured: bool,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest<'_>) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            configured: true,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Always answer with the same text
    pub fn fixed(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Provider whose credential is missing
    pub fn unconfigured() -> Self {
        let mut provider = Self::fixed("{}");
        provider.configured = false;
        provider
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of calls observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: request.system.to_string(),
            user: request.user.to_string(),
            max_output_tokens: request.max_output_tokens,
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        (self.responder)(request).map(LlmResponse::content_only)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.configured {
            Ok(())
        } else {
            Err(AuditError::Config("OPENAI_API_KEY is not set".to_string()))
        }
    }
}
