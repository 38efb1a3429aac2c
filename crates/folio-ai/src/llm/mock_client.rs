//! Deterministic mock LLM client for route and pipeline tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AiError, Result};

use super::{GenerationRequest, LlmClient, ModelDescriptor, TextStream};

/// Scripted provider behavior for one call.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Stream these fragments in order; `generate` returns them joined.
    Fragments(Vec<String>),
    /// Stream these fragments, then fail mid-stream.
    FailMidStream {
        fragments: Vec<String>,
        message: String,
    },
    /// Fail before streaming starts with a provider status.
    Error { status: u16, message: String },
}

impl MockStep {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Fragments(vec![content.into()])
    }

    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(fragments.into_iter().map(Into::into).collect())
    }

    pub fn fail_mid_stream<I, S>(fragments: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FailMidStream {
            fragments: fragments.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::Error {
            status,
            message: message.into(),
        }
    }
}

/// A deterministic mock LLM client driven by scripted steps.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    models: Vec<ModelDescriptor>,
    script: Arc<Mutex<VecDeque<MockStep>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<MockStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            ..Self::default()
        }
    }

    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }

    pub async fn push_step(&self, step: MockStep) {
        self.script.lock().await.push_back(step);
    }

    /// Number of provider calls made so far, of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Generation requests received so far.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_step(&self, request: GenerationRequest) -> Result<MockStep> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        self.script
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| AiError::Llm("Mock script exhausted".to_string()))
    }
}

fn provider_error(status: u16, message: String) -> AiError {
    AiError::LlmHttp {
        provider: "Mock".to_string(),
        status,
        message,
        details: None,
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.models.clone())
    }

    async fn stream_text(&self, request: GenerationRequest) -> Result<TextStream> {
        match self.next_step(request).await? {
            MockStep::Fragments(fragments) => Ok(Box::pin(async_stream::stream! {
                for fragment in fragments {
                    yield Ok(fragment);
                }
            })),
            MockStep::FailMidStream { fragments, message } => {
                Ok(Box::pin(async_stream::stream! {
                    for fragment in fragments {
                        yield Ok(fragment);
                    }
                    yield Err(AiError::Llm(message));
                }))
            }
            MockStep::Error { status, message } => Err(provider_error(status, message)),
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        match self.next_step(request).await? {
            MockStep::Fragments(fragments) => Ok(fragments.concat()),
            MockStep::FailMidStream { message, .. } => Err(AiError::Llm(message)),
            MockStep::Error { status, message } => Err(provider_error(status, message)),
        }
    }
}
