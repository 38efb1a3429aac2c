//! LLM client trait and types

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A generation model advertised by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Provider model id, e.g. `models/gemini-2.5-flash`
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_token_limit: u32,
    #[serde(default)]
    pub output_token_limit: u32,
}

/// Single-turn generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: Option<f32>,
    /// When set, the provider is asked for `application/json` output matching this schema
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            response_schema: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Constrain output to JSON matching `schema`
    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Stream of text fragments, in provider order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// LLM client trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Get provider name
    fn provider(&self) -> &str;

    /// List models that support content generation
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>>;

    /// Open a streaming generation call.
    ///
    /// Errors raised before the first byte (auth, unknown model) are returned
    /// directly; failures after that surface as an `Err` item in the stream.
    async fn stream_text(&self, request: GenerationRequest) -> Result<TextStream>;

    /// Run a non-streaming generation call and return the full response text
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
