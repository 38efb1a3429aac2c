//! Gemini (Google generative-language API) provider

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{AiError, Result};
use crate::http_client::build_http_client;
use crate::llm::client::{GenerationRequest, LlmClient, ModelDescriptor, TextStream};
use crate::llm::response::{extract_message, response_to_error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";
const GENERATE_CONTENT: &str = "generateContent";

/// Gemini client
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client. A missing key is only reported when a call is made.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: build_http_client(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set custom base URL (for proxies and tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(AiError::MissingApiKey)
    }

    /// Accepts both `gemini-2.5-flash` and the listing form `models/gemini-2.5-flash`.
    fn model_url(&self, model: &str, method: &str, params: &[(&str, &str)]) -> Result<Url> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let raw = format!("{}/models/{}:{}", self.base_url, model, method);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| AiError::Llm(format!("Invalid provider URL {raw}: {e}")))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

impl From<&GenerationRequest> for GeminiRequest {
    fn from(request: &GenerationRequest) -> Self {
        let generation_config = if request.temperature.is_some() || request.response_schema.is_some()
        {
            Some(GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request
                    .response_schema
                    .as_ref()
                    .map(|_| "application/json".to_string()),
                response_schema: request.response_schema.clone(),
            })
        } else {
            None
        };

        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiResponse {
    /// Text of the first candidate, parts concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    input_token_limit: Option<u32>,
    #[serde(default)]
    output_token_limit: Option<u32>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl GeminiModel {
    fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_CONTENT)
    }
}

impl From<GeminiModel> for ModelDescriptor {
    fn from(model: GeminiModel) -> Self {
        Self {
            display_name: model
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| model.name.clone()),
            name: model.name,
            description: model.description.unwrap_or_default(),
            input_token_limit: model.input_token_limit.unwrap_or_default(),
            output_token_limit: model.output_token_limit.unwrap_or_default(),
        }
    }
}

/// Split complete SSE events off the front of `buffer`.
///
/// Works on bytes so a multi-byte character split across network chunks is never
/// decoded early. Carriage returns are dropped since they only appear in framing.
fn drain_events(buffer: &mut Vec<u8>) -> Vec<String> {
    buffer.retain(|byte| *byte != b'\r');

    let mut events = Vec::new();
    while let Some(pos) = buffer.windows(2).position(|window| window == b"\n\n") {
        let event: Vec<u8> = buffer.drain(..pos + 2).collect();
        events.push(String::from_utf8_lossy(&event[..pos]).into_owned());
    }
    events
}

/// Parse one SSE event into a text fragment (possibly empty).
fn parse_event(event: &str) -> Result<String> {
    let mut text = String::new();
    for line in event.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() || data == "[DONE]" {
            continue;
        }

        let parsed: GeminiResponse = serde_json::from_str(data)
            .map_err(|e| AiError::InvalidFormat(format!("Gemini stream event: {e}")))?;

        if let Some(error) = parsed.error {
            let message = extract_message(&serde_json::json!({ "error": error }))
                .unwrap_or_else(|| "Unknown stream error".to_string());
            return Err(AiError::Llm(message));
        }

        text.push_str(&parsed.text());
    }
    Ok(text)
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> &str {
        "gemini"
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        let api_key = self.api_key()?;
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let raw = format!("{}/models", self.base_url);
            let mut params = vec![("pageSize", "1000")];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }
            let url = Url::parse_with_params(&raw, &params)
                .map_err(|e| AiError::Llm(format!("Invalid provider URL {raw}: {e}")))?;

            let response = self
                .client
                .get(url)
                .header("x-goog-api-key", api_key)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(response_to_error(response, PROVIDER).await);
            }

            let page: GeminiModelList = response
                .json()
                .await
                .map_err(|e| AiError::InvalidFormat(format!("Model listing: {e}")))?;

            models.extend(
                page.models
                    .into_iter()
                    .filter(GeminiModel::supports_generation)
                    .map(ModelDescriptor::from),
            );

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(count = models.len(), "Listed Gemini models");
        Ok(models)
    }

    async fn stream_text(&self, request: GenerationRequest) -> Result<TextStream> {
        let api_key = self.api_key()?;
        let url = self.model_url(&request.model, "streamGenerateContent", &[("alt", "sse")])?;
        let body = GeminiRequest::from(&request);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_to_error(response, PROVIDER).await);
        }

        let model = request.model;
        Ok(Box::pin(async_stream::stream! {
            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(AiError::Llm(format!("Stream error: {}", e)));
                        return;
                    }
                };
                buffer.extend_from_slice(&chunk);

                for event in drain_events(&mut buffer) {
                    match parse_event(&event) {
                        Ok(text) if text.is_empty() => {}
                        Ok(text) => yield Ok(text),
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }

            // The last event may lack a trailing blank line.
            let remaining = String::from_utf8_lossy(&buffer).trim().to_string();
            if !remaining.is_empty() {
                match parse_event(&remaining) {
                    Ok(text) if text.is_empty() => {}
                    Ok(text) => yield Ok(text),
                    Err(e) => yield Err(e),
                }
            }

            tracing::debug!(model = %model, "Gemini stream finished");
        }))
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let api_key = self.api_key()?;
        let url = self.model_url(&request.model, GENERATE_CONTENT, &[])?;
        let body = GeminiRequest::from(&request);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_to_error(response, PROVIDER).await);
        }

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidFormat(format!("Generation response: {e}")))?;
        Ok(data.text())
    }
}
