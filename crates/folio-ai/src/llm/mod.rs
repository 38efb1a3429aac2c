//! LLM module - generative-language provider abstraction

mod client;
mod gemini;
#[cfg(any(test, feature = "test-utils"))]
mod mock_client;
mod response;

pub use client::{GenerationRequest, LlmClient, ModelDescriptor, TextStream};
pub use gemini::{DEFAULT_BASE_URL, GeminiClient};
#[cfg(any(test, feature = "test-utils"))]
pub use mock_client::{MockLlmClient, MockStep};
pub use response::response_to_error;
