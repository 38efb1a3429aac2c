//! Folio AI - generative-language provider client
//!
//! Wraps the hosted Gemini API behind the [`LlmClient`] trait: model listing,
//! fragment streaming for chat, and schema-constrained JSON generation for reviews.

pub mod error;
mod http_client;
pub mod llm;

pub use error::{AiError, Result};
pub use http_client::build_http_client;
pub use llm::{GeminiClient, GenerationRequest, LlmClient, ModelDescriptor, TextStream};
