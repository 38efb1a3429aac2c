//! Folio Core - domain logic shared by the server and the terminal front-end
//!
//! - [`markdown`]: line-oriented formatter for streamed replies
//! - [`chat`]: chat turn state machine and streaming reader
//! - [`review`]: review prompt, output schema and result handling
//! - [`sources`]: repository file and blog article clients
//! - [`client`]: HTTP client for the Folio server

pub mod chat;
pub mod client;
pub mod language;
pub mod markdown;
pub mod models;
pub mod review;
pub mod site;
pub mod sources;

pub use chat::{AbortHandle, ChatError, ChatSession, ChatTransport, RenderUpdate, TurnState};
pub use client::{ClientError, FolioClient};
pub use markdown::{Node, Span};
pub use review::{ReviewView, ReviewWorkspace};
pub use sources::{ArticleClient, GitHubClient, SourceError};
