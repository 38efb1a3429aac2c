pub mod article;
pub mod chat;
pub mod requests;
pub mod review;

pub use article::Article;
pub use chat::{ChatMessage, ChatTranscript, Sender};
pub use folio_ai::ModelDescriptor;
pub use requests::{ChatRequest, ErrorBody, GithubRequest, GithubResponse, ReviewRequest};
pub use review::{ReviewSuggestion, Severity};
