use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::client::ClientError;

/// Raw response body of one chat turn
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ClientError>> + Send>>;

/// Opens the streaming channel for a chat turn.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open(&self, message: &str, model: &str) -> Result<ByteStream, ClientError>;
}
