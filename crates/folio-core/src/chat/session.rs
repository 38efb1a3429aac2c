use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::decoder::Utf8Decoder;
use super::stopwatch::Stopwatch;
use super::transport::ChatTransport;
use crate::client::ClientError;
use crate::markdown::{self, Node};
use crate::models::{ChatMessage, ChatTranscript};

/// Text shown in place of a failed reply. Provider details go to the log only.
pub const GENERIC_ERROR_TEXT: &str = "❌ Error while processing your request.";

/// Lifecycle of one chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    /// Submitted, no reply bytes yet
    Awaiting,
    Streaming,
    Complete,
    Aborted,
    Failed,
}

impl TurnState {
    pub fn in_flight(self) -> bool {
        matches!(self, Self::Awaiting | Self::Streaming)
    }
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A reply is still streaming")]
    Busy,

    #[error("No model selected")]
    NoModel,

    #[error("No turn has been submitted")]
    NoPendingTurn,
}

/// Cancels the turn it was issued for.
#[derive(Debug, Clone)]
pub struct AbortHandle(CancellationToken);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// Emitted after every chunk with the full re-rendered reply.
#[derive(Debug)]
pub struct RenderUpdate<'a> {
    pub message_index: usize,
    pub text: &'a str,
    pub nodes: Vec<Node>,
    pub elapsed: Duration,
}

struct PendingTurn {
    message: String,
    model: String,
    cancel: CancellationToken,
}

/// Client side of the chat: transcript plus the per-turn read loop.
pub struct ChatSession<T> {
    transport: T,
    model: Option<String>,
    transcript: ChatTranscript,
    state: TurnState,
    stopwatch: Stopwatch,
    pending: Option<PendingTurn>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            model: None,
            transcript: ChatTranscript::new(),
            state: TurnState::Idle,
            stopwatch: Stopwatch::new(),
            pending: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.set_model(model);
        self
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        self.model = (!model.trim().is_empty()).then_some(model);
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether a new message may be submitted
    pub fn is_ready(&self) -> bool {
        !self.state.in_flight() && self.pending.is_none()
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    /// Record the user's message and arm a new turn.
    ///
    /// The reply is read by [`ChatSession::stream_response`]. The returned handle
    /// aborts it from elsewhere.
    pub fn begin_turn(&mut self, input: &str) -> Result<AbortHandle, ChatError> {
        let message = input.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if !self.is_ready() {
            return Err(ChatError::Busy);
        }
        let model = self.model.clone().ok_or(ChatError::NoModel)?;

        self.transcript.push(ChatMessage::user(message));
        self.state = TurnState::Awaiting;
        self.stopwatch.start();

        let cancel = CancellationToken::new();
        let handle = AbortHandle(cancel.clone());
        self.pending = Some(PendingTurn {
            message: message.to_string(),
            model,
            cancel,
        });
        Ok(handle)
    }

    /// Read the reply of the armed turn, calling `on_update` after every chunk.
    ///
    /// Returns the terminal state of the turn. The session itself is back to
    /// [`TurnState::Idle`] afterwards.
    pub async fn stream_response<F>(&mut self, mut on_update: F) -> Result<TurnState, ChatError>
    where
        F: FnMut(RenderUpdate<'_>),
    {
        let pending = self.pending.take().ok_or(ChatError::NoPendingTurn)?;
        let outcome = self.read_turn(&pending, &mut on_update).await;

        let elapsed = self.stopwatch.stop();
        drop(pending);

        let terminal = match outcome {
            Ok(state) => state,
            Err(err) => {
                error!(error = %err, "Chat turn failed");
                self.transcript
                    .push(ChatMessage::error(GENERIC_ERROR_TEXT, elapsed));
                TurnState::Failed
            }
        };
        info!(outcome = ?terminal, elapsed_ms = elapsed.as_millis() as u64, "Chat turn finished");

        self.state = TurnState::Idle;
        Ok(terminal)
    }

    async fn read_turn<F>(
        &mut self,
        turn: &PendingTurn,
        on_update: &mut F,
    ) -> Result<TurnState, ClientError>
    where
        F: FnMut(RenderUpdate<'_>),
    {
        let cancel = &turn.cancel;
        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(TurnState::Aborted),
            opened = self.transport.open(&turn.message, &turn.model) => opened?,
        };

        let mut decoder = Utf8Decoder::new();
        let mut buffer = String::new();
        let mut bot_index = None;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(received = buffer.len(), "Chat turn aborted");
                    return Ok(TurnState::Aborted);
                }
                next = stream.next() => next,
            };

            let text = match next {
                Some(chunk) => decoder.push(&chunk?),
                None => {
                    let tail = decoder.finish();
                    if !tail.is_empty() {
                        buffer.push_str(&tail);
                        self.apply_chunk(&buffer, &mut bot_index, on_update);
                    }
                    return Ok(TurnState::Complete);
                }
            };
            if text.is_empty() {
                continue;
            }

            buffer.push_str(&text);
            self.apply_chunk(&buffer, &mut bot_index, on_update);
        }
    }

    fn apply_chunk<F>(&mut self, buffer: &str, bot_index: &mut Option<usize>, on_update: &mut F)
    where
        F: FnMut(RenderUpdate<'_>),
    {
        let transcript = &mut self.transcript;
        let index = *bot_index.get_or_insert_with(|| transcript.push(ChatMessage::bot()));
        self.state = TurnState::Streaming;

        let elapsed = self.stopwatch.elapsed();
        self.transcript.update_last(buffer, elapsed);
        on_update(RenderUpdate {
            message_index: index,
            text: buffer,
            nodes: markdown::parse(buffer),
            elapsed,
        });
    }
}
