use std::time::Duration;

use chrono::{DateTime, Local};

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One entry of the chat transcript
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
    /// Time from submit to the latest received chunk
    pub response_time: Option<Duration>,
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Local::now(),
            response_time: None,
            is_error: false,
        }
    }

    /// Empty bot message, created when the first fragment arrives
    pub fn bot() -> Self {
        Self {
            sender: Sender::Bot,
            text: String::new(),
            timestamp: Local::now(),
            response_time: None,
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>, response_time: Duration) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Local::now(),
            response_time: Some(response_time),
            is_error: true,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered, append-only list of messages for one session.
///
/// Only the trailing message may change, and only while a reply streams in.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn get(&self, index: usize) -> Option<&ChatMessage> {
        self.messages.get(index)
    }

    /// Append a message and return its index
    pub(crate) fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Replace the trailing bot message's text. No-op if the tail is a user message.
    pub(crate) fn update_last(&mut self, text: &str, response_time: Duration) {
        if let Some(last) = self.messages.last_mut()
            && last.sender == Sender::Bot
        {
            last.text.clear();
            last.text.push_str(text);
            last.response_time = Some(response_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_last_only_touches_bot_tail() {
        let mut transcript = ChatTranscript::new();
        transcript.push(ChatMessage::user("hi"));
        transcript.update_last("ignored", Duration::from_millis(5));
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("hi"));

        transcript.push(ChatMessage::bot());
        transcript.update_last("hello", Duration::from_millis(5));
        let last = transcript.last().unwrap();
        assert_eq!(last.text, "hello");
        assert_eq!(last.response_time, Some(Duration::from_millis(5)));
    }
}
