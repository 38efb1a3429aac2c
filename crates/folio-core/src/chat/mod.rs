//! Chat client pipeline: turn state machine, streaming reader and the
//! helpers the front-end renders with.

mod clipboard;
mod decoder;
mod session;
mod stopwatch;
mod transport;

pub use clipboard::{COPIED_FEEDBACK, Clipboard, CopyTarget, CopyTracker};
pub use decoder::Utf8Decoder;
pub use session::{
    AbortHandle, ChatError, ChatSession, GENERIC_ERROR_TEXT, RenderUpdate, TurnState,
};
pub use stopwatch::{Stopwatch, TICK, format_elapsed};
pub use transport::{ByteStream, ChatTransport};
