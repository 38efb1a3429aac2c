use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::warn;

/// How long a copied element shows its "copied" state
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

/// Destination for copied text.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> std::io::Result<()>;
}

/// Something in the transcript that can be copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyTarget {
    /// Whole message text
    Message(usize),
    /// The n-th code block of a message
    CodeBlock { message: usize, block: usize },
}

/// Tracks which elements were copied recently.
#[derive(Debug, Default)]
pub struct CopyTracker {
    copied: HashMap<CopyTarget, Instant>,
}

impl CopyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, target: CopyTarget, now: Instant) {
        self.copied.insert(target, now);
    }

    pub fn is_copied(&self, target: CopyTarget, now: Instant) -> bool {
        self.copied
            .get(&target)
            .is_some_and(|at| now.saturating_duration_since(*at) < COPIED_FEEDBACK)
    }

    /// Drop marks whose feedback window has passed.
    pub fn expire(&mut self, now: Instant) {
        self.copied
            .retain(|_, at| now.saturating_duration_since(*at) < COPIED_FEEDBACK);
    }

    /// Write `text` and mark `target` on success. Failures are logged and leave
    /// the target unmarked.
    pub fn copy(
        &mut self,
        clipboard: &dyn Clipboard,
        target: CopyTarget,
        text: &str,
        now: Instant,
    ) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                self.mark(target, now);
                true
            }
            Err(err) => {
                warn!(error = %err, ?target, "Failed to copy to clipboard");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: RefCell<Option<String>>,
        fail: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> std::io::Result<()> {
            if self.fail {
                return Err(std::io::Error::other("clipboard unavailable"));
            }
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copied_state_reverts_after_two_seconds() {
        let clipboard = MemoryClipboard::default();
        let mut tracker = CopyTracker::new();
        let now = Instant::now();
        let target = CopyTarget::CodeBlock {
            message: 1,
            block: 0,
        };

        assert!(tracker.copy(&clipboard, target, "let x = 1;", now));
        assert_eq!(clipboard.contents.borrow().as_deref(), Some("let x = 1;"));
        assert!(tracker.is_copied(target, now + Duration::from_millis(1_999)));
        assert!(!tracker.is_copied(target, now + COPIED_FEEDBACK));
        assert!(!tracker.is_copied(CopyTarget::Message(1), now));

        tracker.expire(now + COPIED_FEEDBACK);
        assert!(!tracker.is_copied(target, now));
    }

    #[test]
    fn test_failed_copy_is_not_marked() {
        let clipboard = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let mut tracker = CopyTracker::new();
        let now = Instant::now();

        assert!(!tracker.copy(&clipboard, CopyTarget::Message(0), "text", now));
        assert!(!tracker.is_copied(CopyTarget::Message(0), now));
    }
}
