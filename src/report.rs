//! Diagnostics sink.
//!
//! The redirect core reports conflicts as free-text "generic" messages and
//! consults the reporter's verbosity to decide whether low-priority notices
//! are worth emitting.

use parking_lot::Mutex;

use crate::{log, logger};

/// A sink for free-text build diagnostics.
pub trait Reporter: Send + Sync {
    /// Report a generic message.
    fn report_generic(&self, message: &str);

    /// Verbosity level; `0` is quiet, higher levels show more notices.
    fn verbosity(&self) -> u8;
}

/// Reporter that writes through the [`log!`](crate::log) macro.
///
/// Verbosity follows the global level set from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliReporter;

impl Reporter for CliReporter {
    fn report_generic(&self, message: &str) {
        log!("redirect"; "{}", message);
    }

    fn verbosity(&self) -> u8 {
        logger::verbosity()
    }
}

/// Reporter that keeps messages in memory.
#[derive(Debug, Default)]
pub struct BufferReporter {
    messages: Mutex<Vec<String>>,
    verbosity: u8,
}

impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: u8) -> Self {
        Self {
            messages: Mutex::default(),
            verbosity,
        }
    }

    /// All messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().iter().any(|m| m.contains(needle))
    }

    /// Drop all collected messages.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Reporter for BufferReporter {
    fn report_generic(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }

    fn verbosity(&self) -> u8 {
        self.verbosity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_reporter_collects() {
        let reporter = BufferReporter::new();
        reporter.report_generic("first");
        reporter.report_generic("second message");
        assert_eq!(reporter.messages(), ["first", "second message"]);
        assert!(reporter.contains("second"));
        assert!(!reporter.contains("third"));

        reporter.clear();
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn test_buffer_reporter_verbosity() {
        assert_eq!(BufferReporter::new().verbosity(), 0);
        assert_eq!(BufferReporter::with_verbosity(2).verbosity(), 2);
    }
}
