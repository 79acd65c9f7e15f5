//! Notification collaborator
//!
//! Notices are short user-facing messages (the host decides how to show them).
//! They are separate from logging: a notice may also be logged, but logs never
//! reach the user through this channel.

use std::sync::Mutex;
use std::time::Duration;

use tracing::info;

/// Default display time for error notices
pub const ERROR_NOTICE: Duration = Duration::from_secs(5);

/// Display time for bulk operation summaries
pub const SUMMARY_NOTICE: Duration = Duration::from_secs(10);

/// Receives user-facing notices; fire and forget
pub trait Notifier {
    fn notify(&self, message: &str, duration: Option<Duration>);
}

/// Notifier that only writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, _duration: Option<Duration>) {
        info!(target: "uidmark_core::notice", "{}", message);
    }
}

/// Notifier that keeps every notice, for tests and embedding
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// True if any notice contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, _duration: Option<Duration>) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
