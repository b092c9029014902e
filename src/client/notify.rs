//! User-visible notification boundary.

use std::sync::Mutex;

/// Notification severity, mirroring toast styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Fire-and-forget sink for human-readable messages. No retry, no queue,
/// no persistence; the loader emits at most one per failure branch.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Sink that forwards notifications to the tracing pipeline.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(message, "notification"),
            Severity::Success | Severity::Info => tracing::info!(message, "notification"),
        }
    }
}

/// Sink that records every notification; used to assert emission counts.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().expect("sink poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().expect("sink poisoned").len()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .expect("sink poisoned")
            .push((message.to_string(), severity));
    }
}
