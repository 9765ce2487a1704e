//! Messages passed from background engine tasks to the foreground loop.
//!
//! Background tasks never touch foreground-owned state directly; every
//! outcome crosses over as an [EngineEvent] on an mpsc channel and the
//! foreground loop applies it.

use std::fmt;
use std::sync::mpsc::Sender;

/// Severity hint attached to a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Neutral,
    Info,
    Warning,
    Error,
    Success,
}

/// One transient status line; the last update of an operation reflects its
/// final outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub text: String,
    pub severity: Severity,
}

/// What the foreground loop should start once the operator has dismissed a
/// failure notification. Dismissal-before-action is what guarantees the
/// operator sees the failure reason before the working tree changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckAction {
    RevertToLastPublished,
}

/// Event emitted by a background engine task.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Status(StatusUpdate),
    Failure {
        title: String,
        message: String,
        after_ack: Option<AckAction>,
    },
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Sends a status update, ignoring a disconnected foreground loop.
pub fn send_status(tx: &Sender<EngineEvent>, text: impl Into<String>, severity: Severity) {
    let _ = tx.send(EngineEvent::Status(StatusUpdate {
        text: text.into(),
        severity,
    }));
}

/// Sends a failure notification, ignoring a disconnected foreground loop.
pub fn send_failure(
    tx: &Sender<EngineEvent>,
    title: impl Into<String>,
    message: impl Into<String>,
    after_ack: Option<AckAction>,
) {
    let _ = tx.send(EngineEvent::Failure {
        title: title.into(),
        message: message.into(),
        after_ack,
    });
}
