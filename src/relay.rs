// src/relay.rs

//! Ordered event channel between a run's execution task and the control
//! loop.
//!
//! There is exactly one producer per run (the supervisor's execution task)
//! and one consumer (the controller), which calls [`RelayReceiver::drain`] on
//! every tick and never blocks. The channel is unbounded, so a chatty child
//! process is never throttled by a slow display.

use std::fmt;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::trace;

/// Display category of one output line. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCategory {
    Info,
    Progress,
    Success,
    Error,
    Plain,
}

impl LineCategory {
    /// Classify a line by its first matching marker, checked in the order
    /// `[ERROR]`, `[DONE]`, `[PROGRESS]`, `[INFO]`.
    pub fn classify(line: &str) -> Self {
        if line.contains("[ERROR]") {
            LineCategory::Error
        } else if line.contains("[DONE]") {
            LineCategory::Success
        } else if line.contains("[PROGRESS]") {
            LineCategory::Progress
        } else if line.contains("[INFO]") {
            LineCategory::Info
        } else {
            LineCategory::Plain
        }
    }
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineCategory::Info => "info",
            LineCategory::Progress => "progress",
            LineCategory::Success => "success",
            LineCategory::Error => "error",
            LineCategory::Plain => "plain",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// One line of merged stdout/stderr.
    Line { text: String, category: LineCategory },
    /// The run is over; always the last event of its run.
    Completed { task: String, exit_code: i32 },
}

impl OutputEvent {
    pub fn line(text: impl Into<String>) -> Self {
        let text = text.into();
        let category = LineCategory::classify(&text);
        OutputEvent::Line { text, category }
    }
}

/// Producer half, owned by the execution task.
#[derive(Debug, Clone)]
pub struct RelaySender {
    tx: mpsc::UnboundedSender<OutputEvent>,
}

impl RelaySender {
    /// Forward one output line. Returns `false` once the consumer is gone.
    pub fn line(&self, text: impl Into<String>) -> bool {
        self.send(OutputEvent::line(text))
    }

    pub fn completed(&self, task: impl Into<String>, exit_code: i32) -> bool {
        self.send(OutputEvent::Completed {
            task: task.into(),
            exit_code,
        })
    }

    pub fn send(&self, event: OutputEvent) -> bool {
        trace!(?event, "relaying output event");
        self.tx.send(event).is_ok()
    }
}

/// Consumer half, owned by the controller.
#[derive(Debug)]
pub struct RelayReceiver {
    rx: mpsc::UnboundedReceiver<OutputEvent>,
}

impl RelayReceiver {
    /// Take every event available right now, in order, without waiting.
    pub fn drain(&mut self) -> Vec<OutputEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Wait for the next event. Used by tests that cannot poll on a timer.
    pub async fn recv(&mut self) -> Option<OutputEvent> {
        self.rx.recv().await
    }
}

/// Create a connected relay pair.
pub fn channel() -> (RelaySender, RelayReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RelaySender { tx }, RelayReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_precedence() {
        assert_eq!(LineCategory::classify("[DONE] but [ERROR]"), LineCategory::Error);
        assert_eq!(LineCategory::classify("[DONE] all good"), LineCategory::Success);
        assert_eq!(LineCategory::classify("[INFO] [PROGRESS] 50%"), LineCategory::Progress);
        assert_eq!(LineCategory::classify("[INFO] starting"), LineCategory::Info);
        assert_eq!(LineCategory::classify("error: lower case"), LineCategory::Plain);
        assert_eq!(LineCategory::classify(""), LineCategory::Plain);
    }

    #[test]
    fn drain_returns_everything_in_order_without_blocking() {
        let (tx, mut rx) = channel();
        assert!(rx.drain().is_empty());

        tx.line("one");
        tx.line("[ERROR] two");
        tx.completed("T", 3);

        assert_eq!(
            rx.drain(),
            vec![
                OutputEvent::line("one"),
                OutputEvent::Line {
                    text: "[ERROR] two".into(),
                    category: LineCategory::Error
                },
                OutputEvent::Completed {
                    task: "T".into(),
                    exit_code: 3
                },
            ]
        );
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn sender_reports_closed_consumer() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(!tx.line("lost"));
    }
}
