// src/engine/state.rs

use std::fmt;

use crate::registry::Task;

/// The controller's two states. There are no others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Ready,
    Running { task: String },
}

impl ControllerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ControllerState::Running { .. })
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Ready => f.write_str("Ready"),
            ControllerState::Running { task } => write!(f, "Running ({task})"),
        }
    }
}

/// A start trigger bound to exactly one task at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTrigger {
    pub task: Task,
    pub enabled: bool,
}

/// Final result of one run, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub task: String,
    pub exit_code: i32,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Terminal summary line appended to the transcript.
    pub fn summary(&self) -> String {
        if self.success() {
            format!("[DONE] {} completed successfully.", self.task)
        } else {
            format!("[DONE] {} exited with code {}.", self.task, self.exit_code)
        }
    }
}
