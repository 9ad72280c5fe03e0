// src/registry/task.rs

use std::fmt;
use std::path::PathBuf;

/// How a task's command is executed.
///
/// Decided once when the task is built; the supervisor never inspects the
/// command text to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Executed directly as an argument vector, no shell involved.
    Argv(Vec<String>),
    /// Executed through the platform shell (`sh -c` / `cmd /C`).
    ShellLine(String),
}

impl fmt::Display for TaskCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskCommand::Argv(parts) => write!(f, "{:?}", parts),
            TaskCommand::ShellLine(line) => f.write_str(line),
        }
    }
}

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrigin {
    Configured,
    Discovered,
}

impl fmt::Display for TaskOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOrigin::Configured => f.write_str("configured"),
            TaskOrigin::Discovered => f.write_str("discovered"),
        }
    }
}

/// A validated, launchable job. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub command: TaskCommand,
    /// Absolute, existing working directory.
    pub cwd: PathBuf,
    pub origin: TaskOrigin,
}

impl Task {
    /// Listing lines for this task at 1-based `position`.
    pub fn describe(&self, position: usize) -> Vec<String> {
        let mut lines = vec![format!("{position:>3}. {} [{}]", self.name, self.origin)];
        if !self.description.is_empty() {
            lines.push(format!("     {}", self.description));
        }
        lines.push(format!("     command: {}", self.command));
        lines.push(format!("     cwd: {}", self.cwd.display()));
        lines
    }
}
