// src/engine/console.rs

//! Where the controller's transcript goes.

use std::io::{self, IsTerminal, Write};

use crossterm::style::{Color, Stylize};

use crate::engine::state::ControllerState;
use crate::relay::LineCategory;

/// Display sink for the controller.
pub trait Console {
    /// Append one transcript line.
    fn append(&mut self, text: &str, category: LineCategory);

    /// Show a user-facing warning (e.g. a rejected start).
    fn warn(&mut self, message: &str);

    /// Called after every state transition.
    fn state_changed(&mut self, _state: &ControllerState) {}
}

/// Writes the transcript to stdout, coloured by category when stdout is a
/// terminal. Warnings go to stderr.
#[derive(Debug)]
pub struct TerminalConsole {
    color: bool,
    show_status: bool,
}

impl TerminalConsole {
    /// `show_status`: print a `Status: ...` line on every transition
    /// (interactive mode).
    pub fn new(show_status: bool) -> Self {
        Self {
            color: io::stdout().is_terminal(),
            show_status,
        }
    }

    fn color_for(category: LineCategory) -> Option<Color> {
        match category {
            LineCategory::Error => Some(Color::Rgb { r: 0xFF, g: 0x8F, b: 0x8F }),
            LineCategory::Success => Some(Color::Rgb { r: 0x66, g: 0xE3, b: 0xA6 }),
            LineCategory::Info => Some(Color::Rgb { r: 0x8E, g: 0xC9, b: 0xFF }),
            LineCategory::Progress => Some(Color::Rgb { r: 0xF2, g: 0xCC, b: 0x71 }),
            LineCategory::Plain => None,
        }
    }
}

impl Console for TerminalConsole {
    fn append(&mut self, text: &str, category: LineCategory) {
        let mut out = io::stdout().lock();
        let res = match Self::color_for(category).filter(|_| self.color) {
            Some(color) => writeln!(out, "{}", text.with(color)),
            None => writeln!(out, "{text}"),
        };
        // A closed stdout (e.g. `| head`) must not take the loop down.
        let _ = res.and_then(|_| out.flush());
    }

    fn warn(&mut self, message: &str) {
        let mut err = io::stderr().lock();
        let _ = if self.color {
            writeln!(err, "{} {}", "warning:".yellow().bold(), message)
        } else {
            writeln!(err, "warning: {message}")
        };
    }

    fn state_changed(&mut self, state: &ControllerState) {
        if !self.show_status {
            return;
        }
        let line = format!("Status: {state}");
        let mut out = io::stdout().lock();
        let _ = if self.color {
            let color = if state.is_running() { Color::Yellow } else { Color::Cyan };
            writeln!(out, "{}", line.with(color))
        } else {
            writeln!(out, "{line}")
        };
    }
}

/// Keeps everything in memory. Used by tests and embedders.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    pub lines: Vec<(String, LineCategory)>,
    pub warnings: Vec<String>,
    pub states: Vec<ControllerState>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript text only.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|(text, _)| text.as_str()).collect()
    }
}

impl Console for MemoryConsole {
    fn append(&mut self, text: &str, category: LineCategory) {
        self.lines.push((text.to_string(), category));
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn state_changed(&mut self, state: &ControllerState) {
        self.states.push(state.clone());
    }
}
