// src/engine/mod.rs

//! Control side of taskcenter.
//!
//! - [`controller`] is the Ready/Running state machine that starts runs,
//!   requests cancellation and turns relay events into transcript lines and
//!   completion reports.
//! - [`runtime`] is the timer-driven control loop around it.
//! - [`console`] is where the transcript is rendered.
//! - [`commands`] parses interactive input.

pub mod commands;
pub mod console;
pub mod controller;
pub mod runtime;
pub mod state;

pub use commands::{parse_user_command, UserCommand, HELP_TEXT};
pub use console::{Console, MemoryConsole, TerminalConsole};
pub use controller::Controller;
pub use runtime::{ControlLoop, LoopOptions};
pub use state::{ControllerState, RunReport, StartTrigger};
