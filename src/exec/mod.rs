// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running task commands, using
//! `tokio::process::Command`, and reporting back to the controller through
//! the output relay.
//!
//! - [`backend`] provides the `ExecutorBackend` trait the controller drives.
//! - [`supervisor`] is the production backend (`ProcessSupervisor`), which
//!   owns the single run slot.
//! - [`task_runner`] is the per-run execution task.
//! - [`command`] builds child commands and signals them.
//! - [`output`] reads the child's combined stdout/stderr pipe as lines.

pub mod backend;
pub mod command;
pub mod output;
pub mod supervisor;
pub mod task_runner;

pub use backend::ExecutorBackend;
pub use supervisor::ProcessSupervisor;
pub use task_runner::{StopRequest, LAUNCH_FAILURE_CODE};
