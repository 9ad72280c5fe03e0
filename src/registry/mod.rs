// src/registry/mod.rs

//! Task registry: turns configured records and sibling scripts into an
//! ordered list of immutable [`Task`]s.
//!
//! - [`task`] defines the `Task` descriptor and its command variant.
//! - [`parse`] validates one raw record (`parse_task`).
//! - [`naming`] holds the filename helpers (`pretty_name`,
//!   `find_script_name`).
//! - [`discovery`] combines configured and discovered tasks
//!   (`discover_tasks`).

pub mod discovery;
pub mod naming;
pub mod parse;
pub mod task;

pub use discovery::discover_tasks;
pub use naming::{find_script_name, pretty_name};
pub use parse::{parse_task, resolve_cwd};
pub use task::{Task, TaskCommand, TaskOrigin};
