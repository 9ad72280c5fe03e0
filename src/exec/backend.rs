// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The controller talks to an `ExecutorBackend` instead of spawning
//! processes itself. Production uses [`ProcessSupervisor`]; tests can
//! provide a backend that scripts output events without real processes.
//!
//! [`ProcessSupervisor`]: crate::exec::ProcessSupervisor

use crate::errors::Result;
use crate::registry::Task;

/// Trait abstracting how a task is run.
///
/// Implementations report everything about a run (output lines and the
/// final completion) through the relay sender they were built with.
pub trait ExecutorBackend: Send {
    /// Start the task.
    ///
    /// Fails with [`TaskCenterError::Busy`] and starts nothing if a run is
    /// already active.
    ///
    /// [`TaskCenterError::Busy`]: crate::errors::TaskCenterError::Busy
    fn execute(&mut self, task: &Task) -> Result<()>;

    /// Ask the active run to stop. Returns `false` and does nothing when
    /// no run is active.
    fn cancel(&mut self) -> bool;

    /// Forget the active run; called once its completion has been consumed.
    fn release(&mut self);

    /// Whether a run currently occupies the slot.
    fn is_active(&self) -> bool;
}
