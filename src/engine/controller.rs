// src/engine/controller.rs

//! The controller state machine.
//!
//! `Ready --start--> Running --completion--> Ready`. A start while running
//! is rejected with a warning; a cancel while ready is ignored; a cancel
//! while running is only a request, and the state changes when the
//! completion event actually arrives.
//!
//! The controller never blocks: [`Controller::tick`] drains whatever the
//! relay holds right now and returns.

use tracing::{debug, info, warn};

use crate::engine::console::Console;
use crate::engine::state::{ControllerState, RunReport, StartTrigger};
use crate::errors::{Result, TaskCenterError};
use crate::exec::ExecutorBackend;
use crate::registry::Task;
use crate::relay::{LineCategory, OutputEvent, RelayReceiver};

pub const BUSY_WARNING: &str = "A task is already running. Stop it first.";
pub const STOP_REQUESTED: &str = "[INFO] Stop requested. Terminating task...";

pub struct Controller<E: ExecutorBackend, C: Console> {
    triggers: Vec<StartTrigger>,
    cancel_enabled: bool,
    state: ControllerState,
    last_report: Option<RunReport>,
    backend: E,
    relay: RelayReceiver,
    console: C,
}

impl<E: ExecutorBackend, C: Console> std::fmt::Debug for Controller<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("tasks", &self.triggers.len())
            .field("cancel_enabled", &self.cancel_enabled)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend, C: Console> Controller<E, C> {
    /// Build the controller with one start trigger per task, in order.
    ///
    /// `relay` must be the receiving end of the relay `backend` reports to.
    pub fn new(tasks: Vec<Task>, backend: E, relay: RelayReceiver, console: C) -> Self {
        let triggers = tasks
            .into_iter()
            .map(|task| StartTrigger { task, enabled: true })
            .collect();

        Self {
            triggers,
            cancel_enabled: false,
            state: ControllerState::Ready,
            last_report: None,
            backend,
            relay,
            console,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn triggers(&self) -> &[StartTrigger] {
        &self.triggers
    }

    pub fn cancel_enabled(&self) -> bool {
        self.cancel_enabled
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Resolve a user selector: a 1-based position, or a task name
    /// (case-insensitive).
    pub fn find_trigger(&self, selector: &str) -> Option<usize> {
        let selector = selector.trim();
        if let Ok(n) = selector.parse::<usize>() {
            if (1..=self.triggers.len()).contains(&n) {
                return Some(n - 1);
            }
        }
        self.triggers
            .iter()
            .position(|t| t.task.name.eq_ignore_ascii_case(selector))
    }

    /// `Ready --start--> Running`.
    ///
    /// Rejected with [`TaskCenterError::Busy`] (and a console warning) while a
    /// task is running; the running task is unaffected.
    pub fn start(&mut self, index: usize) -> Result<()> {
        if let ControllerState::Running { task } = &self.state {
            warn!(running = %task, "start rejected; a task is already running");
            self.console.warn(BUSY_WARNING);
            return Err(TaskCenterError::Busy(task.clone()));
        }

        let Some(trigger) = self.triggers.get(index) else {
            return Err(TaskCenterError::TaskNotFound(format!("#{}", index + 1)));
        };
        let task = trigger.task.clone();

        if let Err(err) = self.backend.execute(&task) {
            if matches!(err, TaskCenterError::Busy(_)) {
                self.console.warn(BUSY_WARNING);
            }
            return Err(err);
        }

        info!(task = %task.name, "task started");

        self.console.append("", LineCategory::Plain);
        self.console
            .append(&format!("=== {} ===", task.name), LineCategory::Plain);
        self.console.append(
            &format!("Working directory: {}", task.cwd.display()),
            LineCategory::Plain,
        );
        self.console
            .append(&format!("Command: {}", task.command), LineCategory::Plain);
        self.console.append("", LineCategory::Plain);

        self.set_state(ControllerState::Running { task: task.name });
        Ok(())
    }

    /// Request that the running task stop. A no-op returning `false` when
    /// ready. The state does not change here.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_running() {
            debug!("cancel ignored; nothing is running");
            return false;
        }

        self.console.append("", LineCategory::Plain);
        self.console.append(STOP_REQUESTED, LineCategory::Info);
        if !self.backend.cancel() {
            debug!("backend had no active run to cancel");
        }
        true
    }

    /// Drain the relay, render lines, and apply completions.
    ///
    /// Returns the runs that completed during this tick.
    pub fn tick(&mut self) -> Vec<RunReport> {
        let mut reports = Vec::new();

        for event in self.relay.drain() {
            match event {
                OutputEvent::Line { text, category } => self.console.append(&text, category),
                OutputEvent::Completed { task, exit_code } => {
                    reports.push(self.complete(task, exit_code));
                }
            }
        }

        reports
    }

    /// `Running --completion--> Ready`.
    fn complete(&mut self, task: String, exit_code: i32) -> RunReport {
        let report = RunReport { task, exit_code };
        info!(task = %report.task, exit_code, "task finished");

        self.backend.release();

        self.console.append("", LineCategory::Plain);
        self.console.append(&report.summary(), LineCategory::Success);

        self.last_report = Some(report.clone());
        self.set_state(ControllerState::Ready);
        report
    }

    fn set_state(&mut self, state: ControllerState) {
        let running = state.is_running();
        for trigger in &mut self.triggers {
            trigger.enabled = !running;
        }
        self.cancel_enabled = running;
        self.state = state;
        self.console.state_changed(&self.state);
    }
}
