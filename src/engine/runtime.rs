// src/engine/runtime.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::engine::commands::{UserCommand, HELP_TEXT};
use crate::engine::console::Console;
use crate::engine::controller::Controller;
use crate::engine::state::RunReport;
use crate::errors::{Result, TaskCenterError};
use crate::exec::ExecutorBackend;
use crate::relay::LineCategory;

/// Options for the control loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// How often the relay is drained.
    pub poll_interval: Duration,
    /// Exit as soon as a run completes and the controller is ready again
    /// (used by `taskcenter run`).
    pub exit_when_idle: bool,
}

/// The single-threaded control surface.
///
/// Wakes on a fixed interval to drain process output, and otherwise reacts
/// to user commands. It never waits on a process.
pub struct ControlLoop<E: ExecutorBackend, C: Console> {
    controller: Controller<E, C>,
    commands: mpsc::UnboundedReceiver<UserCommand>,
    options: LoopOptions,
    /// Quit was requested while a task was running; exit once it finishes.
    quitting: bool,
    /// Ctrl-C already requested a stop for the current run.
    interrupted: bool,
}

impl<E: ExecutorBackend, C: Console> ControlLoop<E, C> {
    pub fn new(
        controller: Controller<E, C>,
        commands: mpsc::UnboundedReceiver<UserCommand>,
        options: LoopOptions,
    ) -> Self {
        Self {
            controller,
            commands,
            options,
            quitting: false,
            interrupted: false,
        }
    }

    pub fn controller(&self) -> &Controller<E, C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<E, C> {
        &mut self.controller
    }

    /// Main loop. Returns every run completed while it was active.
    pub async fn run(mut self) -> Result<Vec<RunReport>> {
        info!(poll_interval = ?self.options.poll_interval, "control loop started");

        let mut ticker = time::interval(self.options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut reports = Vec::new();
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let finished = self.controller.tick();
                    if !finished.is_empty() {
                        self.interrupted = false;
                        reports.extend(finished);
                        if self.options.exit_when_idle && !self.controller.state().is_running() {
                            break;
                        }
                    }
                    if self.quitting && !self.controller.state().is_running() {
                        break;
                    }
                }

                cmd = self.commands.recv(), if commands_open => match cmd {
                    Some(cmd) => {
                        debug!(?cmd, "control loop received command");
                        if !self.handle(cmd) {
                            break;
                        }
                    }
                    None => {
                        debug!("command source closed");
                        commands_open = false;
                        if !self.options.exit_when_idle && !self.request_quit() {
                            break;
                        }
                    }
                },
            }
        }

        info!(runs = reports.len(), "control loop exiting");
        Ok(reports)
    }

    /// Apply one user command. Returns `false` to leave the loop now.
    fn handle(&mut self, cmd: UserCommand) -> bool {
        match cmd {
            UserCommand::List => {
                let lines: Vec<String> = self
                    .controller
                    .triggers()
                    .iter()
                    .enumerate()
                    .flat_map(|(i, trigger)| {
                        let mut lines = trigger.task.describe(i + 1);
                        if !trigger.enabled {
                            lines[0].push_str(" (disabled)");
                        }
                        lines
                    })
                    .collect();
                if lines.is_empty() {
                    self.print("No tasks found. Add scripts or update the task config.");
                }
                for line in lines {
                    self.print(&line);
                }
            }
            UserCommand::Start(selector) => match self.controller.find_trigger(&selector) {
                Some(index) => match self.controller.start(index) {
                    Ok(()) | Err(TaskCenterError::Busy(_)) => {}
                    Err(err) => self.controller.console_mut().warn(&err.to_string()),
                },
                None => self
                    .controller
                    .console_mut()
                    .warn(&format!("No task matches '{selector}'.")),
            },
            UserCommand::Stop => {
                self.controller.cancel();
            }
            UserCommand::Status => {
                let line = format!("Status: {}", self.controller.state());
                self.print(&line);
            }
            UserCommand::Help => {
                for line in HELP_TEXT {
                    self.print(line);
                }
            }
            UserCommand::Quit => return self.request_quit(),
            UserCommand::Interrupt => {
                if !self.controller.state().is_running() {
                    return false;
                }
                if self.interrupted {
                    info!("second interrupt; leaving without waiting for the task");
                    return false;
                }
                self.interrupted = true;
                self.controller.cancel();
            }
            UserCommand::Unknown(text) => self
                .controller
                .console_mut()
                .warn(&format!("Unknown command: {text}. Type 'help' for commands.")),
        }
        true
    }

    /// Quit now if ready; otherwise stop the task and quit once it ends.
    /// Returns `false` when the loop should exit immediately.
    fn request_quit(&mut self) -> bool {
        if !self.controller.state().is_running() {
            return false;
        }
        self.quitting = true;
        self.controller.cancel();
        true
    }

    fn print(&mut self, line: &str) {
        self.controller
            .console_mut()
            .append(line, LineCategory::Plain);
    }
}
