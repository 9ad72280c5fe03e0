// src/exec/supervisor.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::{Result, TaskCenterError};
use crate::exec::backend::ExecutorBackend;
use crate::exec::task_runner::{run_task, StopRequest};
use crate::registry::Task;
use crate::relay::RelaySender;

/// Live state of the one running task.
#[derive(Debug)]
struct ProcessRun {
    task: String,
    stop_tx: mpsc::UnboundedSender<StopRequest>,
    handle: JoinHandle<()>,
    /// Pending forced-kill timer, armed by the first `cancel()`.
    escalation: Option<JoinHandle<()>>,
}

/// Real executor backend: spawns OS processes, one at a time.
///
/// Each run gets its own Tokio task (see [`run_task`]) which owns the
/// child process and is the only writer into the relay for that run.
#[derive(Debug)]
pub struct ProcessSupervisor {
    relay: RelaySender,
    kill_after: Option<Duration>,
    active: Option<ProcessRun>,
}

impl ProcessSupervisor {
    /// `kill_after`: if set, a run still alive this long after the first
    /// stop request is killed. If `None`, stopping is best-effort only.
    pub fn new(relay: RelaySender, kill_after: Option<Duration>) -> Self {
        Self {
            relay,
            kill_after,
            active: None,
        }
    }

    /// Name of the task occupying the slot, if any.
    pub fn active_task(&self) -> Option<&str> {
        self.active.as_ref().map(|run| run.task.as_str())
    }
}

impl ExecutorBackend for ProcessSupervisor {
    fn execute(&mut self, task: &Task) -> Result<()> {
        if let Some(run) = &self.active {
            debug!(
                requested = %task.name,
                running = %run.task,
                "rejecting start; a task is already running"
            );
            return Err(TaskCenterError::Busy(run.task.clone()));
        }

        info!(task = %task.name, command = %task.command, "launching task");

        let (stop_tx, stop_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_task(task.clone(), self.relay.clone(), stop_rx));

        self.active = Some(ProcessRun {
            task: task.name.clone(),
            stop_tx,
            handle,
            escalation: None,
        });
        Ok(())
    }

    fn cancel(&mut self) -> bool {
        let Some(run) = self.active.as_mut() else {
            return false;
        };

        info!(task = %run.task, "stop requested");
        if run.stop_tx.send(StopRequest::Graceful).is_err() {
            debug!(task = %run.task, "run already finished while cancelling");
        }

        if let Some(after) = self.kill_after {
            if run.escalation.is_none() {
                let stop_tx = run.stop_tx.clone();
                let task = run.task.clone();
                run.escalation = Some(tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    if stop_tx.send(StopRequest::Force).is_ok() {
                        debug!(task = %task, ?after, "escalating stop request to kill");
                    }
                }));
            }
        }

        true
    }

    fn release(&mut self) {
        if let Some(run) = self.active.take() {
            if let Some(escalation) = run.escalation {
                escalation.abort();
            }
            if !run.handle.is_finished() {
                debug!(task = %run.task, "released run whose execution task is still winding down");
            }
            debug!(task = %run.task, "run slot released");
        }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
