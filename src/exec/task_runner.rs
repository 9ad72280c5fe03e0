// src/exec/task_runner.rs

//! The execution task for a single run.

use tokio::process::Child;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::exec::command::{exit_code, force_kill, request_termination, spawn_child};
use crate::registry::Task;
use crate::relay::RelaySender;

/// Exit code reported when the process could not be started or waited on.
pub const LAUNCH_FAILURE_CODE: i32 = -1;

/// Stop requests sent from the supervisor to a running execution task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRequest {
    /// SIGTERM; the child may ignore it.
    Graceful,
    /// Kill outright.
    Force,
}

/// Run one task to completion, relaying its output.
///
/// This is the only producer into the relay for this run. It emits every
/// output line as soon as it is read and then exactly one `Completed`
/// event, after the output pipe has closed:
///
/// - spawn failure: one `[ERROR]` line, then `Completed` with
///   [`LAUNCH_FAILURE_CODE`];
/// - otherwise: all lines, then `Completed` with the real exit code.
///
/// Stop requests are honoured while reading and while waiting.
pub async fn run_task(
    task: Task,
    relay: RelaySender,
    mut stop_rx: mpsc::UnboundedReceiver<StopRequest>,
) {
    let (mut child, pipe) = match spawn_child(&task) {
        Ok(spawned) => spawned,
        Err(err) => {
            error!(task = %task.name, error = %format!("{err:#}"), "failed to start task process");
            relay.line(format!("[ERROR] Failed to start task: {err:#}"));
            relay.completed(&task.name, LAUNCH_FAILURE_CODE);
            return;
        }
    };

    info!(
        task = %task.name,
        pid = child.id(),
        cwd = %task.cwd.display(),
        "task process started"
    );

    let mut output = pipe.into_lines();
    let mut lines = 0usize;

    loop {
        tokio::select! {
            line = output.next_line() => match line {
                Some(line) => {
                    lines += 1;
                    if !relay.line(line) {
                        debug!(task = %task.name, "relay consumer gone; output discarded");
                    }
                }
                None => break,
            },
            Some(request) = stop_rx.recv() => handle_stop(&mut child, &task, request),
        }
    }

    debug!(task = %task.name, lines, "process output drained");

    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            Some(request) = stop_rx.recv() => handle_stop(&mut child, &task, request),
        }
    };

    let code = match status {
        Ok(status) => {
            let code = exit_code(status);
            info!(
                task = %task.name,
                exit_code = code,
                success = status.success(),
                "task process exited"
            );
            code
        }
        Err(err) => {
            error!(task = %task.name, error = %err, "waiting for task process failed");
            LAUNCH_FAILURE_CODE
        }
    };

    relay.completed(&task.name, code);
}

fn handle_stop(child: &mut Child, task: &Task, request: StopRequest) {
    let result = match request {
        StopRequest::Graceful => {
            info!(task = %task.name, "sending graceful termination request");
            request_termination(child)
        }
        StopRequest::Force => {
            warn!(task = %task.name, "task ignored termination request; killing process group");
            force_kill(child)
        }
    };

    if let Err(err) = result {
        // Usually the process exited between the request and the signal.
        warn!(task = %task.name, ?request, error = %err, "could not signal task process");
    }
}
