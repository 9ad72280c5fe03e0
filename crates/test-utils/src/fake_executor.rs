use std::sync::{Arc, Mutex};

use taskcenter::errors::{Result, TaskCenterError};
use taskcenter::exec::ExecutorBackend;
use taskcenter::registry::Task;
use taskcenter::relay::RelaySender;

/// What the fake backend observed.
#[derive(Debug, Default, Clone)]
pub struct FakeLog {
    pub started: Vec<String>,
    pub cancels: usize,
    pub releases: usize,
}

/// A fake executor that:
/// - records which tasks were started and how often cancel was called
/// - relays a scripted set of lines for every run
/// - either completes immediately with `exit_code`, or (when `hold` is set)
///   stays running until cancelled, then completes with `cancel_code`.
pub struct FakeBackend {
    relay: RelaySender,
    log: Arc<Mutex<FakeLog>>,
    lines: Vec<String>,
    exit_code: i32,
    hold: bool,
    cancel_code: i32,
    active: Option<String>,
    completion_sent: bool,
}

impl FakeBackend {
    pub fn new(relay: RelaySender, log: Arc<Mutex<FakeLog>>) -> Self {
        Self {
            relay,
            log,
            lines: Vec::new(),
            exit_code: 0,
            hold: false,
            cancel_code: -15,
            active: None,
            completion_sent: false,
        }
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Keep runs alive until `cancel`.
    pub fn holding(mut self) -> Self {
        self.hold = true;
        self
    }
}

impl ExecutorBackend for FakeBackend {
    fn execute(&mut self, task: &Task) -> Result<()> {
        if let Some(running) = &self.active {
            return Err(TaskCenterError::Busy(running.clone()));
        }
        self.log.lock().unwrap().started.push(task.name.clone());
        self.active = Some(task.name.clone());

        for line in &self.lines {
            self.relay.line(line.clone());
        }
        self.completion_sent = !self.hold;
        if !self.hold {
            self.relay.completed(task.name.clone(), self.exit_code);
        }
        Ok(())
    }

    fn cancel(&mut self) -> bool {
        let Some(running) = &self.active else {
            return false;
        };
        self.log.lock().unwrap().cancels += 1;
        if !self.completion_sent {
            self.relay.completed(running.clone(), self.cancel_code);
            self.completion_sent = true;
        }
        true
    }

    fn release(&mut self) {
        self.log.lock().unwrap().releases += 1;
        self.active = None;
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
