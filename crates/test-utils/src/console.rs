use std::sync::{Arc, Mutex};

use taskcenter::engine::{Console, ControllerState};
use taskcenter::relay::LineCategory;

/// What a [`RecordingConsole`] saw.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    pub lines: Vec<(String, LineCategory)>,
    pub warnings: Vec<String>,
    pub states: Vec<ControllerState>,
}

impl Transcript {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|(text, _)| text.as_str()).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|(line, _)| line == text)
    }

    pub fn category_of(&self, text: &str) -> Option<LineCategory> {
        self.lines
            .iter()
            .find(|(line, _)| line == text)
            .map(|(_, category)| *category)
    }
}

/// Console whose transcript outlives the controller that owns it, so tests
/// can inspect it after a control loop has consumed the controller.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    transcript: Arc<Mutex<Transcript>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Transcript {
        self.transcript.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn append(&mut self, text: &str, category: LineCategory) {
        self.transcript
            .lock()
            .unwrap()
            .lines
            .push((text.to_string(), category));
    }

    fn warn(&mut self, message: &str) {
        self.transcript
            .lock()
            .unwrap()
            .warnings
            .push(message.to_string());
    }

    fn state_changed(&mut self, state: &ControllerState) {
        self.transcript.lock().unwrap().states.push(state.clone());
    }
}
