use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use taskcenter::registry::{Task, TaskCommand, TaskOrigin};

/// Builder for a ready-made `Task`, bypassing config parsing.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    /// A configured task running `argv` directly.
    pub fn argv(name: &str, argv: &[&str]) -> Self {
        Self::with_command(
            name,
            TaskCommand::Argv(argv.iter().map(|s| s.to_string()).collect()),
        )
    }

    /// A configured task running `line` through the platform shell.
    pub fn shell(name: &str, line: &str) -> Self {
        Self::with_command(name, TaskCommand::ShellLine(line.to_string()))
    }

    fn with_command(name: &str, command: TaskCommand) -> Self {
        Self {
            task: Task {
                name: name.to_string(),
                description: String::new(),
                command,
                cwd: std::env::temp_dir(),
                origin: TaskOrigin::Configured,
            },
        }
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.task.cwd = dir.as_ref().to_path_buf();
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for one loose task record, as it appears in a config file.
pub struct TaskRecordBuilder {
    fields: Map<String, Value>,
}

impl TaskRecordBuilder {
    pub fn new(name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(name));
        Self { fields }
    }

    pub fn command_line(mut self, line: &str) -> Self {
        self.fields.insert("command".into(), json!(line));
        self
    }

    pub fn command_parts(mut self, parts: &[&str]) -> Self {
        self.fields.insert("command".into(), json!(parts));
        self
    }

    /// Set an arbitrary field, e.g. to feed a wrongly-typed value.
    pub fn raw(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Write `records` as a JSON config file at `dir/name` and return its path.
pub fn write_json_config(dir: &Path, name: &str, records: &[Value]) -> PathBuf {
    let path = dir.join(name);
    let body = json!({ "tasks": records });
    std::fs::write(&path, body.to_string()).expect("write config");
    path
}

/// Create empty files named `names` under `dir`.
pub fn touch_all(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), "").expect("touch file");
    }
}
