// src/config/model.rs

use serde::Deserialize;
use serde_json::Value;

/// Top-level configuration as read from a TOML (or JSON) file.
///
/// ```toml
/// [config]
/// interpreter = "python3"
/// kill_after = "5s"
///
/// [[tasks]]
/// name = "Scan"
/// command = ["{interpreter}", "scan.py"]
/// cwd = "{project_dir}"
/// ```
///
/// Task records are kept as loosely-typed values here so that one bad
/// record can be dropped without failing the whole file; see
/// [`RawTask::from_value`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Ordered task records from `[[tasks]]` (or `[[task]]`).
    #[serde(default, alias = "task")]
    pub tasks: Vec<Value>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Interpreter substituted for `{interpreter}` / `{python}` and used to
    /// run discovered scripts.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Extension (without the dot) of sibling scripts picked up by discovery.
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    /// Assets directory, relative to the project root unless absolute.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Whether to synthesize tasks for unreferenced sibling scripts.
    #[serde(default = "default_discover_scripts")]
    pub discover_scripts: bool,

    /// How often the control loop drains process output.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Optional duration string (e.g. `"5s"`). When set, a task that is
    /// still alive this long after a stop request is killed outright.
    #[serde(default)]
    pub kill_after: Option<String>,
}

fn default_interpreter() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

fn default_script_extension() -> String {
    "py".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_discover_scripts() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    120
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script_extension: default_script_extension(),
            assets_dir: default_assets_dir(),
            discover_scripts: default_discover_scripts(),
            poll_interval_ms: default_poll_interval_ms(),
            kill_after: None,
        }
    }
}

/// One task record with every field optional.
///
/// Nothing here is validated yet; `registry::parse_task` decides whether
/// the record becomes a `Task`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub command: Option<RawCommand>,
    pub cwd: Option<String>,
}

/// The two accepted shapes of `command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCommand {
    /// `command = "make | tee log"`: run through the shell.
    Line(String),
    /// `command = ["python3", "scan.py"]`: run as an argument vector.
    Parts(Vec<String>),
}

impl RawTask {
    /// Read a record out of an arbitrary config value.
    ///
    /// Returns `None` if the value is not a table. Fields of the wrong
    /// shape are left as `None` rather than failing the record here.
    pub fn from_value(value: &Value) -> Option<RawTask> {
        let table = value.as_object()?;

        let command = match table.get("command") {
            Some(Value::String(s)) => Some(RawCommand::Line(s.clone())),
            Some(Value::Array(items)) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Option<Vec<_>>>()
                .map(RawCommand::Parts),
            _ => None,
        };

        Some(RawTask {
            name: table.get("name").and_then(scalar_to_string),
            description: table.get("description").and_then(scalar_to_string),
            command,
            cwd: table.get("cwd").and_then(scalar_to_string),
        })
    }
}

/// Strings pass through; numbers and booleans are stringified; anything
/// else (null, arrays, tables) has no string form.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_argv_and_shell_commands() {
        let argv = RawTask::from_value(&json!({"name": "A", "command": ["echo", 1, true]})).unwrap();
        assert_eq!(
            argv.command,
            Some(RawCommand::Parts(vec!["echo".into(), "1".into(), "true".into()]))
        );

        let line = RawTask::from_value(&json!({"name": "B", "command": "ls | wc -l"})).unwrap();
        assert_eq!(line.command, Some(RawCommand::Line("ls | wc -l".into())));
    }

    #[test]
    fn nested_command_parts_leave_command_unset() {
        let raw = RawTask::from_value(&json!({"name": "A", "command": ["echo", ["x"]]})).unwrap();
        assert_eq!(raw.command, None);
    }

    #[test]
    fn non_table_record_is_not_a_task() {
        assert!(RawTask::from_value(&json!("just a string")).is_none());
        assert!(RawTask::from_value(&json!(42)).is_none());
    }

    #[test]
    fn section_defaults_apply_when_absent() {
        let cfg: RawConfigFile = toml::from_str("").unwrap();
        assert_eq!(cfg.config.poll_interval_ms, 120);
        assert_eq!(cfg.config.script_extension, "py");
        assert!(cfg.config.discover_scripts);
        assert!(cfg.config.kill_after.is_none());
        assert!(cfg.tasks.is_empty());
    }
}
