// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::model::RawConfigFile;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// Files ending in `.json` are parsed as JSON (the `{"tasks": [...]}` shape);
/// everything else is parsed as TOML. No task validation happens here.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;

    let config: RawConfigFile = if is_json(path) {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };

    Ok(config)
}

/// Load the task configuration, degrading to an empty config on any error.
///
/// A missing or malformed file never aborts startup: the caller simply gets
/// no configured tasks (and default `[config]` values), and discovery still
/// runs.
pub fn load_or_default(fs: &dyn FileSystem, path: impl AsRef<Path>) -> RawConfigFile {
    let path = path.as_ref();

    if !fs.exists(path) {
        info!(path = %path.display(), "no task config found; using discovered scripts only");
        return RawConfigFile::default();
    }

    match load_from_path(fs, path) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "task config is unreadable or malformed; ignoring it"
            );
            RawConfigFile::default()
        }
    }
}

/// Default config path: `Taskcenter.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskcenter.toml")
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn toml_and_json_sources_carry_the_same_records() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/p/Taskcenter.toml",
            r#"
[config]
poll_interval_ms = 50

[[tasks]]
name = "Build"
command = ["echo", "hi"]
"#,
        );
        fs.add_file(
            "/p/tasks.json",
            r#"{"config": {"poll_interval_ms": 50},
                "tasks": [{"name": "Build", "command": ["echo", "hi"]}]}"#,
        );

        let from_toml = load_from_path(&fs, "/p/Taskcenter.toml").unwrap();
        let from_json = load_from_path(&fs, "/p/tasks.json").unwrap();

        assert_eq!(from_toml.tasks, from_json.tasks);
        assert_eq!(from_toml.config.poll_interval_ms, 50);
        assert_eq!(from_json.config.poll_interval_ms, 50);
    }

    #[test]
    fn singular_task_table_is_accepted() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/Taskcenter.toml", "[[task]]\nname = \"A\"\ncommand = \"true\"\n");

        let cfg = load_from_path(&fs, "/p/Taskcenter.toml").unwrap();
        assert_eq!(cfg.tasks.len(), 1);
    }

    #[test]
    fn missing_or_malformed_config_degrades_to_empty() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/broken.toml", "[[tasks]\nname = ");
        fs.add_file("/p/wrong_shape.json", r#"{"tasks": {"name": "A"}}"#);

        assert!(load_or_default(&fs, "/p/absent.toml").tasks.is_empty());
        assert!(load_or_default(&fs, "/p/broken.toml").tasks.is_empty());
        assert!(load_or_default(&fs, "/p/wrong_shape.json").tasks.is_empty());
    }
}
