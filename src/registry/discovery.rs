// src/registry/discovery.rs

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::RawTask;
use crate::context::AppContext;
use crate::fs::FileSystem;
use crate::registry::naming::{find_script_name, pretty_name};
use crate::registry::parse::parse_task;
use crate::registry::task::{Task, TaskCommand, TaskOrigin};

/// Build the full, ordered task list.
///
/// Configured records come first, in file order, minus any that fail
/// validation. Then, unless discovery is disabled, every sibling script in
/// the project root that no configured task already runs is appended in
/// filename order.
pub fn discover_tasks(ctx: &AppContext, records: &[Value], fs: &dyn FileSystem) -> Vec<Task> {
    let mut tasks: Vec<Task> = records
        .iter()
        .filter_map(|value| {
            let raw = RawTask::from_value(value);
            if raw.is_none() {
                debug!(%value, "dropping task record that is not a table");
            }
            raw
        })
        .filter_map(|raw| parse_task(&raw, ctx, fs))
        .collect();

    let configured = tasks.len();

    if ctx.settings.discover_scripts {
        let referenced = referenced_scripts(&tasks, ctx.script_extension());
        tasks.extend(scan_scripts(ctx, fs, &referenced));
    }

    info!(
        configured,
        discovered = tasks.len() - configured,
        "task registry loaded"
    );

    tasks
}

/// Lower-cased file names of every script a task command already runs.
pub fn referenced_scripts(tasks: &[Task], extension: &str) -> HashSet<String> {
    tasks
        .iter()
        .filter_map(|task| find_script_name(&task.command, extension))
        .map(|name| name.to_lowercase())
        .collect()
}

fn scan_scripts(ctx: &AppContext, fs: &dyn FileSystem, referenced: &HashSet<String>) -> Vec<Task> {
    let entries = match fs.read_dir(&ctx.project_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                dir = %ctx.project_dir.display(),
                error = %err,
                "could not scan project directory for scripts"
            );
            return Vec::new();
        }
    };

    let extension = ctx.script_extension();
    let mut scripts: Vec<(String, String)> = entries
        .iter()
        .filter(|path| fs.is_file(path))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .filter_map(|path| {
            let file_name = path.file_name()?.to_str()?.to_string();
            let stem = path.file_stem()?.to_str()?.to_string();
            Some((file_name, stem))
        })
        .filter(|(file_name, _)| ctx.self_name.as_deref() != Some(file_name.as_str()))
        .filter(|(file_name, _)| {
            let already = referenced.contains(&file_name.to_lowercase());
            if already {
                debug!(script = %file_name, "script already configured; not adding it twice");
            }
            !already
        })
        .collect();

    scripts.sort();

    scripts
        .into_iter()
        .map(|(file_name, stem)| Task {
            name: pretty_name(&stem),
            description: format!("Run {file_name}"),
            command: TaskCommand::Argv(vec![ctx.interpreter().to_string(), file_name]),
            cwd: ctx.project_dir.clone(),
            origin: TaskOrigin::Discovered,
        })
        .collect()
}
