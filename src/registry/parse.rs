// src/registry/parse.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{RawCommand, RawTask};
use crate::context::AppContext;
use crate::fs::FileSystem;
use crate::registry::task::{Task, TaskCommand, TaskOrigin};

const DEFAULT_CWD: &str = "{project_dir}";

/// Validate one raw record into a `Task`.
///
/// Returns `None` for records missing a usable `name` or `command`; this
/// never fails otherwise. Placeholders are expanded in `description`,
/// `command` and `cwd` before anything else looks at them.
pub fn parse_task(raw: &RawTask, ctx: &AppContext, fs: &dyn FileSystem) -> Option<Task> {
    let name = raw.name.as_deref().unwrap_or("").trim();
    if name.is_empty() {
        debug!(?raw, "dropping task record without a name");
        return None;
    }

    let Some(command) = parse_command(raw.command.as_ref(), ctx) else {
        debug!(task = %name, "dropping task record without a usable command");
        return None;
    };

    let description = raw
        .description
        .as_deref()
        .map(|d| ctx.expand_placeholders(d).trim().to_string())
        .unwrap_or_default();

    let raw_cwd = raw.cwd.as_deref().unwrap_or(DEFAULT_CWD);
    let cwd = resolve_cwd(&ctx.expand_placeholders(raw_cwd), &ctx.project_dir, fs);

    Some(Task {
        name: name.to_string(),
        description,
        command,
        cwd,
        origin: TaskOrigin::Configured,
    })
}

fn parse_command(raw: Option<&RawCommand>, ctx: &AppContext) -> Option<TaskCommand> {
    match raw? {
        RawCommand::Line(line) => {
            if line.trim().is_empty() {
                return None;
            }
            Some(TaskCommand::ShellLine(ctx.expand_placeholders(line)))
        }
        RawCommand::Parts(parts) => {
            let argv: Vec<String> = parts
                .iter()
                .filter(|part| !part.trim().is_empty())
                .map(|part| ctx.expand_placeholders(part))
                .collect();
            if argv.is_empty() {
                None
            } else {
                Some(TaskCommand::Argv(argv))
            }
        }
    }
}

/// Resolve an already-expanded `cwd` value.
///
/// Relative paths are joined onto `project_dir`; the result is
/// canonicalized, and anything that is not an existing directory falls
/// back to `project_dir` itself.
pub fn resolve_cwd(value: &str, project_dir: &Path, fs: &dyn FileSystem) -> PathBuf {
    let candidate = Path::new(value.trim());
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project_dir.join(candidate)
    };

    match fs.canonicalize(&joined) {
        Ok(resolved) if fs.is_dir(&resolved) => resolved,
        _ => {
            debug!(cwd = %joined.display(), "cwd does not exist; using project root");
            project_dir.to_path_buf()
        }
    }
}
