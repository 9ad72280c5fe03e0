// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod relay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, CliCommand};
use crate::config::{load_or_default, Settings};
use crate::context::AppContext;
use crate::engine::{
    parse_user_command, ControlLoop, Controller, Console, LoopOptions, TerminalConsole,
    UserCommand, HELP_TEXT,
};
use crate::errors::TaskCenterError;
use crate::exec::ProcessSupervisor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::registry::{discover_tasks, Task};

/// Everything resolved at startup: the project context and the task list.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub ctx: AppContext,
    pub tasks: Vec<Task>,
}

/// Load the config (degrading to defaults), resolve the project root and
/// build the task list.
///
/// Only an unusable project root is an error; a missing or broken config
/// file leaves just the discovered scripts.
pub fn bootstrap(
    config_path: &Path,
    project_dir: Option<&Path>,
    self_name: Option<String>,
    fs: &dyn FileSystem,
) -> Result<Bootstrap> {
    let raw = load_or_default(fs, config_path);

    let settings = match Settings::try_from(raw.config) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "invalid [config] section; using defaults");
            Settings::default()
        }
    };

    let project_dir = match project_dir {
        Some(dir) => dir.to_path_buf(),
        None => config_root_dir(config_path),
    };
    let project_dir = fs
        .canonicalize(&project_dir)
        .with_context(|| format!("resolving project directory {}", project_dir.display()))?;

    let ctx = AppContext::new(project_dir, settings, self_name);
    let tasks = discover_tasks(&ctx, &raw.tasks, fs);
    info!(
        project_dir = %ctx.project_dir.display(),
        tasks = tasks.len(),
        "task list ready"
    );

    Ok(Bootstrap { ctx, tasks })
}

/// High-level entry point used by `main.rs`. Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let self_name = args.self_name.clone().or_else(current_exe_name);
    let boot = bootstrap(
        &args.config,
        args.project_dir.as_deref(),
        self_name,
        &RealFileSystem,
    )?;

    match args.command.unwrap_or(CliCommand::Interactive) {
        CliCommand::List => {
            print_task_list(&boot.tasks);
            Ok(0)
        }
        CliCommand::Run { task } => run_single(boot, &task).await,
        CliCommand::Interactive => run_interactive(boot).await,
    }
}

/// Start one task, stream it to completion, and map its exit code:
/// `0` stays `0`, anything else becomes `1`.
async fn run_single(boot: Bootstrap, selector: &str) -> Result<i32> {
    let poll_interval = boot.ctx.settings.poll_interval;
    let mut controller = build_controller(boot, TerminalConsole::new(false));

    let index = controller
        .find_trigger(selector)
        .ok_or_else(|| TaskCenterError::TaskNotFound(selector.to_string()))?;
    controller.start(index)?;

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    spawn_interrupt_listener(cmd_tx);

    let options = LoopOptions {
        poll_interval,
        exit_when_idle: true,
    };
    let reports = ControlLoop::new(controller, cmd_rx, options).run().await?;

    let code = match reports.last() {
        Some(report) if report.success() => 0,
        _ => 1,
    };
    debug!(code, "single run finished");
    Ok(code)
}

async fn run_interactive(boot: Bootstrap) -> Result<i32> {
    let poll_interval = boot.ctx.settings.poll_interval;
    let task_count = boot.tasks.len();
    let mut controller = build_controller(boot, TerminalConsole::new(true));

    let console = controller.console_mut();
    console.append("Task center started.", relay::LineCategory::Info);
    if task_count == 0 {
        console.append(
            "No tasks were found. Add scripts or update the task config.",
            relay::LineCategory::Plain,
        );
    } else {
        console.append(
            &format!("{task_count} task(s) loaded. Type 'list' to see them."),
            relay::LineCategory::Plain,
        );
    }
    for line in HELP_TEXT {
        console.append(line, relay::LineCategory::Plain);
    }

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(cmd_tx.clone())?;
    spawn_interrupt_listener(cmd_tx);

    let options = LoopOptions {
        poll_interval,
        exit_when_idle: false,
    };
    ControlLoop::new(controller, cmd_rx, options).run().await?;
    Ok(0)
}

fn build_controller<C: Console>(boot: Bootstrap, console: C) -> Controller<ProcessSupervisor, C> {
    let (relay_tx, relay_rx) = relay::channel();
    let supervisor = ProcessSupervisor::new(relay_tx, boot.ctx.settings.kill_after);
    Controller::new(boot.tasks, supervisor, relay_rx, console)
}

fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found. Add scripts or update the task config.");
        return;
    }
    for (i, task) in tasks.iter().enumerate() {
        for line in task.describe(i + 1) {
            println!("{line}");
        }
    }
}

/// Ctrl-C → `Interrupt`, for as long as the loop listens.
fn spawn_interrupt_listener(tx: mpsc::UnboundedSender<UserCommand>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            if tx.send(UserCommand::Interrupt).is_err() {
                return;
            }
        }
    });
}

/// Blocking stdin lines on a plain thread, forwarded as commands.
/// Dropping the sender at EOF lets the loop quit.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<UserCommand>) -> Result<()> {
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            use std::io::BufRead;
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "stdin read failed; no more commands");
                        break;
                    }
                };
                if let Some(cmd) = parse_user_command(&line) {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(())
}

/// Figure out a sensible project root.
///
/// - If the config path has a non-empty parent (e.g. "configs/Taskcenter.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Taskcenter.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn current_exe_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.file_name()?.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn config_root_dir_uses_parent_when_present() {
        assert_eq!(
            config_root_dir(Path::new("configs/Taskcenter.toml")),
            PathBuf::from("configs")
        );
    }

    #[test]
    fn bootstrap_merges_configured_and_discovered_tasks() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/proj/Taskcenter.toml",
            r#"
[[tasks]]
name = "Build"
command = ["{interpreter}", "build.py"]
"#,
        );
        fs.add_file("/proj/build.py", "");
        fs.add_file("/proj/clean_cache.py", "");

        let boot = bootstrap(Path::new("/proj/Taskcenter.toml"), None, None, &fs).unwrap();
        let names: Vec<&str> = boot.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Build", "Clean Cache"]);
        assert_eq!(boot.ctx.project_dir, PathBuf::from("/proj"));
    }

    #[test]
    fn bootstrap_fails_on_missing_project_dir() {
        let fs = MockFileSystem::new();
        let err = bootstrap(
            Path::new("Taskcenter.toml"),
            Some(Path::new("/nowhere")),
            None,
            &fs,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("/nowhere"));
    }
}
