// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `taskcenter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskcenter",
    version,
    about = "Run project scripts one at a time and watch their output live.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task config file (TOML, or JSON if it ends in `.json`).
    ///
    /// A missing or broken file is not an error: only discovered scripts
    /// are offered.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Project root used for `{project_dir}`, relative `cwd` values and
    /// script discovery. Defaults to the config file's directory.
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// File name never offered as a discovered script. Defaults to this
    /// executable's file name.
    #[arg(long, value_name = "NAME")]
    pub self_name: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKCENTER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Print the task list and exit.
    List,
    /// Run one task, stream its output, and exit with its status.
    Run {
        /// Task number (as shown by `list`) or name.
        task: String,
    },
    /// Read commands from stdin (the default).
    Interactive,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_with_default_config() {
        let args = CliArgs::try_parse_from(["taskcenter"]).unwrap();
        assert_eq!(args.config, PathBuf::from("Taskcenter.toml"));
        assert!(args.command.is_none());
    }

    #[test]
    fn run_takes_a_task_selector() {
        let args = CliArgs::try_parse_from([
            "taskcenter",
            "--config",
            "tasks.json",
            "--log-level",
            "debug",
            "run",
            "Build",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("tasks.json"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        match args.command {
            Some(CliCommand::Run { task }) => assert_eq!(task, "Build"),
            other => panic!("expected run, got {other:?}"),
        }
    }
}
