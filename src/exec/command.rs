// src/exec/command.rs

//! Building child processes for tasks and talking to them afterwards.

use std::io;
use std::process::{ExitStatus, Stdio};

use anyhow::{bail, Context, Result};
use tokio::process::{Child, Command};

use crate::exec::output::OutputPipe;
use crate::registry::{Task, TaskCommand};

/// Build the OS command for a task.
///
/// `Argv` commands are executed directly. `ShellLine` commands go through
/// `sh -c` (or `cmd /C` on Windows). stdin is closed so a child waiting for
/// input sees EOF instead of hanging. On unix the child leads its own
/// process group, so stop requests reach everything it forks.
///
/// Output wiring is left to [`spawn_child`].
pub fn build_command(task: &Task) -> Result<Command> {
    let mut cmd = match &task.command {
        TaskCommand::Argv(parts) => {
            let Some((program, args)) = parts.split_first() else {
                bail!("task '{}' has an empty argument vector", task.name);
            };
            let mut c = Command::new(program);
            c.args(args);
            c
        }
        TaskCommand::ShellLine(line) => {
            if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(line);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(line);
                c
            }
        }
    };

    cmd.current_dir(&task.cwd)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    Ok(cmd)
}

/// Build and spawn the child process for a task.
///
/// stdout and stderr share one OS pipe, so the returned reader sees the
/// child's output in the order it was written.
pub fn spawn_child(task: &Task) -> Result<(Child, OutputPipe)> {
    let mut cmd = build_command(task)?;

    let (reader, writer) = io::pipe().context("creating output pipe")?;
    let stderr_writer = writer
        .try_clone()
        .context("duplicating output pipe for stderr")?;
    cmd.stdout(writer).stderr(stderr_writer);

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", task.name))?;

    // The command still holds our copies of the write end; EOF only
    // arrives once they are closed.
    drop(cmd);

    let pipe = OutputPipe::open(reader).context("attaching to output pipe")?;
    Ok((child, pipe))
}

/// Ask the child's process group to exit (SIGTERM). It may ignore it.
#[cfg(unix)]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    signal_group(child, libc::SIGTERM)
}

/// Windows has no graceful equivalent for arbitrary console processes, so
/// this terminates the child.
#[cfg(not(unix))]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

/// Kill the child's whole process group (SIGKILL).
#[cfg(unix)]
pub fn force_kill(child: &mut Child) -> io::Result<()> {
    signal_group(child, libc::SIGKILL)
}

#[cfg(not(unix))]
pub fn force_kill(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

#[cfg(unix)]
fn signal_group(child: &Child, signal: libc::c_int) -> io::Result<()> {
    // Already reaped.
    let Some(pid) = child.id() else {
        return Ok(());
    };

    // SAFETY: `kill` has no memory-safety preconditions. The child leads its
    // own group (`process_group(0)`) and has not been waited on, so the
    // group id is still ours.
    let rc = unsafe { libc::kill(-(pid as libc::pid_t), signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Exit code to report for a finished process.
///
/// Processes killed by a signal report the negated signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TaskOrigin;
    use std::path::PathBuf;

    fn task(command: TaskCommand) -> Task {
        Task {
            name: "T".into(),
            description: String::new(),
            command,
            cwd: PathBuf::from("."),
            origin: TaskOrigin::Configured,
        }
    }

    #[test]
    fn argv_runs_program_directly() {
        let cmd = build_command(&task(TaskCommand::Argv(vec!["echo".into(), "a b".into()]))).unwrap();
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "echo");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, vec!["a b"]);
    }

    #[cfg(unix)]
    #[test]
    fn shell_line_goes_through_sh() {
        let cmd = build_command(&task(TaskCommand::ShellLine("ls | wc -l".into()))).unwrap();
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "sh");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, vec!["-c", "ls | wc -l"]);
    }

    #[test]
    fn empty_argv_is_an_error_not_a_panic() {
        assert!(build_command(&task(TaskCommand::Argv(vec![]))).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn signal_exit_codes_are_negated() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(2 << 8)), 2);
        assert_eq!(exit_code(ExitStatus::from_raw(libc::SIGTERM)), -libc::SIGTERM);
    }
}
