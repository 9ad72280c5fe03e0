// src/engine/commands.rs

//! User commands accepted by the control loop.

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    List,
    /// Start a task by 1-based position or name.
    Start(String),
    Stop,
    Status,
    Help,
    Quit,
    /// Ctrl-C: stop the running task, or quit when ready.
    Interrupt,
    Unknown(String),
}

pub const HELP_TEXT: &[&str] = &[
    "Commands:",
    "  list            show tasks",
    "  run <TASK>      start a task by number or name",
    "  stop            stop the current task",
    "  status          show whether a task is running",
    "  help            show this help",
    "  quit            exit (stops the current task first)",
];

/// Parse one line of interactive input. Blank lines yield `None`.
pub fn parse_user_command(line: &str) -> Option<UserCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "list" | "ls" => UserCommand::List,
        "run" | "start" if !rest.is_empty() => UserCommand::Start(rest.to_string()),
        "stop" | "cancel" => UserCommand::Stop,
        "status" => UserCommand::Status,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        _ => UserCommand::Unknown(line.to_string()),
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(parse_user_command("  "), None);
        assert_eq!(parse_user_command("LIST"), Some(UserCommand::List));
        assert_eq!(
            parse_user_command("run  Pending Driver Jobs "),
            Some(UserCommand::Start("Pending Driver Jobs".into()))
        );
        assert_eq!(parse_user_command("start 2"), Some(UserCommand::Start("2".into())));
        assert_eq!(parse_user_command("stop"), Some(UserCommand::Stop));
        assert_eq!(parse_user_command("exit"), Some(UserCommand::Quit));
    }

    #[test]
    fn run_without_target_is_unknown() {
        assert_eq!(parse_user_command("run"), Some(UserCommand::Unknown("run".into())));
        assert_eq!(
            parse_user_command("dance now"),
            Some(UserCommand::Unknown("dance now".into()))
        );
    }
}
