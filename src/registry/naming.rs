// src/registry/naming.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::task::TaskCommand;

/// Shell-ish tokens: double-quoted, single-quoted, or bare words.
static SHELL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'|(\S+)"#).expect("static shell token regex is valid")
});

/// Humanize a script stem: `fcc_missing_data` -> `Fcc Missing Data`,
/// `PendingDriverJobs` -> `Pending Driver Jobs`.
///
/// Underscores become spaces, every interior ASCII capital starts a new
/// word, and each word is capitalised with the rest lower-cased.
pub fn pretty_name(stem: &str) -> String {
    let underscored = stem.replace('_', " ");
    let trimmed = underscored.trim();

    let mut spaced = String::with_capacity(trimmed.len() + 8);
    for (i, ch) in trimmed.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// File name of the script a command runs, if any.
///
/// Looks at the last argument (or shell token) ending in `.<extension>`,
/// case-insensitively, and returns only its final path segment.
pub fn find_script_name(command: &TaskCommand, extension: &str) -> Option<String> {
    let suffix = format!(".{}", extension.to_lowercase());
    let is_script = |candidate: &str| candidate.to_lowercase().ends_with(&suffix);

    match command {
        TaskCommand::Argv(parts) => parts
            .iter()
            .rev()
            .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
            .find(|part| is_script(part))
            .map(final_segment),
        TaskCommand::ShellLine(line) => SHELL_TOKEN
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).or(caps.get(2)).or(caps.get(3)))
            .map(|m| m.as_str().trim_end_matches([';', '&', '|', ')']))
            .filter(|token| is_script(token))
            .last()
            .map(final_segment),
    }
}

fn final_segment(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizes_snake_and_camel_case() {
        assert_eq!(pretty_name("fcc_missing_data"), "Fcc Missing Data");
        assert_eq!(pretty_name("PendingDriverJobs"), "Pending Driver Jobs");
        assert_eq!(pretty_name("_report__v2_"), "Report V2");
        assert_eq!(pretty_name("mixedCase_name"), "Mixed Case Name");
        assert_eq!(pretty_name(""), "");
    }

    #[test]
    fn finds_script_in_argv() {
        let cmd = TaskCommand::Argv(vec![
            "/usr/bin/python3".into(),
            " \"tools/Helper.PY\" ".into(),
            "--fast".into(),
        ]);
        assert_eq!(find_script_name(&cmd, "py"), Some("Helper.PY".to_string()));

        let none = TaskCommand::Argv(vec!["echo".into(), "hi".into()]);
        assert_eq!(find_script_name(&none, "py"), None);
    }

    #[test]
    fn finds_last_script_in_shell_line() {
        let cmd = TaskCommand::ShellLine(
            "python3 prep.py && python3 'C:\\jobs\\my scan.py' | tee out.log".into(),
        );
        assert_eq!(find_script_name(&cmd, "py"), Some("my scan.py".to_string()));

        let chained = TaskCommand::ShellLine("python3 sub/run.py;".into());
        assert_eq!(find_script_name(&chained, "py"), Some("run.py".to_string()));
    }
}
