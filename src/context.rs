// src/context.rs

//! Runtime paths and settings, built once at startup and passed to every
//! component that needs them.

use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Placeholder tokens recognised in task string fields.
pub const INTERPRETER_TOKEN: &str = "interpreter";
pub const PYTHON_TOKEN: &str = "python";
pub const PROJECT_DIR_TOKEN: &str = "project_dir";
pub const ASSETS_DIR_TOKEN: &str = "assets_dir";

#[derive(Debug, Clone)]
pub struct AppContext {
    /// Absolute project root: the config file's directory unless overridden.
    pub project_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub settings: Settings,
    /// File name of the orchestrator itself, never offered as a discovered
    /// task.
    pub self_name: Option<String>,
}

impl AppContext {
    pub fn new(project_dir: PathBuf, settings: Settings, self_name: Option<String>) -> Self {
        let assets_dir = project_dir.join(&settings.assets_dir);
        Self {
            project_dir,
            assets_dir,
            settings,
            self_name,
        }
    }

    pub fn interpreter(&self) -> &str {
        &self.settings.interpreter
    }

    pub fn script_extension(&self) -> &str {
        &self.settings.script_extension
    }

    fn placeholder(&self, token: &str) -> Option<String> {
        match token {
            INTERPRETER_TOKEN | PYTHON_TOKEN => Some(self.settings.interpreter.clone()),
            PROJECT_DIR_TOKEN => Some(path_text(&self.project_dir)),
            ASSETS_DIR_TOKEN => Some(path_text(&self.assets_dir)),
            _ => None,
        }
    }

    /// Substitute every `{token}` occurrence in one left-to-right pass.
    ///
    /// Substituted values are never re-scanned, so a project path that
    /// itself contains `{assets_dir}` stays literal. Unknown tokens and
    /// unbalanced braces are copied through unchanged.
    pub fn expand_placeholders(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            let Some(close) = tail.find('}') else {
                rest = tail;
                break;
            };

            match self.placeholder(&tail[1..close]) {
                Some(replacement) => {
                    out.push_str(&replacement);
                    rest = &tail[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(project: &str) -> AppContext {
        AppContext::new(PathBuf::from(project), Settings::default(), None)
    }

    #[test]
    fn expands_every_known_token() {
        let ctx = ctx("/work");
        let interp = ctx.interpreter().to_string();
        assert_eq!(
            ctx.expand_placeholders("{python} {interpreter} {project_dir}/x {assets_dir}"),
            format!("{interp} {interp} /work/x /work/assets")
        );
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let ctx = ctx("/odd/{assets_dir}");
        assert_eq!(
            ctx.expand_placeholders("{project_dir}"),
            "/odd/{assets_dir}".to_string()
        );
    }

    #[test]
    fn unknown_and_unbalanced_braces_pass_through() {
        let ctx = ctx("/w");
        assert_eq!(ctx.expand_placeholders("{nope} {"), "{nope} {");
        assert_eq!(ctx.expand_placeholders("{{project_dir}}"), "{/w}");
        assert_eq!(ctx.expand_placeholders("a}b"), "a}b");
    }
}
