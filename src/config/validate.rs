// src/config/validate.rs

use std::time::Duration;

use crate::config::model::ConfigSection;
use crate::errors::TaskCenterError;

/// Typed, validated form of the `[config]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interpreter: String,
    /// Script extension without a leading dot, e.g. `"py"`.
    pub script_extension: String,
    pub assets_dir: String,
    pub discover_scripts: bool,
    pub poll_interval: Duration,
    pub kill_after: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        let section = ConfigSection::default();
        Settings {
            interpreter: section.interpreter,
            script_extension: section.script_extension,
            assets_dir: section.assets_dir,
            discover_scripts: section.discover_scripts,
            poll_interval: Duration::from_millis(section.poll_interval_ms),
            kill_after: None,
        }
    }
}

impl TryFrom<ConfigSection> for Settings {
    type Error = TaskCenterError;

    fn try_from(section: ConfigSection) -> std::result::Result<Self, Self::Error> {
        let interpreter = section.interpreter.trim().to_string();
        if interpreter.is_empty() {
            return Err(TaskCenterError::ConfigError(
                "[config].interpreter must not be empty".to_string(),
            ));
        }

        let script_extension = section
            .script_extension
            .trim()
            .trim_start_matches('.')
            .to_string();
        if script_extension.is_empty() {
            return Err(TaskCenterError::ConfigError(
                "[config].script_extension must not be empty".to_string(),
            ));
        }

        if section.poll_interval_ms == 0 {
            return Err(TaskCenterError::ConfigError(
                "[config].poll_interval_ms must be >= 1 (got 0)".to_string(),
            ));
        }

        let kill_after = section
            .kill_after
            .as_deref()
            .map(parse_duration)
            .transpose()
            .map_err(|e| TaskCenterError::ConfigError(format!("[config].kill_after: {e}")))?;

        Ok(Settings {
            interpreter,
            script_extension,
            assets_dir: section.assets_dir,
            discover_scripts: section.discover_scripts,
            poll_interval: Duration::from_millis(section.poll_interval_ms),
            kill_after,
        })
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ))
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_durations_with_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5 days").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn oversized_durations_are_errors() {
        assert!(parse_duration("6000000000000000h").is_err());
        assert!(parse_duration("307445734561825861m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );

        let section = ConfigSection {
            kill_after: Some("6000000000000000h".to_string()),
            ..ConfigSection::default()
        };
        assert!(matches!(
            Settings::try_from(section),
            Err(TaskCenterError::ConfigError(_))
        ));
    }

    #[test]
    fn extension_loses_leading_dot() {
        let section = ConfigSection {
            script_extension: ".py".to_string(),
            ..ConfigSection::default()
        };
        let settings = Settings::try_from(section).unwrap();
        assert_eq!(settings.script_extension, "py");
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let section = ConfigSection {
            poll_interval_ms: 0,
            ..ConfigSection::default()
        };
        match Settings::try_from(section) {
            Err(TaskCenterError::ConfigError(msg)) => assert!(msg.contains("poll_interval_ms")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn kill_after_is_parsed() {
        let section = ConfigSection {
            kill_after: Some("5s".to_string()),
            ..ConfigSection::default()
        };
        let settings = Settings::try_from(section).unwrap();
        assert_eq!(settings.kill_after, Some(Duration::from_secs(5)));
    }
}
