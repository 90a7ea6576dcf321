//! Programmatic logger configuration.
//!
//! There are no configuration files. A [`LoggerConfig`] is either built in
//! code or read from the environment with [`LoggerConfig::from_env`].

use crate::level::Level;
use crate::log_error::LogError;
use std::env;
use std::str::FromStr;

/// Environment variable holding the minimum level (`debug`, `info`, ...).
pub const LEVEL_ENV: &str = "STACKLOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto, // Styled only when the sink is stdout/stderr
    Always, // Force styling
    Never,  // Force plain text
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    /// Decide whether records should be styled for a sink.
    pub fn should_style(&self, sink_is_interactive: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => sink_is_interactive && !is_dumb_terminal(),
        }
    }
}

impl FromStr for ColorMode {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LogError::InvalidColorMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: Level,
    pub color: ColorMode,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            color: ColorMode::Auto,
        }
    }
}

impl LoggerConfig {
    pub fn new(level: Level, color: ColorMode) -> Self {
        Self { level, color }
    }

    /// `Debug` threshold when `debug` is set, `Info` otherwise.
    pub fn debug(debug: bool) -> Self {
        let level = if debug { Level::Debug } else { Level::Info };
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LoggerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_ENV).as_deref().and_then(Level::parse) {
            config.level = level;
        }

        // NO_COLOR (no-color.org)
        if lookup("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }

        if lookup("CLICOLOR").as_deref() == Some("0") {
            config.color = ColorMode::Never;
        }

        if lookup("CLICOLOR_FORCE").as_deref() == Some("1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// Plain output regardless of sink.
    pub fn plain(level: Level) -> Self {
        Self {
            level,
            color: ColorMode::Never,
        }
    }
}

fn is_dumb_terminal() -> bool {
    matches!(env::var("TERM"), Ok(term) if term == "dumb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_debug_flag_selects_threshold() {
        assert_eq!(LoggerConfig::debug(true).level, Level::Debug);
        assert_eq!(LoggerConfig::debug(false).level, Level::Info);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = LoggerConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_level() {
        let config = LoggerConfig::from_lookup(lookup_from(&[(LEVEL_ENV, "WARN")]));
        assert_eq!(config.level, Level::Warn);

        let config = LoggerConfig::from_lookup(lookup_from(&[(LEVEL_ENV, "loud")]));
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn test_no_color_and_force() {
        let config = LoggerConfig::from_lookup(lookup_from(&[("NO_COLOR", "")]));
        assert_eq!(config.color, ColorMode::Never);

        let config = LoggerConfig::from_lookup(lookup_from(&[("CLICOLOR", "0")]));
        assert_eq!(config.color, ColorMode::Never);

        let config = LoggerConfig::from_lookup(lookup_from(&[
            ("NO_COLOR", "1"),
            ("CLICOLOR_FORCE", "1"),
        ]));
        assert_eq!(config.color, ColorMode::Always);
    }

    #[test]
    fn test_color_mode_decision() {
        assert!(ColorMode::Always.should_style(false));
        assert!(!ColorMode::Never.should_style(true));
        assert!(!ColorMode::Auto.should_style(false));
    }

    #[test]
    fn test_color_mode_parse() {
        assert_eq!(ColorMode::parse("ALWAYS"), Some(ColorMode::Always));
        assert_eq!(ColorMode::parse("sometimes"), None);
        assert!("sometimes".parse::<ColorMode>().is_err());
    }
}
