//! Severity levels and their per-level presentation tables.
//!
//! Levels are totally ordered by severity (`Debug < Trace < Info < Warn <
//! Error`). A logger suppresses every record whose level is strictly below
//! its threshold.

use crate::log_error::LogError;
use colored::Color;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 0,
    Trace = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

/// Fixed-width badge labels, indexed by level.
const LABELS: [&str; 5] = [" DEBUG ", " TRACE ", " INFO  ", " WARN  ", " ERROR "];

/// Combined style for the level badge: bold, white on the level color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStyle {
    pub bold: bool,
    pub foreground: Color,
    pub background: Color,
}

impl BadgeStyle {
    /// Wrap `text` in the escape sequences for this style.
    pub fn paint(&self, text: &str) -> String {
        // Escapes are composed here rather than through `colored::Colorize`,
        // whose output follows the process-wide `colored::control` override.
        // Each logger decides interactivity for its own sink.
        let mut codes: Vec<Cow<'static, str>> = Vec::with_capacity(3);
        if self.bold {
            codes.push(Cow::Borrowed("1"));
        }
        codes.push(self.foreground.to_fg_str());
        codes.push(self.background.to_bg_str());
        format!("\x1b[{}m{}\x1b[0m", codes.join(";"), text)
    }
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Trace,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// The space-padded badge label, e.g. `" INFO  "`.
    pub const fn label(self) -> &'static str {
        LABELS[self as usize]
    }

    /// Foreground color used for the body of a record at this level.
    pub fn color(self) -> Color {
        match self {
            Self::Debug => Color::Blue,
            Self::Trace => Color::Cyan,
            Self::Info => Color::Green,
            Self::Warn => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    /// Style for the level badge in interactive output.
    pub fn badge_style(self) -> BadgeStyle {
        BadgeStyle {
            bold: true,
            foreground: Color::White,
            background: self.color(),
        }
    }

    /// Lowercase name, as accepted by [`Level::parse`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Paint `text` in this level's foreground color, independent of the
    /// global `colored` override (see [`BadgeStyle::paint`]).
    pub fn colorize(self, text: &str) -> String {
        format!("\x1b[{}m{}\x1b[0m", self.color().to_fg_str(), text)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LogError::InvalidLevel(s.to_string()))
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}
