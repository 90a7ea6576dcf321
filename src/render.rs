//! Text layout for a single log record.
//!
//! Interactive sinks get a styled level badge followed by the rest of the
//! record in the level color. Every other sink gets the same layout with no
//! escape sequences, so redirected output stays grep-able:
//!
//! ```text
//!  INFO  | 2024-01-02 03:04:05 | src/svc.rs:42 | [service]api | user=alice
//! ```

use crate::fields::FieldMap;
use crate::level::Level;

/// Local time, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Logger-wide fields: `[key]value` entries joined by `" | "`.
pub fn format_global(fields: &FieldMap) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("[{}]{}", key, value))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Per-record fields: `key=value` entries joined by a space.
pub fn format_local(fields: &FieldMap) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one record. The result carries no trailing newline.
pub fn render_line(
    level: Level,
    position: &str,
    global: &FieldMap,
    local: &FieldMap,
    timestamp: &str,
    interactive: bool,
) -> String {
    let body = format!(
        "| {} | {} | {} | {}",
        timestamp,
        position,
        format_global(global),
        format_local(local)
    );
    if interactive {
        let badge = level.badge_style().paint(level.label());
        format!("{}{}", badge, level.colorize(&body))
    } else {
        format!("{}{}", level.label(), body)
    }
}
