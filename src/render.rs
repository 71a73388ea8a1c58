//! Cell rendering shared by the output formats

use crate::report::Cell;
use chrono::{DateTime, Utc};

/// Render an epoch-millisecond timestamp as `2023-11-14 22:13:20.000+0000`
pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f%z").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Render a millisecond duration as `[Nd ]HH:MM:SS.mmm`
pub fn format_duration(ms: u64) -> String {
    let millis = ms % 1000;
    let secs = ms / 1000;
    let (days, hours, minutes, seconds) = (
        secs / 86_400,
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
    );
    if days > 0 {
        format!(
            "{}d {:02}:{:02}:{:02}.{:03}",
            days, hours, minutes, seconds, millis
        )
    } else {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}

/// Text form of a cell; empty cells render blank
pub fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.clone(),
        Cell::Int(v) => v.to_string(),
        Cell::Percent(v) => format!("{}%", v),
        Cell::Duration(ms) => format_duration(*ms),
        Cell::Timestamp(ms) => format_timestamp(*ms),
    }
}
