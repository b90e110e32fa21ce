//! Date and duration formatting for countdown and timer placeholders.

use chrono::DateTime;

/// `dd/mm/YYYY HH:MM` in UTC. Out-of-range timestamps format as empty.
pub fn format_date(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|d| d.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}

/// `H:MM:SS` from one hour up, `M:SS` below.
pub fn format_duration(ms: u64) -> String {
    let total = ms / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
