use super::dial::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

/// Render remaining milliseconds as `HH:MM:SS`.
///
/// Partial seconds are dropped. Hours are not wrapped, so durations past
/// 99 hours simply get a wider first field.
pub fn format_hms(remaining_ms: u64) -> String {
    let hours = remaining_ms / MS_PER_HOUR;
    let minutes = (remaining_ms / MS_PER_MINUTE) % 60;
    let seconds = (remaining_ms / MS_PER_SECOND) % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
