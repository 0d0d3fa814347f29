//! Text formatting for nights: timestamps, durations and the history summary.
//!
//! All timestamps are epoch milliseconds and are rendered in local time.
//!
//! ```rust
//! use sleeplog::libs::formatter::format_duration;
//!
//! assert_eq!(format_duration(7 * 3_600_000 + 5 * 60_000 + 9_000), "7:05:09");
//! ```

use crate::libs::night::{quality_label, SleepNight};
use chrono::{DateTime, Local, TimeZone};

/// Heading of the history summary.
pub const SUMMARY_TITLE: &str = "HERE IS YOUR SLEEP DATA";

pub fn to_local(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

/// `Monday, Oct-19-2026 Time: 22:10`
pub fn format_date_time(millis: i64) -> String {
    to_local(millis).map_or_else(|| "-".to_string(), |t| t.format("%A, %b-%d-%Y Time: %H:%M").to_string())
}

/// `2026-10-19 22:10`, used in tables.
pub fn format_short(millis: i64) -> String {
    to_local(millis).map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// `H:MM:SS`; negative durations render as zero.
pub fn format_duration(millis: i64) -> String {
    let total_seconds = millis.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Average length of the finished nights, `None` if none are finished.
pub fn average_duration(nights: &[SleepNight]) -> Option<i64> {
    let finished: Vec<i64> = nights.iter().filter(|n| !n.is_in_progress()).map(SleepNight::duration_milli).collect();
    if finished.is_empty() {
        return None;
    }
    Some(finished.iter().sum::<i64>() / finished.len() as i64)
}

/// Multi-line, human-readable summary of every night, or an empty string when there are none.
pub fn format_nights(nights: &[SleepNight]) -> String {
    if nights.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(SUMMARY_TITLE);
    out.push('\n');
    for night in nights {
        out.push('\n');
        out.push_str(&format!("Start: {}\n", format_date_time(night.start_time_milli)));
        if night.is_in_progress() {
            out.push_str("End: in progress\n");
        } else {
            out.push_str(&format!("End: {}\n", format_date_time(night.end_time_milli)));
        }
        out.push_str(&format!("Quality: {}\n", quality_label(night.quality)));
        out.push_str(&format!("Hours:Minutes:Seconds: {}\n", format_duration(night.duration_milli())));
    }
    out
}
