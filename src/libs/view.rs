//! Terminal tables for the history listing.

use crate::libs::formatter::{format_duration, format_short};
use crate::libs::night::{quality_label, SleepNight};
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints the nights table, newest first.
    pub fn nights(nights: &[SleepNight]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "START", "END", "DURATION", "QUALITY"]);
        for night in nights {
            let (end, duration) = if night.is_in_progress() {
                ("in progress".to_string(), "--:--:--".to_string())
            } else {
                (format_short(night.end_time_milli), format_duration(night.duration_milli()))
            };
            table.add_row(row![
                night.id.unwrap_or(0),
                format_short(night.start_time_milli),
                end,
                duration,
                quality_label(night.quality)
            ]);
        }
        table.printstd();

        Ok(())
    }
}
