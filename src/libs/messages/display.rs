//! Display implementation for sleeplog application messages.
//!
//! Every user-facing string lives here so wording stays consistent across
//! commands. Messages carrying data interpolate it directly.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let s = match self {
            // === SESSION MESSAGES ===
            Message::SessionStarted(time) => format!("Sleep session started at {}", time),
            Message::SessionStopped(duration) => format!("Sleep session finished, you slept {}", duration),
            Message::SessionAlreadyInProgress => "A sleep session is already in progress".to_string(),
            Message::NoSessionInProgress => "No sleep session is in progress".to_string(),
            Message::SessionVanished => "The in-progress session no longer exists".to_string(),

            // === RATING MESSAGES ===
            Message::PromptSleepQuality => "How was your sleep?".to_string(),
            Message::NightRated(id, label) => format!("Night #{} rated: {}", id, label),
            Message::NightNotFound(id) => format!("Night #{} not found", id),
            Message::InvalidQuality(quality) => format!("Quality {} is out of range, use a value from 0 to 5", quality),
            Message::RatingSkipped(id) => format!("Night #{} left unrated, use `sleeplog rate {} <QUALITY>` later", id, id),

            // === HISTORY MESSAGES ===
            Message::HistoryTitle => "Sleep history".to_string(),
            Message::HistoryEmpty => "No nights recorded yet".to_string(),
            Message::HistoryTotal(count, rated, average) => format!("{} night(s), {} rated, average duration {}", count, rated, average),
            Message::HistoryCleared => "All your data is gone forever.".to_string(),
            Message::ConfirmClearHistory(count) => format!("Delete all {} recorded night(s)?", count),
            Message::ClearCancelled => "Clear cancelled".to_string(),

            // === STATUS MESSAGES ===
            Message::StatusTracking(since) => format!("Tracking since {}", since),
            Message::StatusIdle => "Not tracking".to_string(),
            Message::StatusFlags {
                start_visible,
                stop_visible,
                clear_visible,
            } => format!("start: {}, stop: {}, clear: {}", on_off(*start_visible), on_off(*stop_visible), on_off(*clear_visible)),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleStorage => "Storage settings".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptDbFile => "Database file name".to_string(),
            Message::PromptRatingAfterStop => "Ask for a quality rating after stopping".to_string(),
            Message::PromptHistoryLimit => "Number of nights shown by `history`".to_string(),

            // === DATABASE MESSAGES ===
            Message::SchemaReady(table) => format!("Table {} is ready", table),

            // === STORE / CONTROLLER MESSAGES ===
            Message::StorageFault(error) => format!("Storage error: {}", error),
            Message::ControllerCancelled => "Operation cancelled".to_string(),
        };
        write!(f, "{}", s)
    }
}

fn on_off(visible: bool) -> &'static str {
    if visible {
        "visible"
    } else {
        "hidden"
    }
}
