//! The sleep night record and its quality scale.

use serde::{Deserialize, Serialize};

/// Quality value stored for a night that has not been rated yet.
pub const QUALITY_UNRATED: i32 = -1;
/// Highest quality rating.
pub const QUALITY_MAX: i32 = 5;

/// Labels for ratings 0 through 5.
pub const QUALITY_LABELS: [&str; 6] = ["Very bad", "Poor", "So-so", "OK", "Pretty good", "Excellent"];

/// One sleep session.
///
/// A night is in progress while `end_time_milli` still equals
/// `start_time_milli`; stopping the session moves the end forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepNight {
    /// Primary key, `None` until the night has been inserted.
    pub id: Option<i64>,
    /// Start of the session in milliseconds since the epoch.
    pub start_time_milli: i64,
    /// End of the session in milliseconds since the epoch.
    pub end_time_milli: i64,
    /// Rating in [-1, 5], where -1 means unrated.
    pub quality: i32,
}

impl SleepNight {
    /// Creates an unsaved, unrated night that starts and ends at `now_milli`.
    pub fn new(now_milli: i64) -> Self {
        SleepNight {
            id: None,
            start_time_milli: now_milli,
            end_time_milli: now_milli,
            quality: QUALITY_UNRATED,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.end_time_milli == self.start_time_milli
    }

    pub fn is_rated(&self) -> bool {
        self.quality != QUALITY_UNRATED
    }

    /// Length of the session in milliseconds, zero while in progress.
    pub fn duration_milli(&self) -> i64 {
        (self.end_time_milli - self.start_time_milli).max(0)
    }
}

pub fn is_valid_quality(quality: i32) -> bool {
    (QUALITY_UNRATED..=QUALITY_MAX).contains(&quality)
}

/// Human-readable label for a rating; unrated and unknown values render as `--`.
pub fn quality_label(quality: i32) -> &'static str {
    usize::try_from(quality)
        .ok()
        .and_then(|index| QUALITY_LABELS.get(index))
        .copied()
        .unwrap_or("--")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_night_is_in_progress_and_unrated() {
        let night = SleepNight::new(42);
        assert_eq!(night.id, None);
        assert!(night.is_in_progress());
        assert!(!night.is_rated());
        assert_eq!(night.duration_milli(), 0);
    }

    #[test]
    fn quality_bounds() {
        assert!(is_valid_quality(-1));
        assert!(is_valid_quality(0));
        assert!(is_valid_quality(5));
        assert!(!is_valid_quality(6));
        assert!(!is_valid_quality(-2));
    }

    #[test]
    fn quality_labels() {
        assert_eq!(quality_label(0), "Very bad");
        assert_eq!(quality_label(3), "OK");
        assert_eq!(quality_label(5), "Excellent");
        assert_eq!(quality_label(QUALITY_UNRATED), "--");
        assert_eq!(quality_label(9), "--");
    }
}
