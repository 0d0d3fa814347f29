//! Ends tonight's session and hands the finished night over to rating.

use crate::commands::{open_session, rate};
use crate::libs::config::Config;
use crate::libs::error::SleepError;
use crate::libs::formatter::format_duration;
use crate::libs::messages::Message;
use crate::libs::night::{is_valid_quality, QUALITY_LABELS};
use crate::{msg_bail_anyhow, msg_info, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Select};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
pub struct StopArgs {
    /// Rate the night right away (0 = very bad .. 5 = excellent)
    #[arg(short, long)]
    quality: Option<i32>,

    /// Leave the night unrated
    #[arg(long, conflicts_with = "quality")]
    no_rate: bool,
}

pub async fn cmd(args: StopArgs) -> Result<()> {
    check_quality(args.quality)?;
    let tracker = Config::read()?.tracker.unwrap_or_default();
    let cancel = CancellationToken::new();
    let (nights, session) = open_session(&cancel).await?;

    match session.stop().await {
        Ok(Some(_)) => {}
        Ok(None) => {
            msg_warning!(Message::SessionVanished);
            return Ok(());
        }
        Err(SleepError::InvalidState(_)) => {
            msg_warning!(Message::NoSessionInProgress);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    if let Some(id) = session.state().navigate_to_quality() {
        if let Some(night) = nights.get(id)? {
            msg_success!(Message::SessionStopped(format_duration(night.duration_milli())));
        }

        let quality = match args.quality {
            Some(quality) => Some(quality),
            None if args.no_rate || !tracker.prompt_rating => None,
            None => Some(prompt_quality()?),
        };
        session.on_done_navigating();

        match quality {
            Some(quality) => rate::rate_night(nights, id, quality, &cancel).await?,
            None => msg_info!(Message::RatingSkipped(id)),
        }
    }

    cancel.cancel();
    Ok(())
}

/// Rejects an out-of-range `--quality` before the session is touched.
fn check_quality(quality: Option<i32>) -> Result<()> {
    match quality {
        Some(quality) if !is_valid_quality(quality) => msg_bail_anyhow!(Message::InvalidQuality(quality)),
        _ => Ok(()),
    }
}

fn prompt_quality() -> Result<i32> {
    let items: Vec<String> = QUALITY_LABELS.iter().enumerate().map(|(value, label)| format!("{} - {}", value, label)).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSleepQuality.to_string())
        .items(&items)
        .default(3)
        .interact()?;
    Ok(selection as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_flag_is_checked_up_front() {
        assert!(check_quality(None).is_ok());
        assert!(check_quality(Some(0)).is_ok());
        assert!(check_quality(Some(5)).is_ok());

        let err = check_quality(Some(9)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(check_quality(Some(-2)).is_err());
    }
}
