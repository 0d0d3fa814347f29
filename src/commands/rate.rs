//! Stores a quality rating for a recorded night.
//!
//! `stop` reuses [`rate_night`] when a rating is given right away.

use crate::db::nights::Nights;
use crate::libs::error::SleepError;
use crate::libs::messages::Message;
use crate::libs::night::quality_label;
use crate::libs::rating::RatingController;
use crate::{msg_bail_anyhow, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
pub struct RateArgs {
    /// Id of the night, as listed by `history`
    id: i64,

    /// Quality from 0 (very bad) to 5 (excellent)
    quality: i32,
}

pub async fn cmd(args: RateArgs) -> Result<()> {
    let cancel = CancellationToken::new();
    rate_night(Nights::new()?, args.id, args.quality, &cancel).await?;
    cancel.cancel();
    Ok(())
}

/// Rates one night through a rating controller and acknowledges its return signal.
pub(crate) async fn rate_night(nights: Nights, id: i64, quality: i32, cancel: &CancellationToken) -> Result<()> {
    let rating = RatingController::new(nights, id, cancel.clone());

    match rating.set_quality(quality).await {
        Ok(true) => {
            msg_success!(Message::NightRated(id, quality_label(quality).to_string()));
            rating.acknowledge_return();
        }
        Ok(false) => msg_warning!(Message::NightNotFound(id)),
        Err(SleepError::InvalidQuality(quality)) => msg_bail_anyhow!(Message::InvalidQuality(quality)),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
