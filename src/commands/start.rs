//! Opens tonight's sleep session.

use crate::commands::open_session;
use crate::libs::error::SleepError;
use crate::libs::formatter::format_short;
use crate::libs::messages::Message;
use crate::{msg_success, msg_warning};
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub async fn cmd() -> Result<()> {
    let cancel = CancellationToken::new();
    let (_, session) = open_session(&cancel).await?;

    match session.start().await {
        Ok(()) => {
            let since = session.state().tonight.map(|night| format_short(night.start_time_milli)).unwrap_or_default();
            msg_success!(Message::SessionStarted(since));
        }
        Err(SleepError::InvalidState(_)) => msg_warning!(Message::SessionAlreadyInProgress),
        Err(e) => return Err(e.into()),
    }

    cancel.cancel();
    Ok(())
}
