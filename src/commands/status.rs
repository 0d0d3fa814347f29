//! Prints the tracker state: the session in progress, the action flags and
//! the history summary.

use crate::commands::open_session;
use crate::libs::formatter::format_short;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub async fn cmd() -> Result<()> {
    let cancel = CancellationToken::new();
    let (_, session) = open_session(&cancel).await?;
    let state = session.state();

    match &state.tonight {
        Some(night) => msg_print!(Message::StatusTracking(format_short(night.start_time_milli))),
        None => msg_print!(Message::StatusIdle),
    }
    msg_print!(Message::StatusFlags {
        start_visible: state.start_visible,
        stop_visible: state.stop_visible,
        clear_visible: state.clear_visible,
    });
    if !state.nights_summary.is_empty() {
        msg_print!(state.nights_summary, true);
    }

    cancel.cancel();
    Ok(())
}
