//! Wipes the whole sleep history after a confirmation.

use crate::commands::open_session;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(args: ClearArgs) -> Result<()> {
    let cancel = CancellationToken::new();
    let (_, session) = open_session(&cancel).await?;

    let count = session.state().nights.len();
    if count == 0 {
        msg_info!(Message::HistoryEmpty);
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmClearHistory(count).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::ClearCancelled);
            return Ok(());
        }
    }

    session.clear().await?;
    if session.state().show_snackbar() {
        msg_success!(Message::HistoryCleared);
        session.on_done_showing_snackbar();
    }

    cancel.cancel();
    Ok(())
}
