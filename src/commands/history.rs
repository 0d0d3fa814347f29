//! Lists recorded nights, newest first, followed by a total line.

use crate::db::nights::Nights;
use crate::libs::config::Config;
use crate::libs::formatter::{average_duration, format_duration};
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum number of nights to show, newest first
    #[arg(short, long)]
    limit: Option<usize>,
}

pub fn cmd(args: HistoryArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(Config::read()?.tracker.unwrap_or_default().history_limit);
    let nights = Nights::new()?.list_all()?;

    if nights.is_empty() {
        msg_info!(Message::HistoryEmpty);
        return Ok(());
    }

    let shown: Vec<_> = nights.iter().take(limit).cloned().collect();
    msg_print!(Message::HistoryTitle, true);
    View::nights(&shown)?;

    let average = average_duration(&nights).map_or_else(|| "--:--:--".to_string(), format_duration);
    let rated = nights.iter().filter(|night| night.is_rated()).count();
    msg_print!(Message::HistoryTotal(nights.len(), rated, average));
    Ok(())
}
