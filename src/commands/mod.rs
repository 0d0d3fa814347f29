//! Command-line front end.
//!
//! Each subcommand lives in its own module and exposes a `cmd` entry point.

pub mod clear;
pub mod history;
pub mod init;
pub mod rate;
pub mod start;
pub mod status;
pub mod stop;

use crate::db::nights::Nights;
use crate::libs::clock::SystemClock;
use crate::libs::session::SessionController;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Start tracking tonight's sleep")]
    Start,
    #[command(about = "Stop tracking and rate the night")]
    Stop(stop::StopArgs),
    #[command(about = "Rate the quality of a recorded night")]
    Rate(rate::RateArgs),
    #[command(about = "Show recorded nights")]
    History(history::HistoryArgs),
    #[command(about = "Show the current tracking state")]
    Status,
    #[command(about = "Delete all recorded nights")]
    Clear(clear::ClearArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Start => start::cmd().await,
            Commands::Stop(args) => stop::cmd(args).await,
            Commands::Rate(args) => rate::cmd(args).await,
            Commands::History(args) => history::cmd(args),
            Commands::Status => status::cmd().await,
            Commands::Clear(args) => clear::cmd(args).await,
        }
    }
}

/// Opens the store and a session controller over it, driven by the wall clock.
pub(crate) async fn open_session(cancel: &CancellationToken) -> Result<(Nights, SessionController)> {
    let nights = Nights::new()?;
    let session = SessionController::new(nights.clone(), Arc::new(SystemClock), cancel.clone()).await?;
    Ok((nights, session))
}
