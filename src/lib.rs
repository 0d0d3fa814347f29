//! # sleeplog
//!
//! A command-line sleep tracker. It records sleep sessions in a local SQLite
//! database, lets you rate each night and shows the history.
//!
//! ## Features
//!
//! - **Session Tracking**: start and stop tonight's session
//! - **Quality Rating**: rate each finished night from "Very bad" to "Excellent"
//! - **History**: browse every recorded night, or wipe them all
//! - **Live State**: controllers publish observable state and one-shot signals
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sleeplog::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
