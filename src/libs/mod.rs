//! Core library modules for sleeplog.
//!
//! - **Model**: the [`night::SleepNight`] record and its quality scale
//! - **Controllers**: [`session`] and [`rating`] drive the record store asynchronously
//! - **Infrastructure**: configuration, data directory, clock, errors, messages
//! - **Presentation**: text formatting and terminal tables
//!
//! ```rust,no_run
//! use sleeplog::db::nights::Nights;
//! use sleeplog::libs::night::SleepNight;
//!
//! let nights = Nights::new()?;
//! nights.insert(&SleepNight::new(chrono::Utc::now().timestamp_millis()))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod clock;
pub(crate) mod command;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod messages;
pub mod night;
pub mod rating;
pub mod session;
pub mod view;
