//! Database layer for sleeplog.
//!
//! A single SQLite table holds one row per night. [`db::Db`] opens the file
//! and creates the table, [`nights::Nights`] is the record store built on it.
//!
//! ```rust
//! use sleeplog::db::{db::Db, nights::Nights};
//!
//! let nights = Nights::from_db(Db::open_in_memory()?)?;
//! assert!(nights.list_all()?.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup and schema initialization.
pub mod db;

/// Table creation.
pub mod schema;

/// The record store for sleep nights.
pub mod nights;
