//! Table setup for the sleeplog database.
//!
//! ```rust
//! use rusqlite::Connection;
//! use sleeplog::db::schema::init_schema;
//!
//! let conn = Connection::open_in_memory()?;
//! init_schema(&conn)?;
//! init_schema(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::Result;
use rusqlite::Connection;

pub const NIGHTS_TABLE: &str = "daily_sleep_quality_table";

// AUTOINCREMENT keeps ids monotonic even after a clear.
const CREATE_NIGHTS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS daily_sleep_quality_table (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_time_milli INTEGER NOT NULL,
    end_time_milli INTEGER NOT NULL,
    quality_rating INTEGER NOT NULL DEFAULT -1
)";

/// Creates the nights table if it does not exist yet. Safe to run on every open.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_NIGHTS_TABLE, [])?;
    msg_debug!(Message::SchemaReady(NIGHTS_TABLE));
    Ok(())
}
