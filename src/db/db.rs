use crate::db::schema::init_schema;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "sleeplog.db";

/// An open database with the nights table in place.
///
/// Construct it once at startup and hand it to [`Nights`](crate::db::nights::Nights);
/// nothing else in the crate opens connections on its own.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database file named in the configuration inside the data directory.
    pub fn new() -> Result<Db> {
        let db_file = Config::read()?.storage.unwrap_or_default().db_file;
        let db_file_path = DataStorage::new().get_path(&db_file)?;
        Self::open(&db_file_path)
    }

    pub fn open(path: &Path) -> Result<Db> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Db { conn })
    }

    /// A private in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Db> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Db { conn })
    }
}
