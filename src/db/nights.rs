//! Record store for sleep nights.
//!
//! `Nights` wraps the single SQLite connection behind a mutex, so every
//! statement runs serialized. After each committed mutation it publishes a
//! fresh `list_all()` snapshot on a watch channel while still holding the
//! lock, which keeps snapshots in commit order.
//!
//! Calls are synchronous; async callers go through [`Nights::io`], which moves
//! the work onto tokio's blocking pool.
//!
//! ```rust
//! use sleeplog::db::{db::Db, nights::Nights};
//! use sleeplog::libs::night::SleepNight;
//!
//! let nights = Nights::from_db(Db::open_in_memory()?)?;
//! let id = nights.insert(&SleepNight::new(1_000))?;
//! assert_eq!(nights.get_tonight()?.and_then(|n| n.id), Some(id));
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::libs::error::{SleepError, SleepResult};
use crate::libs::night::SleepNight;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::watch;

const INSERT_NIGHT: &str = "INSERT INTO daily_sleep_quality_table (start_time_milli, end_time_milli, quality_rating) VALUES (?1, ?2, ?3)";
const INSERT_NIGHT_WITH_ID: &str =
    "INSERT INTO daily_sleep_quality_table (id, start_time_milli, end_time_milli, quality_rating) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_NIGHT: &str = "UPDATE daily_sleep_quality_table SET start_time_milli = ?1, end_time_milli = ?2, quality_rating = ?3 WHERE id = ?4";
const SELECT_BY_ID: &str = "SELECT id, start_time_milli, end_time_milli, quality_rating FROM daily_sleep_quality_table WHERE id = ?1";
const SELECT_TONIGHT: &str = "SELECT id, start_time_milli, end_time_milli, quality_rating FROM daily_sleep_quality_table ORDER BY id DESC LIMIT 1";
const SELECT_ALL: &str = "SELECT id, start_time_milli, end_time_milli, quality_rating FROM daily_sleep_quality_table ORDER BY id DESC";
const DELETE_ALL: &str = "DELETE FROM daily_sleep_quality_table";

/// Handle to the nights table. Cheap to clone; clones share the connection and the snapshot channel.
#[derive(Clone)]
pub struct Nights {
    conn: Arc<Mutex<Connection>>,
    snapshots: Arc<watch::Sender<Vec<SleepNight>>>,
}

impl Nights {
    /// Opens the configured database file.
    pub fn new() -> Result<Self> {
        Self::from_db(Db::new()?)
    }

    pub fn from_db(db: Db) -> Result<Self> {
        let initial = list_all(&db.conn)?;
        let (snapshots, _) = watch::channel(initial);
        Ok(Nights {
            conn: Arc::new(Mutex::new(db.conn)),
            snapshots: Arc::new(snapshots),
        })
    }

    /// Inserts a night and returns its id.
    ///
    /// Nights without an id get the next one from the table. A night that
    /// carries an id is inserted under it, or rejected if the id is taken.
    pub fn insert(&self, night: &SleepNight) -> SleepResult<i64> {
        let conn = self.conn.lock();
        let id = insert(&conn, night)?;
        self.publish(&conn)?;
        Ok(id)
    }

    /// Inserts `night` unless the latest stored night is still in progress.
    ///
    /// The check and the insert run under one lock, so two callers racing on
    /// the same store can never both open a session. Returns `None` when a
    /// night in progress blocked the insert.
    pub fn insert_if_idle(&self, night: &SleepNight) -> SleepResult<Option<i64>> {
        let conn = self.conn.lock();
        let latest = conn.query_row(SELECT_TONIGHT, [], map_night).optional()?;
        if let Some(open) = latest.filter(SleepNight::is_in_progress) {
            tracing::debug!(id = ?open.id, "night already in progress");
            return Ok(None);
        }
        let id = insert(&conn, night)?;
        self.publish(&conn)?;
        Ok(Some(id))
    }

    /// Overwrites the stored night with the same id.
    pub fn update(&self, night: &SleepNight) -> SleepResult<()> {
        let id = night.id.ok_or(SleepError::InvalidState("night has not been saved"))?;
        let conn = self.conn.lock();
        let changed = conn.execute(UPDATE_NIGHT, params![night.start_time_milli, night.end_time_milli, night.quality, id])?;
        if changed == 0 {
            return Err(SleepError::NotFound(id));
        }
        tracing::debug!(id, end = night.end_time_milli, quality = night.quality, "updated night");
        self.publish(&conn)?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> SleepResult<Option<SleepNight>> {
        get(&self.conn.lock(), id)
    }

    /// The most recently inserted night, whether or not it is still in progress.
    pub fn get_tonight(&self) -> SleepResult<Option<SleepNight>> {
        let conn = self.conn.lock();
        Ok(conn.query_row(SELECT_TONIGHT, [], map_night).optional()?)
    }

    /// All nights, newest first.
    pub fn list_all(&self) -> SleepResult<Vec<SleepNight>> {
        list_all(&self.conn.lock())
    }

    pub fn clear(&self) -> SleepResult<()> {
        let conn = self.conn.lock();
        let deleted = conn.execute(DELETE_ALL, [])?;
        tracing::debug!(deleted, "cleared nights");
        self.publish(&conn)?;
        Ok(())
    }

    /// Live view of `list_all()`. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.snapshots.subscribe()
    }

    /// Live view of a single night, `None` while it does not exist.
    ///
    /// The returned receiver is fed by a background task that stops once the
    /// receiver is dropped. Must be called inside a tokio runtime.
    pub fn subscribe_night(&self, id: i64) -> watch::Receiver<Option<SleepNight>> {
        let mut snapshots = self.subscribe();
        let current = find_night(&snapshots.borrow_and_update(), id);
        let (tx, rx) = watch::channel(current);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let night = find_night(&snapshots.borrow_and_update(), id);
                        tx.send_if_modified(|current| {
                            if *current == night {
                                false
                            } else {
                                *current = night;
                                true
                            }
                        });
                    }
                    _ = tx.closed() => break,
                }
            }
        });

        rx
    }

    /// Runs `f` against the store on the blocking pool and hands back its result.
    pub async fn io<T, F>(&self, f: F) -> SleepResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Nights) -> SleepResult<T> + Send + 'static,
    {
        let nights = self.clone();
        tokio::task::spawn_blocking(move || f(&nights)).await?
    }

    fn publish(&self, conn: &Connection) -> SleepResult<()> {
        let snapshot = list_all(conn)?;
        tracing::trace!(count = snapshot.len(), "publishing nights snapshot");
        self.snapshots.send_replace(snapshot);
        Ok(())
    }
}

fn insert(conn: &Connection, night: &SleepNight) -> SleepResult<i64> {
    let id = match night.id {
        Some(id) => {
            if get(conn, id)?.is_some() {
                return Err(SleepError::DuplicateId(id));
            }
            conn.execute(
                INSERT_NIGHT_WITH_ID,
                params![id, night.start_time_milli, night.end_time_milli, night.quality],
            )?;
            id
        }
        None => {
            conn.execute(INSERT_NIGHT, params![night.start_time_milli, night.end_time_milli, night.quality])?;
            conn.last_insert_rowid()
        }
    };
    tracing::debug!(id, start = night.start_time_milli, "inserted night");
    Ok(id)
}

fn get(conn: &Connection, id: i64) -> SleepResult<Option<SleepNight>> {
    Ok(conn.query_row(SELECT_BY_ID, [id], map_night).optional()?)
}

fn list_all(conn: &Connection) -> SleepResult<Vec<SleepNight>> {
    let mut stmt = conn.prepare(SELECT_ALL)?;
    let nights = stmt.query_map([], map_night)?.collect::<Result<Vec<_>, _>>()?;
    Ok(nights)
}

fn find_night(nights: &[SleepNight], id: i64) -> Option<SleepNight> {
    nights.iter().find(|night| night.id == Some(id)).cloned()
}

fn map_night(row: &Row) -> rusqlite::Result<SleepNight> {
    Ok(SleepNight {
        id: Some(row.get(0)?),
        start_time_milli: row.get(1)?,
        end_time_milli: row.get(2)?,
        quality: row.get(3)?,
    })
}
