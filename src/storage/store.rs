use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::info;

use super::schema::create_tables;
use crate::models::NormalizedEvent;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to discard previous store {path}: {source}")]
    Discard {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Single-owner handle on the snapshot database.
///
/// Everything written through one handle lands in a single transaction that
/// is committed by [`SnapshotStore::finish`].
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Discard any database at `path` and start an empty one
    pub fn create_fresh(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            std::fs::remove_file(path).map_err(|source| StoreError::Discard {
                path: path.to_path_buf(),
                source,
            })?;
            info!("{} deleted", path.display());
        }
        let store = Self::open(path)?;
        info!("{} created", path.display());
        Ok(store)
    }

    /// Open the database at `path`, keeping existing rows
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path.as_ref())?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        create_tables(&conn)?;
        conn.execute_batch("BEGIN")?;
        Ok(Self { conn })
    }

    /// Insert records whose id is not stored yet. Returns how many rows were
    /// actually added.
    pub fn insert_bulk(&self, events: &[NormalizedEvent]) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO events (id, sport, home_name, away_name, start, event_group, odds_1, odds_x, odds_2)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        let mut inserted = 0;
        for event in events {
            inserted += stmt.execute(params![
                event.id,
                event.sport,
                event.home_name,
                event.away_name,
                event.start,
                event.group,
                event.odds_1,
                event.odds_x,
                event.odds_2,
            ])?;
        }
        Ok(inserted)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All stored records ordered by id
    pub fn load_all(&self) -> Result<Vec<NormalizedEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sport, home_name, away_name, start, event_group, odds_1, odds_x, odds_2
             FROM events ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(NormalizedEvent {
                id: row.get(0)?,
                sport: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                home_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                away_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                start: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                group: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                odds_1: row.get(6)?,
                odds_x: row.get(7)?,
                odds_2: row.get(8)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    /// Commit the run's writes and close the connection
    pub fn finish(self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}
