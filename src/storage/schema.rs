//! Database schema creation.

use rusqlite::{Connection, Result};

/// Create the events table if needed.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY,
            sport TEXT,
            home_name TEXT,
            away_name TEXT,
            start TEXT,
            event_group TEXT,
            odds_1 REAL,
            odds_x REAL,
            odds_2 REAL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_sport ON events(sport)",
        [],
    )?;

    Ok(())
}
