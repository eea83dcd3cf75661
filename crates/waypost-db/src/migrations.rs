use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Create the schema if it does not exist yet. Safe to run on every open.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            username    TEXT NOT NULL PRIMARY KEY,
            password    TEXT NOT NULL,
            salt        TEXT NOT NULL,
            email       TEXT NOT NULL,
            nickname    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS locations (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            name                TEXT NOT NULL,
            description         TEXT NOT NULL,
            city                TEXT NOT NULL,
            country             TEXT NOT NULL,
            street_address      TEXT NOT NULL,
            posted_at           INTEGER NOT NULL,
            author              TEXT NOT NULL,
            latitude            REAL,
            longitude           REAL,
            weather             REAL,
            visit_count         INTEGER NOT NULL DEFAULT 1,
            modified_at         INTEGER,
            modification_reason TEXT,
            CHECK ((latitude IS NULL) = (longitude IS NULL)),
            CHECK (latitude IS NOT NULL OR weather IS NULL)
        );

        CREATE INDEX IF NOT EXISTS idx_locations_visits
            ON locations(visit_count DESC, id);

        -- location_ids is a comma-joined list, validated on write
        CREATE TABLE IF NOT EXISTS tours (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            description     TEXT NOT NULL,
            location_ids    TEXT NOT NULL
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
