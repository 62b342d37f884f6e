use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, list entries)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                identifier      INTEGER PRIMARY KEY AUTOINCREMENT,
                token_hash      TEXT,
                readable_name   TEXT NOT NULL CHECK (length(readable_name) <= 32)
            );

            -- Deleting a user removes their entries.
            CREATE TABLE list_entries (
                identifier      INTEGER PRIMARY KEY AUTOINCREMENT,
                content         TEXT NOT NULL CHECK (length(content) <= 256),
                author          INTEGER NOT NULL REFERENCES users(identifier) ON DELETE CASCADE,
                creation_time   INTEGER NOT NULL
            );

            CREATE INDEX idx_list_entries_author ON list_entries(author);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
