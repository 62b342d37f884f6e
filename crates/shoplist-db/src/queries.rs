use rusqlite::{Connection, OptionalExtension, params};
use shoplist_types::models::{EntryId, UserId};

use crate::models::{EntryRow, UserRow};
use crate::{Database, Result};

impl Database {
    // -- Users --

    pub fn insert_user(&self, readable_name: &str) -> Result<UserId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (readable_name) VALUES (?1)",
                [readable_name],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub(crate) fn get_user_row(&self, id: UserId) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub(crate) fn list_user_rows(&self) -> Result<Vec<UserRow>> {
        self.with_conn(query_users)
    }

    /// Replace the stored hash. Returns false when the user does not exist.
    pub(crate) fn set_token_hash(&self, id: UserId, token_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET token_hash = ?1 WHERE identifier = ?2",
                params![token_hash, id],
            )?;
            Ok(changed > 0)
        })
    }

    /// `None` both for a missing user and for a user with no token issued.
    pub(crate) fn token_hash_for(&self, id: UserId) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let hash: Option<Option<String>> = conn
                .query_row(
                    "SELECT token_hash FROM users WHERE identifier = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(hash.flatten())
        })
    }

    /// Returns false when no row matched.
    pub fn delete_user_row(&self, id: UserId) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE identifier = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Entries --

    /// Insert an entry after checking the author exists, in one transaction.
    /// Returns `None` when the author is unknown.
    pub fn insert_entry(
        &self,
        content: &str,
        author: UserId,
        creation_time: i64,
    ) -> Result<Option<EntryId>> {
        self.with_tx(|tx| {
            if !user_exists(tx, author)? {
                return Ok(None);
            }
            tx.execute(
                "INSERT INTO list_entries (content, author, creation_time) VALUES (?1, ?2, ?3)",
                params![content, author, creation_time],
            )?;
            Ok(Some(tx.last_insert_rowid()))
        })
    }

    pub fn get_entry_row(&self, id: EntryId) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| query_entry_by_id(conn, id))
    }

    pub fn list_entry_rows(&self) -> Result<Vec<EntryRow>> {
        self.with_conn(query_entries)
    }

    /// Returns false when no row matched.
    pub fn delete_entry_row(&self, id: EntryId) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM list_entries WHERE identifier = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn user_exists(conn: &Connection, id: UserId) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE identifier = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn query_user_by_id(conn: &Connection, id: UserId) -> Result<Option<UserRow>> {
    let mut stmt = conn
        .prepare("SELECT identifier, readable_name, token_hash FROM users WHERE identifier = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                readable_name: row.get(1)?,
                token_hash: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare("SELECT identifier, readable_name, token_hash FROM users")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                readable_name: row.get(1)?,
                token_hash: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_entry_by_id(conn: &Connection, id: EntryId) -> Result<Option<EntryRow>> {
    let mut stmt = conn.prepare(
        "SELECT identifier, content, author, creation_time FROM list_entries WHERE identifier = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                content: row.get(1)?,
                author: row.get(2)?,
                creation_time: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

// Full table scan; no ordering contract.
fn query_entries(conn: &Connection) -> Result<Vec<EntryRow>> {
    let mut stmt =
        conn.prepare("SELECT identifier, content, author, creation_time FROM list_entries")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                content: row.get(1)?,
                author: row.get(2)?,
                creation_time: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
