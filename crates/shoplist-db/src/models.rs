use std::fmt;

use shoplist_types::models::{Entry, EntryId, User, UserId};

/// Database row types — these map directly to SQLite rows.
/// Distinct from shoplist-types models to keep the token hash inside this crate.
pub(crate) struct UserRow {
    pub id: UserId,
    pub readable_name: String,
    pub token_hash: Option<String>,
}

impl fmt::Debug for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("readable_name", &self.readable_name)
            .field("has_token", &self.token_hash.is_some())
            .finish()
    }
}

impl UserRow {
    pub fn into_user(self) -> User {
        User::persisted(self.id, self.readable_name)
    }
}

#[derive(Debug)]
pub struct EntryRow {
    pub id: EntryId,
    pub content: String,
    pub author: UserId,
    pub creation_time: i64,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            id: row.id,
            content: row.content,
            author_id: row.author,
            created_at: row.creation_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_row_debug_hides_hash() {
        let row = UserRow {
            id: 1,
            readable_name: "Alice".to_string(),
            token_hash: Some("$argon2id$v=19$secret".to_string()),
        };
        let printed = format!("{:?}", row);
        assert!(!printed.contains("argon2"));
        assert!(printed.contains("has_token: true"));
    }
}
