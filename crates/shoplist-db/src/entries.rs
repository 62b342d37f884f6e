use std::sync::Arc;

use shoplist_types::models::{Entry, EntryId, MAX_CONTENT_CHARS, UserId};
use tracing::debug;

use crate::{Database, Result, StoreError};

/// Owns list entries. Entries are never edited in place.
pub struct EntryStore {
    db: Arc<Database>,
}

impl EntryStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create_entry(&self, content: &str, author_id: UserId) -> Result<Entry> {
        let len = content.chars().count();
        if len > MAX_CONTENT_CHARS {
            return Err(StoreError::Validation(format!(
                "Content is too long! Received {} chars, max {}.",
                len, MAX_CONTENT_CHARS
            )));
        }

        let created_at = chrono::Utc::now().timestamp();
        let id = self
            .db
            .insert_entry(content, author_id, created_at)?
            .ok_or_else(|| {
                StoreError::Validation(format!("Author {} does not exist.", author_id))
            })?;

        debug!(entry_id = id, author_id, "Created entry");
        Ok(Entry {
            id,
            content: content.to_string(),
            author_id,
            created_at,
        })
    }

    pub fn get_entry(&self, id: EntryId) -> Result<Entry> {
        self.db
            .get_entry_row(id)?
            .map(Entry::from)
            .ok_or(StoreError::NotFound { kind: "entry", id })
    }

    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        Ok(self
            .db
            .list_entry_rows()?
            .into_iter()
            .map(Entry::from)
            .collect())
    }

    pub fn delete_entry(&self, id: EntryId) -> Result<()> {
        if !self.db.delete_entry_row(id)? {
            return Err(StoreError::NotFound { kind: "entry", id });
        }
        debug!(entry_id = id, "Deleted entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn stores() -> (EntryStore, UserId) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let author = db.insert_user("Alice").unwrap();
        (EntryStore::new(db), author)
    }

    #[test]
    fn create_then_get() {
        let (entries, author) = stores();
        let before = chrono::Utc::now().timestamp();
        let created = entries.create_entry("Milk", author).unwrap();
        let after = chrono::Utc::now().timestamp();

        assert_eq!(created.content, "Milk");
        assert_eq!(created.author_id, author);
        assert!(created.created_at >= before && created.created_at <= after);
        assert_eq!(entries.get_entry(created.id).unwrap(), created);
    }

    #[test]
    fn content_length_boundary() {
        let (entries, author) = stores();

        let exact = "x".repeat(MAX_CONTENT_CHARS);
        assert_eq!(entries.create_entry(&exact, author).unwrap().content, exact);

        // Multi-byte characters count once each.
        let wide = "ü".repeat(MAX_CONTENT_CHARS);
        assert!(entries.create_entry(&wide, author).is_ok());

        match entries.create_entry(&"x".repeat(257), author) {
            Err(StoreError::Validation(msg)) => {
                assert!(msg.contains("257"));
                assert!(msg.contains("256"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn empty_content_allowed() {
        let (entries, author) = stores();
        let created = entries.create_entry("", author).unwrap();
        assert_eq!(entries.get_entry(created.id).unwrap().content, "");
    }

    #[test]
    fn unknown_author_rejected() {
        let (entries, author) = stores();
        assert!(matches!(
            entries.create_entry("Eggs", author + 100),
            Err(StoreError::Validation(_))
        ));
        assert!(entries.list_entries().unwrap().is_empty());
    }

    #[test]
    fn missing_entry_is_not_found() {
        let (entries, _) = stores();
        assert!(matches!(
            entries.get_entry(5),
            Err(StoreError::NotFound { kind: "entry", id: 5 })
        ));
        assert!(matches!(
            entries.delete_entry(5),
            Err(StoreError::NotFound { kind: "entry", id: 5 })
        ));
    }

    #[test]
    fn delete_removes_only_target() {
        let (entries, author) = stores();
        let keep = entries.create_entry("Bread", author).unwrap();
        let gone = entries.create_entry("Butter", author).unwrap();

        entries.delete_entry(gone.id).unwrap();

        assert!(matches!(
            entries.get_entry(gone.id),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            entries.delete_entry(gone.id),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(entries.get_entry(keep.id).unwrap(), keep);
    }

    #[test]
    fn ids_are_not_reused() {
        let (entries, author) = stores();
        let first = entries.create_entry("a", author).unwrap();
        entries.delete_entry(first.id).unwrap();
        let second = entries.create_entry("b", author).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn list_returns_every_entry() {
        let (entries, author) = stores();
        let created: HashSet<Entry> = ["Milk", "Eggs", "Flour"]
            .into_iter()
            .map(|c| entries.create_entry(c, author).unwrap())
            .collect();

        let listed: HashSet<Entry> = entries.list_entries().unwrap().into_iter().collect();
        assert_eq!(listed, created);
    }
}
