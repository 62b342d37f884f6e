//! Domain records shared between the store and the HTTP layer.
//! Token material never appears here; hashes stay inside shoplist-db.

pub type UserId = i64;
pub type EntryId = i64;

pub const MAX_DISPLAY_NAME_CHARS: usize = 32;
pub const MAX_CONTENT_CHARS: usize = 256;

/// A user as seen outside the store. `id` is `None` until the record has
/// been written; only the store hands out users that carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<UserId>,
    pub display_name: String,
}

impl User {
    /// A user that has not been saved yet.
    pub fn new(display_name: String) -> Self {
        Self {
            id: None,
            display_name,
        }
    }

    pub fn persisted(id: UserId, display_name: String) -> Self {
        Self {
            id: Some(id),
            display_name,
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_users_are_unsaved() {
        let user = User::new("Alice".to_string());
        assert_eq!(user.id(), None);
        assert!(!user.is_persisted());

        let user = User::persisted(7, "Alice".to_string());
        assert_eq!(user.id(), Some(7));
        assert!(user.is_persisted());
    }
}

/// A single list entry. Immutable once created: there is no update path,
/// only delete and recreate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub id: EntryId,
    pub content: String,
    pub author_id: UserId,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
}
