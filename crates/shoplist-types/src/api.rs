use serde::{Deserialize, Serialize};

use crate::models::{Entry, EntryId, UserId};

// -- Request fields --

/// Names of the request fields the HTTP surface reads. `uid` and `token`
/// are only ever taken from headers; the rest may also arrive as query
/// parameters.
pub mod fields {
    pub const UID: &str = "uid";
    pub const TOKEN: &str = "token";
    pub const ELEMENT_ID: &str = "elementid";
    pub const JSON: &str = "json";
    pub const ENCODING: &str = "encoding";
}

// -- Entries --

/// Wire shape of an entry. Field names are part of the public contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub identifier: EntryId,
    pub content: String,
    pub author: UserId,
    pub creation_time: i64,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            identifier: entry.id,
            content: entry.content,
            author: entry.author_id,
            creation_time: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_response_uses_contract_field_names() {
        let entry = Entry {
            id: 7,
            content: "Milk".to_string(),
            author_id: 3,
            created_at: 1_526_847_524,
        };

        let value = serde_json::to_value(EntryResponse::from(entry)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "identifier": 7,
                "content": "Milk",
                "author": 3,
                "creation_time": 1_526_847_524,
            })
        );
    }
}
