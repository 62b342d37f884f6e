use std::sync::Arc;

use shoplist_db::{CredentialStore, Database, EntryStore, StoreError};
use shoplist_types::models::UserId;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::extract::Credentials;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub credentials: CredentialStore,
    pub entries: EntryStore,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, token_bits: u32) -> Result<Self, StoreError> {
        let credentials = CredentialStore::new(db.clone(), token_bits)?;
        credentials.prepare_decoy()?;
        Ok(Self {
            credentials,
            entries: EntryStore::new(db),
        })
    }
}

/// The authorization decision. Missing or malformed ids, missing tokens,
/// unknown users and wrong tokens all come back as the same `false`, and
/// every path performs one hash verification.
pub fn authorize(credentials: &CredentialStore, user_id: Option<&str>, token: Option<&str>) -> bool {
    let user_id = user_id.and_then(|raw| raw.parse::<UserId>().ok());

    match (user_id, token) {
        (Some(user_id), Some(token)) => credentials.verify_token(user_id, token),
        (_, token) => {
            credentials.decoy_verify(token.unwrap_or_default());
            false
        }
    }
}

/// Run the gate off the async runtime. On success returns the caller's id,
/// which handlers use for author attribution.
pub async fn admit(state: &AppState, presented: Credentials) -> Result<UserId, ApiError> {
    let state = state.clone();
    let admitted = tokio::task::spawn_blocking(move || {
        let user_id = presented.uid.as_deref().and_then(|raw| raw.parse::<UserId>().ok());
        let allowed = authorize(
            &state.credentials,
            presented.uid.as_deref(),
            presented.token.as_deref(),
        );
        allowed.then_some(user_id).flatten()
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?;

    match admitted {
        Some(user_id) => Ok(user_id),
        None => {
            debug!("Rejected request credentials");
            Err(ApiError::Unauthorized)
        }
    }
}
