use std::sync::{Arc, OnceLock};

use shoplist_crypto::entropy::{self, Token};
use shoplist_crypto::hash;
use shoplist_types::models::{MAX_DISPLAY_NAME_CHARS, User, UserId};
use tracing::{info, warn};

use crate::{Database, Result, StoreError};

/// Anything narrower is guessable.
pub const MIN_TOKEN_BITS: u32 = 256;

/// Owns users and their token hashes. A raw token leaves this type exactly
/// once, as the return value of [`CredentialStore::issue_token`].
pub struct CredentialStore {
    db: Arc<Database>,
    token_bits: u32,
    // Hash of a discarded random token. Verified against whenever there is no
    // usable real hash, so a missing user costs as much as a wrong token.
    // Built on first use; the server warms it before accepting requests.
    decoy_hash: OnceLock<String>,
}

impl CredentialStore {
    pub fn new(db: Arc<Database>, token_bits: u32) -> Result<Self> {
        if token_bits < MIN_TOKEN_BITS {
            return Err(StoreError::Validation(format!(
                "Token width {} bits is below the minimum of {}.",
                token_bits, MIN_TOKEN_BITS
            )));
        }

        Ok(Self {
            db,
            token_bits,
            decoy_hash: OnceLock::new(),
        })
    }

    /// Build the decoy hash now rather than on the first failed check.
    pub fn prepare_decoy(&self) -> Result<()> {
        self.decoy_hash()?;
        Ok(())
    }

    fn decoy_hash(&self) -> Result<&str> {
        if let Some(decoy_hash) = self.decoy_hash.get() {
            return Ok(decoy_hash.as_str());
        }
        let decoy = entropy::generate(self.token_bits)?;
        let decoy_hash = hash::hash_token(decoy.as_str())?;
        Ok(self.decoy_hash.get_or_init(|| decoy_hash).as_str())
    }

    pub fn create_user(&self, display_name: &str) -> Result<UserId> {
        let len = display_name.chars().count();
        if len > MAX_DISPLAY_NAME_CHARS {
            return Err(StoreError::Validation(format!(
                "Display name is too long! Received {} chars, max {}.",
                len, MAX_DISPLAY_NAME_CHARS
            )));
        }

        let id = self.db.insert_user(display_name)?;
        info!(user_id = id, "Created user");
        Ok(id)
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.db
            .get_user_row(id)?
            .map(|row| row.into_user())
            .ok_or(StoreError::NotFound { kind: "user", id })
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        Ok(self
            .db
            .list_user_rows()?
            .into_iter()
            .map(|row| row.into_user())
            .collect())
    }

    /// Generate a fresh token, store only its hash and hand the raw value
    /// back. Any previously issued token stops verifying immediately.
    pub fn issue_token(&self, user_id: UserId) -> Result<Token> {
        let token = entropy::generate(self.token_bits)?;
        let token_hash = hash::hash_token(token.as_str())?;

        if !self.db.set_token_hash(user_id, &token_hash)? {
            return Err(StoreError::NotFound {
                kind: "user",
                id: user_id,
            });
        }

        info!(user_id, "Issued new token");
        Ok(token)
    }

    /// Fails closed: unknown user, no token issued, unreadable hash and
    /// store errors all verify as false.
    pub fn verify_token(&self, user_id: UserId, candidate: &str) -> bool {
        let stored = match self.db.token_hash_for(user_id) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(user_id, "Token lookup failed: {}", e);
                None
            }
        };

        match stored {
            Some(token_hash) if hash::is_well_formed(&token_hash) => {
                hash::verify_token(candidate, &token_hash)
            }
            Some(_) => {
                warn!(user_id, "Stored token hash is unreadable");
                self.decoy_verify(candidate);
                false
            }
            None => {
                self.decoy_verify(candidate);
                false
            }
        }
    }

    /// Spend the same work as a real verification without consulting the
    /// store. Always rejects.
    pub fn decoy_verify(&self, candidate: &str) {
        match self.decoy_hash() {
            Ok(decoy_hash) => {
                let _ = hash::verify_token(candidate, decoy_hash);
            }
            Err(e) => warn!("Decoy hash unavailable: {}", e),
        }
    }

    pub fn delete_by_id(&self, user_id: UserId) -> Result<()> {
        if !self.db.delete_user_row(user_id)? {
            return Err(StoreError::NotFound {
                kind: "user",
                id: user_id,
            });
        }
        info!(user_id, "Deleted user and their entries");
        Ok(())
    }

    /// Deleting a user that was never saved is a no-op.
    pub fn delete(&self, user: &User) -> Result<()> {
        match user.id() {
            Some(id) => self.delete_by_id(id),
            None => Ok(()),
        }
    }
}
