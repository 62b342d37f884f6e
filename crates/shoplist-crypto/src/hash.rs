use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("token hashing failed: {0}")]
pub struct HashError(String);

/// Hash a raw token with Argon2id and a fresh random salt.
/// Returns the PHC string (algorithm, params, salt and digest).
pub fn hash_token(token: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map_err(|e| HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Whether `stored_hash` parses as a PHC string at all. Callers use this to
/// route unreadable hashes through the same work as a real check.
pub fn is_well_formed(stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok()
}

/// Check a candidate token against a stored PHC string.
/// An unparseable stored hash verifies as false.
pub fn verify_token(candidate: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
