//! Shoplist Crypto Library
//!
//! Token generation and token hashing for the credential store.
//! Raw tokens are base-36 strings drawn from the OS CSPRNG; only their
//! Argon2id hashes are ever persisted.

pub mod entropy;
pub mod hash;
