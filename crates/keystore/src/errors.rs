//! Error types for the keystore crate.

use coffer_key_deriv::DerivationError;
use coffer_store_client::StoreError;
use thiserror::Error;

/// Error type for the path scheme.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Scope was neither `public` nor `private`.
    #[error("unexpected scope: {0}")]
    InvalidScope(String),

    /// Chain id was neither external (0) nor internal (1).
    #[error("unexpected chain id: {0}")]
    InvalidChain(u32),
}

/// Error type for chain index allocation.
#[derive(Debug, Error)]
pub enum AllocatorError {
    /// The secret store failed the read or write.
    #[error("secret store: {0}")]
    Store(#[from] StoreError),

    /// A record exists under the index path but does not hold a
    /// non-negative integer.
    #[error("chain index at {path} is not a non-negative integer")]
    Malformed {
        /// Path of the malformed record.
        path: String,
    },

    /// A guarded advance found the stored index differing from the value the
    /// caller read, meaning a concurrent allocation won.
    #[error("chain index at {path} changed since it was read")]
    Conflict {
        /// Path of the contended record.
        path: String,
    },
}

/// Error type for key storage and retrieval.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// The requested key is absent: either the path holds nothing, or the
    /// record exists without the expected field.
    #[error("{what} not found")]
    NotFound {
        /// Which key was looked up.
        what: &'static str,
    },

    /// A record exists but its value is not a valid extended key. The value
    /// itself is never echoed: it may be private key material.
    #[error("stored key at {path} is not a valid extended key")]
    Deserialization {
        /// Path of the corrupt record.
        path: String,
    },

    /// The secret store failed the read or write.
    #[error("secret store: {0}")]
    Store(#[from] StoreError),

    /// Key derivation failed while preparing material for storage.
    #[error("key derivation: {0}")]
    Derivation(#[from] DerivationError),
}

/// Result alias for keystore operations.
pub type KeystoreResult<T> = Result<T, KeystoreError>;
