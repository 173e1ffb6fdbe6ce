//! Error types for currency drivers.

use coffer_key_deriv::DerivationError;
use coffer_keystore::{AllocatorError, KeystoreError};
use thiserror::Error;

/// Unified error type for driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The account id is negative or beyond the hardened-index ceiling.
    /// Rejected before any store access.
    #[error("account id {0} is out of range")]
    InvalidAccount(i64),

    /// The allocated chain index is beyond the derivable range. Should be
    /// unreachable given how indices are allocated.
    #[error("chain index {0} is out of range")]
    InvalidIndex(u32),

    /// No master key exists for this currency yet; every operation except
    /// master-key creation requires one.
    #[error("master key not found")]
    MasterKeyNotFound,

    /// Chain index allocation failed.
    #[error("chain index allocation: {0}")]
    Allocator(#[from] AllocatorError),

    /// Key storage or retrieval failed.
    #[error("keystore: {0}")]
    Keystore(#[from] KeystoreError),

    /// Key derivation failed.
    #[error("key derivation: {0}")]
    Derivation(#[from] DerivationError),
}

/// Result alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
