//! Secret-store-backed persistence for the key hierarchy.
//!
//! Key material is partitioned by scope before anything else: the `public`
//! scope holds neutered keys and the chain index counters (safe to expose to
//! address-generation and balance-checking logic), the `private` scope holds
//! full extended private keys (needed only for signing). Below the scope,
//! everything is partitioned by currency code.
//!
//! Three pieces live here:
//!
//! - [`paths`]: the pure path scheme mapping (scope, currency, account,
//!   chain, address index) tuples to store paths;
//! - [`ChainIndexAllocator`]: the per-(currency, account, chain) counter of
//!   the next unused address index;
//! - [`Keystore`]: master-key and per-address key storage enforcing the
//!   scope split.

pub mod errors;
mod index;
pub mod paths;
mod store;

pub use errors::{AllocatorError, KeystoreError, KeystoreResult, PathError};
pub use index::ChainIndexAllocator;
pub use paths::{Chain, Scope};
pub use store::Keystore;
