//! Hierarchical-deterministic key primitives for the key-management core.
//!
//! This crate wraps BIP32 extended keys behind one [`ExtendedKey`] type that
//! carries either a private or a public node of the key tree. Derivation is a
//! pure function of (parent key, index, hardened flag): identical inputs
//! always yield identical children, which is what lets address issuance run
//! entirely in the public domain while signing keys are re-derived on demand
//! from the private master.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bitcoin::Network;
//! use coffer_key_deriv::ExtendedKey;
//!
//! let seed = ExtendedKey::generate_seed();
//! let master = ExtendedKey::master_from_seed(Network::Bitcoin, &seed[..])?;
//!
//! // Public-domain derivation: account -> external chain -> address index.
//! let address_key = master.neuter().derive_child(12)?.derive_child(0)?.derive_child(0)?;
//! let address = address_key.p2pkh_address(Network::Bitcoin);
//! ```

mod address;
mod keys;

pub use keys::{DerivationError, ExtendedKey, SEED_LEN};
