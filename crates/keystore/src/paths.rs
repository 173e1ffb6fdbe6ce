//! Path scheme for the secret store.
//!
//! Every stored object is addressed as
//! `{scope}/{currency}/...`, with the scope partition first so that store
//! policies can grant a component the `public` subtree without ever exposing
//! `private` paths. Layout:
//!
//! ```text
//! {scope}/{ccy}/master/key                          master key record
//! {scope}/{ccy}/account/{account}/{chain}/index     next-address counter
//! {scope}/{ccy}/account/{account}/{chain}/{addr}/key   address key record
//! ```
//!
//! [`Scope`] and [`Chain`] are closed enums, so a path can never be built
//! from an invalid scope or chain id; stringly-typed inputs are validated at
//! the [`FromStr`]/[`TryFrom`] boundary.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::PathError;

/// Security partition a record is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Neutered keys and index counters; safe to expose to address
    /// generation and balance checking.
    Public,
    /// Full extended private keys; needed only for signing.
    Private,
}

impl Scope {
    /// Canonical path segment for this scope.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(PathError::InvalidScope(other.to_string())),
        }
    }
}

/// BIP32-style sub-branch of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Receiving addresses handed out to depositors.
    External,
    /// Internal / change addresses.
    Internal,
}

impl Chain {
    /// Numeric chain id, which is also the derivation index of the chain
    /// level.
    pub const fn index(&self) -> u32 {
        match self {
            Self::External => 0,
            Self::Internal => 1,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl TryFrom<u32> for Chain {
    type Error = PathError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::External),
            1 => Ok(Self::Internal),
            other => Err(PathError::InvalidChain(other)),
        }
    }
}

/// Path of a currency's master key record.
pub fn master_key(scope: Scope, ccy: &str) -> String {
    format!("{scope}/{ccy}/master/key")
}

/// Path of an account chain's subtree root.
pub fn chain_root(scope: Scope, ccy: &str, account: u32, chain: Chain) -> String {
    format!("{scope}/{ccy}/account/{account}/{chain}")
}

/// Path of an account chain's next-address counter.
pub fn chain_index(scope: Scope, ccy: &str, account: u32, chain: Chain) -> String {
    format!("{}/index", chain_root(scope, ccy, account, chain))
}

/// Path of one address key record.
pub fn address_key(scope: Scope, ccy: &str, account: u32, chain: Chain, address_id: u32) -> String {
    format!("{}/{address_id}/key", chain_root(scope, ccy, account, chain))
}
