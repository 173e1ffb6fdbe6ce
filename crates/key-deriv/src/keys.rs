//! The [`ExtendedKey`] tree node and its derivation operations.

use std::{fmt, str::FromStr};

use bitcoin::{
    bip32::{self, ChildNumber, Xpriv, Xpub},
    Network,
};
use rand::RngCore;
use secp256k1::SECP256K1;
use zeroize::Zeroizing;

/// Seed length used for fresh master keys, in bytes.
pub const SEED_LEN: usize = 32;

/// Error type for key derivation operations.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    /// BIP32 derivation failed.
    #[error("BIP32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),

    /// Hardened children exist only below private keys.
    #[error("cannot derive a hardened child from a public key")]
    HardenedFromPublic,

    /// The input is not a serialized extended key.
    ///
    /// Deliberately carries no detail: the offending string may be secret
    /// material and must not travel through error messages or logs.
    #[error("not a valid extended key")]
    Deserialization,
}

/// One node of the hierarchical-deterministic key tree.
///
/// A `Private` node can sign and derive both private and public children; a
/// `Public` node can only derive public children. Converting private to
/// public ([`ExtendedKey::neuter`]) is deterministic and irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKey {
    /// Extended private key, the signing-capable variant.
    Private(Xpriv),
    /// Extended public key, sufficient for address generation.
    Public(Xpub),
}

impl ExtendedKey {
    /// Generates a fresh random seed of the recommended entropy length.
    ///
    /// The buffer is zeroized when dropped.
    pub fn generate_seed() -> Zeroizing<[u8; SEED_LEN]> {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        rand::thread_rng().fill_bytes(&mut seed[..]);
        seed
    }

    /// Creates the master private key of a new tree from seed bytes.
    pub fn master_from_seed(network: Network, seed: &[u8]) -> Result<Self, DerivationError> {
        Ok(Self::Private(Xpriv::new_master(network, seed)?))
    }

    /// Derives the ordinary (non-hardened) child at `index`.
    ///
    /// Works in both domains: a private parent yields a private child, a
    /// public parent a public one. `index` must stay below the hardened
    /// ceiling (2³¹).
    pub fn derive_child(&self, index: u32) -> Result<Self, DerivationError> {
        let child = ChildNumber::from_normal_idx(index)?;
        Ok(match self {
            Self::Private(xprv) => Self::Private(xprv.derive_priv(SECP256K1, &[child])?),
            Self::Public(xpub) => Self::Public(xpub.derive_pub(SECP256K1, &[child])?),
        })
    }

    /// Derives the hardened child at `index`.
    ///
    /// Only private parents have hardened children; a public parent fails
    /// with [`DerivationError::HardenedFromPublic`].
    pub fn derive_hardened_child(&self, index: u32) -> Result<Self, DerivationError> {
        let child = ChildNumber::from_hardened_idx(index)?;
        match self {
            Self::Private(xprv) => Ok(Self::Private(xprv.derive_priv(SECP256K1, &[child])?)),
            Self::Public(_) => Err(DerivationError::HardenedFromPublic),
        }
    }

    /// Projects this node into the public domain.
    ///
    /// Neutering a private key is deterministic: re-deriving the public
    /// counterpart always produces an identical serialized value. Neutering
    /// an already-public key returns the same key.
    pub fn neuter(&self) -> Self {
        match self {
            Self::Private(xprv) => Self::Public(Xpub::from_priv(SECP256K1, xprv)),
            Self::Public(xpub) => Self::Public(*xpub),
        }
    }

    /// Whether this node carries private key material.
    pub const fn is_private(&self) -> bool {
        matches!(self, Self::Private(_))
    }

    pub(crate) fn to_xpub(&self) -> Xpub {
        match self {
            Self::Private(xprv) => Xpub::from_priv(SECP256K1, xprv),
            Self::Public(xpub) => *xpub,
        }
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private(xprv) => fmt::Display::fmt(xprv, f),
            Self::Public(xpub) => fmt::Display::fmt(xpub, f),
        }
    }
}

impl FromStr for ExtendedKey {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(xprv) = Xpriv::from_str(s) {
            return Ok(Self::Private(xprv));
        }
        if let Ok(xpub) = Xpub::from_str(s) {
            return Ok(Self::Public(xpub));
        }
        Err(DerivationError::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f";
    const TEST_MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jP\
                                    PqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const TEST_MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8Nqtwyb\
                                    GhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

    fn test_master() -> ExtendedKey {
        let seed = hex::decode(TEST_SEED_HEX).unwrap();
        ExtendedKey::master_from_seed(Network::Bitcoin, &seed).unwrap()
    }

    #[test]
    fn master_matches_known_vector() {
        let master = test_master();
        assert_eq!(master.to_string(), TEST_MASTER_XPRV);
        assert_eq!(master.neuter().to_string(), TEST_MASTER_XPUB);
    }

    #[test]
    fn serialization_round_trips() {
        let master = test_master();
        assert_eq!(TEST_MASTER_XPRV.parse::<ExtendedKey>().unwrap(), master);
        assert_eq!(
            TEST_MASTER_XPUB.parse::<ExtendedKey>().unwrap(),
            master.neuter()
        );
        assert!("xprv-not-a-key".parse::<ExtendedKey>().is_err());
    }

    #[test]
    fn public_derivation_commutes_with_neuter() {
        let master = test_master();
        // m/12/0/42 over ordinary steps only, in both domains.
        let private_domain = master
            .derive_child(12)
            .unwrap()
            .derive_child(0)
            .unwrap()
            .derive_child(42)
            .unwrap();
        let public_domain = master
            .neuter()
            .derive_child(12)
            .unwrap()
            .derive_child(0)
            .unwrap()
            .derive_child(42)
            .unwrap();
        assert_eq!(private_domain.neuter(), public_domain);
        assert_eq!(private_domain.neuter().to_string(), public_domain.to_string());
    }

    #[test]
    fn neuter_is_idempotent() {
        let public = test_master().neuter();
        assert_eq!(public.neuter(), public);
        assert!(!public.is_private());
    }

    #[test]
    fn hardened_derivation_needs_a_private_parent() {
        let master = test_master();
        assert!(master.derive_hardened_child(12).unwrap().is_private());
        assert!(matches!(
            master.neuter().derive_hardened_child(12),
            Err(DerivationError::HardenedFromPublic)
        ));
    }

    #[test]
    fn child_index_is_bounded_by_hardened_ceiling() {
        let master = test_master();
        assert!(master.derive_child(1 << 31).is_err());
        assert!(master.derive_child((1 << 31) - 1).is_ok());
    }

    #[test]
    fn generated_seeds_differ() {
        assert_ne!(*ExtendedKey::generate_seed(), *ExtendedKey::generate_seed());
    }
}
