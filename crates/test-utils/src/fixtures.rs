//! Deterministic key fixtures.
//!
//! The seed is BIP32 test vector 1, so every serialized form below is
//! independently checkable against the specification's vectors.

use bitcoin::Network;
use coffer_key_deriv::ExtendedKey;

/// Seed bytes of BIP32 test vector 1, hex encoded.
pub const TEST_SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f";

/// Master private key derived from [`TEST_SEED_HEX`] on mainnet.
pub const TEST_MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jP\
                                    PqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";

/// Neutered counterpart of [`TEST_MASTER_XPRV`].
pub const TEST_MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8Nqtwyb\
                                    GhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

/// Private key at `m/12'/0/42` below [`TEST_MASTER_XPRV`].
pub const TEST_ADDRESS_XPRV: &str = "xprv9ywcwX3xwc1gGPRvHdNx5XwC6mh8Gvx4GPP81adscqPmn1rTy9w\
                                     NBoRgWtigAKoLVUpgndi5f9jociyAConZaF1uMo7Rp9mnKgpdXac2hTj";

/// Neutered counterpart of [`TEST_ADDRESS_XPRV`].
pub const TEST_ADDRESS_XPUB: &str = "xpub6CvyM2armyZyUsWPPeuxSfsveoXcgPfudcJioy3VBAvkepBcWhF\
                                     cjbkAN8t6xASmcSZN5fZH4kYKaLCzzdVBdD1Mncm1PoepnwtncUhHV3a";

/// The test master key, built from the raw seed.
pub fn test_master_key() -> ExtendedKey {
    let seed = hex::decode(TEST_SEED_HEX).expect("valid fixture hex");
    ExtendedKey::master_from_seed(Network::Bitcoin, &seed).expect("valid fixture seed")
}

/// The private address key at `m/12'/0/42`, derived from the test master.
pub fn test_address_key() -> ExtendedKey {
    test_master_key()
        .derive_hardened_child(12)
        .expect("fixture derivation")
        .derive_child(0)
        .expect("fixture derivation")
        .derive_child(42)
        .expect("fixture derivation")
}
