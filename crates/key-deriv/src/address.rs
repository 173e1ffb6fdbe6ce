//! Deposit-address rendering.
//!
//! A BTC deposit address is the P2PKH encoding of an address-level key's
//! compressed public key; rendering never needs private material.

use bitcoin::{Address, Network};

use crate::ExtendedKey;

impl ExtendedKey {
    /// Renders this node's public key as a P2PKH address.
    ///
    /// Both variants render identically: a private node is projected to its
    /// public counterpart first.
    pub fn p2pkh_address(&self, network: Network) -> Address {
        let compressed = self.to_xpub().to_pub();
        Address::p2pkh(compressed.pubkey_hash(), network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_the_public_projection() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = ExtendedKey::master_from_seed(Network::Bitcoin, &seed).unwrap();
        let private_leaf = master
            .derive_child(12)
            .unwrap()
            .derive_child(0)
            .unwrap()
            .derive_child(0)
            .unwrap();
        let public_leaf = private_leaf.neuter();

        let from_private = private_leaf.p2pkh_address(Network::Bitcoin);
        let from_public = public_leaf.p2pkh_address(Network::Bitcoin);
        assert_eq!(from_private, from_public);
        // Mainnet P2PKH addresses carry the version-0 prefix.
        assert!(from_public.to_string().starts_with('1'));
    }

    #[test]
    fn sibling_indices_render_distinct_addresses() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let chain = ExtendedKey::master_from_seed(Network::Bitcoin, &seed)
            .unwrap()
            .neuter()
            .derive_child(12)
            .unwrap()
            .derive_child(0)
            .unwrap();
        let first = chain.derive_child(0).unwrap().p2pkh_address(Network::Bitcoin);
        let second = chain.derive_child(1).unwrap().p2pkh_address(Network::Bitcoin);
        assert_ne!(first, second);
    }
}
