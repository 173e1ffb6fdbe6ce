//! Master-key and address-key persistence.

use std::sync::Arc;

use bitcoin::Network;
use coffer_key_deriv::ExtendedKey;
use coffer_store_client::{SecretData, SecretStore};
use tracing::{debug, info};

use crate::{
    errors::{KeystoreError, KeystoreResult},
    paths::{self, Chain, Scope},
};

const PRIV_FIELD: &str = "priv";
const PUB_FIELD: &str = "pub";

/// Secret-store-backed storage for the key hierarchy.
///
/// Every key is stored twice: the full private key under its private-scope
/// path (field `priv`) and the neutered public key under its public-scope
/// path (field `pub`). The store is the sole durable owner of key material;
/// this type holds keys only transiently in memory.
#[derive(Debug, Clone)]
pub struct Keystore {
    store: Arc<dyn SecretStore>,
    network: Network,
}

impl Keystore {
    /// Creates a keystore over the given store.
    ///
    /// `network` selects the serialization prefix and address format of keys
    /// generated through this keystore.
    pub fn new(store: Arc<dyn SecretStore>, network: Network) -> Self {
        Self { store, network }
    }

    /// Generates a fresh master key for `ccy` and persists both scope
    /// records.
    ///
    /// **No existence check is performed**: calling this twice for the same
    /// currency replaces the previous master key and orphans every address
    /// and signing key ever derived from it. The caller must ensure this
    /// runs at most once per currency.
    pub async fn create_master_key(&self, ccy: &str) -> KeystoreResult<ExtendedKey> {
        let seed = ExtendedKey::generate_seed();
        let master = ExtendedKey::master_from_seed(self.network, &seed[..])?;
        self.store_master_key(&master, ccy).await?;
        info!(%ccy, "created master key");
        Ok(master)
    }

    /// Persists a master private key under both scopes for `ccy`.
    ///
    /// Two writes, not transactional: if the public write fails after the
    /// private one succeeded, the private record stands alone until the next
    /// successful store.
    pub async fn store_master_key(&self, master: &ExtendedKey, ccy: &str) -> KeystoreResult<()> {
        let path = paths::master_key(Scope::Private, ccy);
        debug!(%path, "storing master key record");
        self.store.write(&path, record(PRIV_FIELD, master)).await?;

        let neutered = master.neuter();
        let path = paths::master_key(Scope::Public, ccy);
        debug!(%path, "storing master key record");
        self.store.write(&path, record(PUB_FIELD, &neutered)).await?;
        Ok(())
    }

    /// Fetches the neutered master key of `ccy`.
    pub async fn get_master_key_public(&self, ccy: &str) -> KeystoreResult<ExtendedKey> {
        let path = paths::master_key(Scope::Public, ccy);
        self.read_key(path, PUB_FIELD, "public master key").await
    }

    /// Fetches the full master private key of `ccy`.
    pub async fn get_master_key_private(&self, ccy: &str) -> KeystoreResult<ExtendedKey> {
        let path = paths::master_key(Scope::Private, ccy);
        self.read_key(path, PRIV_FIELD, "private master key").await
    }

    /// Checks that the stored public master key of `ccy` is exactly the
    /// neutered projection of the stored private one.
    ///
    /// Neutering is deterministic, so any mismatch means one of the two
    /// records drifted (partial overwrite, corruption, manual edit).
    pub async fn verify_master_key(&self, ccy: &str) -> KeystoreResult<bool> {
        let private = self.get_master_key_private(ccy).await?;
        let public = self.get_master_key_public(ccy).await?;
        Ok(private.neuter().to_string() == public.to_string())
    }

    /// Persists an address-level key under (currency, account, chain,
    /// address index).
    ///
    /// A private key lands in both scopes, `priv` first and then its
    /// neutered `pub` counterpart; the two writes are not transactional, so
    /// a failing public write leaves the private record without its public
    /// counterpart. A public key only produces the public record.
    pub async fn store_account_address(
        &self,
        key: &ExtendedKey,
        ccy: &str,
        account: u32,
        chain: Chain,
        address_id: u32,
    ) -> KeystoreResult<()> {
        if key.is_private() {
            let path = paths::address_key(Scope::Private, ccy, account, chain, address_id);
            debug!(%path, "storing address key record");
            self.store.write(&path, record(PRIV_FIELD, key)).await?;
        }

        let neutered = key.neuter();
        let path = paths::address_key(Scope::Public, ccy, account, chain, address_id);
        debug!(%path, "storing address key record");
        self.store.write(&path, record(PUB_FIELD, &neutered)).await?;
        Ok(())
    }

    /// Fetches the public key of one issued address.
    pub async fn get_public_address(
        &self,
        ccy: &str,
        account: u32,
        chain: Chain,
        address_id: u32,
    ) -> KeystoreResult<ExtendedKey> {
        let path = paths::address_key(Scope::Public, ccy, account, chain, address_id);
        self.read_key(path, PUB_FIELD, "public address key").await
    }

    /// Fetches the private signing key of one issued address.
    pub async fn get_private_address(
        &self,
        ccy: &str,
        account: u32,
        chain: Chain,
        address_id: u32,
    ) -> KeystoreResult<ExtendedKey> {
        let path = paths::address_key(Scope::Private, ccy, account, chain, address_id);
        self.read_key(path, PRIV_FIELD, "private address key").await
    }

    async fn read_key(
        &self,
        path: String,
        field: &str,
        what: &'static str,
    ) -> KeystoreResult<ExtendedKey> {
        let Some(data) = self.store.read(&path).await? else {
            return Err(KeystoreError::NotFound { what });
        };
        let Some(raw) = data.get(field) else {
            return Err(KeystoreError::NotFound { what });
        };
        raw.parse()
            .map_err(|_| KeystoreError::Deserialization { path })
    }
}

fn record(field: &'static str, key: &ExtendedKey) -> SecretData {
    let mut data = SecretData::new();
    data.insert(field.to_string(), key.to_string());
    data
}
