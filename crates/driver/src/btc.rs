//! The Bitcoin deposit-address driver.

use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::Network;
use coffer_key_deriv::ExtendedKey;
use coffer_keystore::{Chain, ChainIndexAllocator, Keystore, KeystoreError};
use coffer_store_client::SecretStore;
use tracing::info;

use crate::{DepositAddress, DepositAddressDetails, DepositDriver, DriverError, DriverResult};

/// Largest ordinary derivation index, one below the hardened ceiling.
const MAX_CHILD_INDEX: u32 = (1 << 31) - 1;

/// Bitcoin driver over one currency-scoped key tree.
#[derive(Debug, Clone)]
pub struct BtcDriver {
    ccy: String,
    network: Network,
    keystore: Keystore,
    allocator: ChainIndexAllocator,
}

impl BtcDriver {
    /// Creates a driver for the key tree scoped under `ccy`.
    pub fn new(ccy: impl Into<String>, store: Arc<dyn SecretStore>, network: Network) -> Self {
        Self {
            ccy: ccy.into(),
            network,
            keystore: Keystore::new(store.clone(), network),
            allocator: ChainIndexAllocator::new(store),
        }
    }

    /// Re-derives the private signing key of the issued address at
    /// `address_id` on the external chain, persists both its scope records,
    /// and returns it.
    ///
    /// Address issuance runs in the public domain and never materializes
    /// signing keys; this is the on-demand private-domain counterpart. The
    /// derivation path mirrors issuance exactly (all ordinary steps), so the
    /// returned key's public projection equals the issued address key.
    pub async fn recover_address_key(
        &self,
        account_id: i64,
        address_id: u32,
    ) -> DriverResult<ExtendedKey> {
        let account = validate_account(account_id)?;
        let master = require_master(self.keystore.get_master_key_private(&self.ccy).await)?;

        let key = master
            .derive_child(account)?
            .derive_child(Chain::External.index())?
            .derive_child(address_id)?;
        self.keystore
            .store_account_address(&key, &self.ccy, account, Chain::External, address_id)
            .await?;
        info!(ccy = %self.ccy, account, address_id, "recovered address signing key");
        Ok(key)
    }
}

#[async_trait]
impl DepositDriver for BtcDriver {
    async fn create_master_key(&self) -> DriverResult<()> {
        self.keystore.create_master_key(&self.ccy).await?;
        Ok(())
    }

    async fn create_deposit_address(
        &self,
        account_id: i64,
        uid: &str,
    ) -> DriverResult<DepositAddress> {
        let account = validate_account(account_id)?;

        let idx = self
            .allocator
            .get(&self.ccy, account, Chain::External)
            .await?
            .unwrap_or(0);
        if idx > MAX_CHILD_INDEX {
            return Err(DriverError::InvalidIndex(idx));
        }

        let master = require_master(self.keystore.get_master_key_public(&self.ccy).await)?;

        // Entirely public-domain: M -> account -> external chain -> index.
        // The account step is ordinary here, not hardened, or the public
        // master could not derive it.
        let address_key = master
            .derive_child(account)?
            .derive_child(Chain::External.index())?
            .derive_child(idx)?;
        let address = address_key.p2pkh_address(self.network);

        self.keystore
            .store_account_address(&address_key, &self.ccy, account, Chain::External, idx)
            .await?;

        // Advancing the counter is the last step; if it fails, the address
        // above was already computed and a retry will re-issue the same
        // index. The get/derive/set sequence is not mutually exclusive
        // across concurrent callers either.
        self.allocator
            .set(idx + 1, &self.ccy, account, Chain::External)
            .await?;

        info!(ccy = %self.ccy, account, index = idx, "issued deposit address");
        Ok(DepositAddress {
            address: address.to_string(),
            details: DepositAddressDetails {
                uid: uid.to_string(),
                ex_address_id: idx,
            },
        })
    }
}

fn validate_account(account_id: i64) -> Result<u32, DriverError> {
    if !(0..=i64::from(MAX_CHILD_INDEX)).contains(&account_id) {
        return Err(DriverError::InvalidAccount(account_id));
    }
    Ok(account_id as u32)
}

fn require_master(fetched: Result<ExtendedKey, KeystoreError>) -> DriverResult<ExtendedKey> {
    fetched.map_err(|e| match e {
        KeystoreError::NotFound { .. } => DriverError::MasterKeyNotFound,
        other => DriverError::Keystore(other),
    })
}
