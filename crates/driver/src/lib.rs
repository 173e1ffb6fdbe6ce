//! Currency drivers: the public contract of the key-management core.
//!
//! A driver owns one currency's key tree and exposes exactly two operations
//! to the API layer: master-key creation and deposit-address issuance. The
//! set of supported currencies is the closed [`Driver`] enum behind the
//! [`DepositDriver`] capability trait; adding a currency means adding a
//! variant, not touching dispatch logic elsewhere.
//!
//! Per currency the driver is a two-state machine, `NoMasterKey` and
//! `MasterKeyReady`. Only [`DepositDriver::create_master_key`] performs the
//! transition; every other operation fails with
//! [`DriverError::MasterKeyNotFound`] until it has happened.

use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::Network;
use coffer_store_client::SecretStore;
use serde::{Deserialize, Serialize};

mod btc;
pub mod errors;

pub use btc::BtcDriver;
pub use errors::{DriverError, DriverResult};

#[cfg(test)]
mod tests;

/// A freshly issued deposit address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAddress {
    /// Chain-specific address string to hand to the depositor.
    pub address: String,
    /// Issuance details echoed back to the caller.
    pub details: DepositAddressDetails,
}

/// Details of one address issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAddressDetails {
    /// Caller-supplied user reference.
    pub uid: String,
    /// Address index allocated for this issuance.
    pub ex_address_id: u32,
}

/// Operations every currency driver provides.
#[async_trait]
pub trait DepositDriver {
    /// Creates this currency's master key and persists it under both
    /// scopes.
    ///
    /// **Unconditional**: an existing master key is silently replaced,
    /// orphaning everything derived from it. An administrative operation to
    /// be run at most once per currency.
    async fn create_master_key(&self) -> DriverResult<()>;

    /// Derives the next receiving address for `account_id`, records its
    /// public key, advances the account's external chain index, and returns
    /// the address together with its issuance details.
    async fn create_deposit_address(
        &self,
        account_id: i64,
        uid: &str,
    ) -> DriverResult<DepositAddress>;
}

/// The closed set of supported currency drivers.
#[derive(Debug)]
pub enum Driver {
    /// Bitcoin.
    Btc(BtcDriver),
}

impl Driver {
    /// Resolves a currency code to its driver, or `None` for an unsupported
    /// code.
    pub fn from_code(code: &str, store: Arc<dyn SecretStore>, network: Network) -> Option<Self> {
        match code {
            "btc" => Some(Self::Btc(BtcDriver::new(code, store, network))),
            _ => None,
        }
    }

    /// Re-derives the private signing key of a previously issued address
    /// and persists both its scope records.
    pub async fn recover_address_key(
        &self,
        account_id: i64,
        address_id: u32,
    ) -> DriverResult<coffer_key_deriv::ExtendedKey> {
        match self {
            Self::Btc(driver) => driver.recover_address_key(account_id, address_id).await,
        }
    }
}

#[async_trait]
impl DepositDriver for Driver {
    async fn create_master_key(&self) -> DriverResult<()> {
        match self {
            Self::Btc(driver) => driver.create_master_key().await,
        }
    }

    async fn create_deposit_address(
        &self,
        account_id: i64,
        uid: &str,
    ) -> DriverResult<DepositAddress> {
        match self {
            Self::Btc(driver) => driver.create_deposit_address(account_id, uid).await,
        }
    }
}
