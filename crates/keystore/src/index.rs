//! Next-address index allocation.

use std::sync::Arc;

use coffer_store_client::{SecretData, SecretStore};
use tracing::debug;

use crate::{
    errors::AllocatorError,
    paths::{self, Chain, Scope},
};

const INDEX_FIELD: &str = "index";

/// Tracks, per (currency, account, chain), the next unused address index.
///
/// The counter lives under the public scope: it carries no secret material.
/// It is monotonically non-decreasing and only this type mutates it.
///
/// Allocation is get-then-set in two separate store calls with no mutual
/// exclusion, so two concurrent callers for the same (currency, account,
/// chain) can observe the same index. [`ChainIndexAllocator::set_guarded`]
/// narrows that window for callers that want to detect the collision.
#[derive(Debug, Clone)]
pub struct ChainIndexAllocator {
    store: Arc<dyn SecretStore>,
}

impl ChainIndexAllocator {
    /// Creates an allocator over the given store.
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Reads the next unused index for (currency, account, chain).
    ///
    /// `Ok(None)` means the counter was never initialized; callers treat it
    /// as index 0. A record holding anything but a non-negative integer is
    /// [`AllocatorError::Malformed`]; store failures propagate as-is.
    pub async fn get(
        &self,
        ccy: &str,
        account: u32,
        chain: Chain,
    ) -> Result<Option<u32>, AllocatorError> {
        let path = paths::chain_index(Scope::Public, ccy, account, chain);
        let Some(data) = self.store.read(&path).await? else {
            return Ok(None);
        };
        // A record without the index field counts as never-initialized, the
        // same as an absent record.
        let Some(raw) = data.get(INDEX_FIELD) else {
            return Ok(None);
        };
        raw.parse::<u32>()
            .map(Some)
            .map_err(|_| AllocatorError::Malformed { path })
    }

    /// Writes `index` as the next unused index for (currency, account,
    /// chain), overwriting the previous value.
    pub async fn set(
        &self,
        index: u32,
        ccy: &str,
        account: u32,
        chain: Chain,
    ) -> Result<(), AllocatorError> {
        let path = paths::chain_index(Scope::Public, ccy, account, chain);
        debug!(%path, index, "storing chain index");
        let mut data = SecretData::new();
        data.insert(INDEX_FIELD.to_string(), index.to_string());
        Ok(self.store.write(&path, data).await?)
    }

    /// Writes `index` only if the stored counter still equals `observed`
    /// (with `None` meaning never initialized); fails with
    /// [`AllocatorError::Conflict`] otherwise.
    ///
    /// The compare and the write are still two store calls: against a plain
    /// key/value store this detects most concurrent allocations but cannot
    /// exclude all of them. Callers needing exactly-once allocation must
    /// serialize per (currency, account, chain) on top of this.
    pub async fn set_guarded(
        &self,
        observed: Option<u32>,
        index: u32,
        ccy: &str,
        account: u32,
        chain: Chain,
    ) -> Result<(), AllocatorError> {
        let current = self.get(ccy, account, chain).await?;
        if current != observed {
            let path = paths::chain_index(Scope::Public, ccy, account, chain);
            return Err(AllocatorError::Conflict { path });
        }
        self.set(index, ccy, account, chain).await
    }
}
