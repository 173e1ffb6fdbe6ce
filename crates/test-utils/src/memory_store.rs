//! In-memory [`SecretStore`] double with fault injection.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use coffer_store_client::{SecretData, SecretStore, StoreError, StoreResult};
use tokio::sync::RwLock;

/// In-memory secret store.
///
/// Mirrors the remote store's observable contract: reads of absent paths are
/// `Ok(None)`, writes overwrite. Injected faults reproduce the store's
/// `403 permission denied` rejection so error paths stay realistic.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, SecretData>>>,
    writes: Arc<AtomicUsize>,
    deny_reads: Arc<AtomicBool>,
    /// Successful-write count beyond which writes get denied; `usize::MAX`
    /// means never.
    deny_writes_after: Arc<AtomicUsize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store with no faults armed.
    pub fn new() -> Self {
        Self {
            entries: Arc::default(),
            writes: Arc::default(),
            deny_reads: Arc::default(),
            deny_writes_after: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    /// Returns the mapping stored under `path`, if any.
    pub async fn entry(&self, path: &str) -> Option<SecretData> {
        self.entries.read().await.get(path).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent read fail like an authentication rejection.
    pub fn deny_reads(&self) {
        self.deny_reads.store(true, Ordering::SeqCst);
    }

    /// Lets `n` more writes succeed, then fails the rest like an
    /// authentication rejection. `usize::MAX` disarms the fault.
    pub fn deny_writes_after(&self, n: usize) {
        self.deny_writes_after
            .store(self.write_count().saturating_add(n), Ordering::SeqCst);
    }

    /// Seeds a single-field record, bypassing the [`SecretStore`] contract
    /// and any armed faults.
    pub async fn insert_raw(&self, path: &str, field: &str, value: &str) {
        let mut data = SecretData::new();
        data.insert(field.to_string(), value.to_string());
        self.entries.write().await.insert(path.to_string(), data);
    }

    fn denied() -> StoreError {
        StoreError::Api {
            status: 403,
            errors: vec!["permission denied".to_string()],
        }
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn read(&self, path: &str) -> StoreResult<Option<SecretData>> {
        if self.deny_reads.load(Ordering::SeqCst) {
            return Err(Self::denied());
        }
        Ok(self.entries.read().await.get(path).cloned())
    }

    async fn write(&self, path: &str, data: SecretData) -> StoreResult<()> {
        if self.write_count() >= self.deny_writes_after.load(Ordering::SeqCst) {
            return Err(Self::denied());
        }
        self.entries.write().await.insert(path.to_string(), data);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
