//! Client interface to the remote secret store.
//!
//! All durable state in the key-management core lives in a path-addressed
//! key/value store reached over authenticated HTTP. This crate defines the
//! [`SecretStore`] contract the rest of the workspace is written against,
//! plus [`VaultClient`], the production implementation speaking the
//! HashiCorp-Vault-shaped KV API.
//!
//! The client is an explicit instance constructed once from a
//! [`StoreConfig`] and injected as an `Arc<dyn SecretStore>` wherever store
//! access is needed, which is also what allows tests to substitute an
//! in-memory double.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

mod http;

pub use http::VaultClient;

/// A flat string-keyed mapping, the unit of storage under a single path.
pub type SecretData = BTreeMap<String, String>;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for secret store access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer within the request
    /// deadline. Retryable by the caller with backoff.
    #[error("secret store unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The store rejected the request (authentication failure, bad mount,
    /// server-side error).
    #[error("secret store rejected the request with status {status}: {errors:?}")]
    Api {
        /// HTTP status code returned by the store.
        status: u16,
        /// Error strings reported in the response body, if any.
        errors: Vec<String>,
    },

    /// The store answered with a body that does not match the expected
    /// protocol shape.
    #[error("unexpected secret store response: {0}")]
    InvalidResponse(String),
}

/// Path-addressed read/write access to the remote secret store.
///
/// A read of an absent path is `Ok(None)`, distinguishable from transport
/// errors. A write always overwrites whatever was stored under the path.
#[async_trait]
pub trait SecretStore: std::fmt::Debug + Send + Sync {
    /// Reads the mapping stored under `path`, or `None` if the path holds
    /// nothing.
    async fn read(&self, path: &str) -> StoreResult<Option<SecretData>>;

    /// Stores `data` under `path`, replacing any previous mapping.
    async fn write(&self, path: &str, data: SecretData) -> StoreResult<()>;
}

/// Configuration for [`VaultClient`].
///
/// The authentication token is supplied once here and sent with every
/// request; it is never exposed again through the client.
#[derive(Clone, serde::Deserialize)]
pub struct StoreConfig {
    /// Base address of the store, e.g. `http://localhost:8200`.
    pub addr: String,
    /// Authentication token.
    pub token: String,
    /// KV mount all paths are nested under.
    #[serde(default = "default_mount")]
    pub mount: String,
    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_mount() -> String {
    "cubbyhole".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

// The token must not leak through Debug output.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("addr", &self.addr)
            .field("token", &"<redacted>")
            .field("mount", &self.mount)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
