//! HTTP implementation of [`SecretStore`] against a Vault-style KV API.
//!
//! Wire protocol: `GET /v1/{mount}/{path}` answers `200` with a
//! `{"data": {...}}` envelope, `404` for an absent path, and any other
//! status with an `{"errors": [...]}` body. `PUT /v1/{mount}/{path}` stores
//! the request body verbatim and answers with any 2xx status. The
//! authentication token travels in the `X-Vault-Token` header.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{SecretData, SecretStore, StoreConfig, StoreError, StoreResult};

const TOKEN_HEADER: &str = "X-Vault-Token";

/// HTTP client for the remote secret store.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Clone)]
pub struct VaultClient {
    http: reqwest::Client,
    base: String,
    mount: String,
    token: String,
}

impl VaultClient {
    /// Builds a client from its configuration.
    ///
    /// Every request issued by this client is bound by
    /// [`StoreConfig::timeout_secs`]; an elapsed deadline surfaces as the
    /// retryable [`StoreError::Unavailable`].
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base: config.addr.trim_end_matches('/').to_string(),
            mount: config.mount.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}/{}", self.base, self.mount, path)
    }
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("base", &self.base)
            .field("mount", &self.mount)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretStore for VaultClient {
    async fn read(&self, path: &str) -> StoreResult<Option<SecretData>> {
        debug!(%path, "reading secret");
        let response = self
            .http
            .get(self.url(path))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_read(status, &body)
    }

    async fn write(&self, path: &str, data: SecretData) -> StoreResult<()> {
        debug!(%path, "writing secret");
        let response = self
            .http
            .put(self.url(path))
            .header(TOKEN_HEADER, &self.token)
            .json(&data)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_write(status, &body)
    }
}

#[derive(Deserialize)]
struct ReadEnvelope {
    data: SecretData,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

fn decode_read(status: u16, body: &[u8]) -> StoreResult<Option<SecretData>> {
    match status {
        200 => {
            let envelope: ReadEnvelope = serde_json::from_slice(body)
                .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
            Ok(Some(envelope.data))
        }
        404 => Ok(None),
        _ => Err(api_error(status, body)),
    }
}

fn decode_write(status: u16, body: &[u8]) -> StoreResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(api_error(status, body))
    }
}

fn api_error(status: u16, body: &[u8]) -> StoreError {
    let errors = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.errors)
        .unwrap_or_default();
    warn!(status, ?errors, "secret store rejected request");
    StoreError::Api { status, errors }
}
