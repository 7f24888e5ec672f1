//! Bootstrap data resolution.
//!
//! Resolves a machine's bootstrap secret reference into the raw payload
//! injected into a new instance as user data. Resolution is lazy: the
//! create reconciler asks for the payload only once it knows an instance
//! actually has to be created.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use thiserror::Error;

/// Key within the bootstrap secret holding the payload.
const BOOTSTRAP_DATA_KEY: &str = "value";

/// Errors that can occur while resolving bootstrap data
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Referenced secret does not exist
    #[error("bootstrap secret {0} not found")]
    SecretNotFound(String),

    /// Secret exists but carries no usable payload
    #[error("bootstrap secret {0} has no 'value' key")]
    MissingPayload(String),
}

/// Resolves a named bootstrap reference into raw payload bytes.
///
/// Tests supply an in-memory fake; the controller wires the
/// secret-backed implementation below.
#[async_trait]
pub trait BootstrapDataProvider: Send + Sync {
    /// Resolve a bootstrap secret reference into the raw payload bytes.
    async fn resolve(&self, namespace: &str, name: &str) -> Result<Vec<u8>, BootstrapError>;
}

/// Resolves bootstrap payloads from Kubernetes secrets, following the
/// orchestration layer's convention of a single `value` key.
pub struct SecretBootstrapProvider {
    client: Client,
}

impl SecretBootstrapProvider {
    /// Creates a provider backed by the given Kubernetes client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BootstrapDataProvider for SecretBootstrapProvider {
    async fn resolve(&self, namespace: &str, name: &str) -> Result<Vec<u8>, BootstrapError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets
            .get_opt(name)
            .await?
            .ok_or_else(|| BootstrapError::SecretNotFound(name.to_string()))?;

        let payload = secret
            .data
            .and_then(|mut data| data.remove(BOOTSTRAP_DATA_KEY))
            .map(|bytes| bytes.0)
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| BootstrapError::MissingPayload(name.to_string()))?;

        Ok(payload)
    }
}
