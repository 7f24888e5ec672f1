//! Controller-specific error types.
//!
//! Every external failure is wrapped with the operation and machine it
//! belongs to; the underlying cause is carried as the error source and
//! never reinterpreted. The controller performs no retries of its own:
//! the watch loop re-invokes reconciliation, and idempotency makes that
//! safe.

use crate::bootstrap::BootstrapError;
use kube::Error as KubeError;
use thiserror::Error;
use vpc_client::VpcError;

/// Errors that can occur in the Machine Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Machine reference missing from the scope parameters
    #[error("machine reference is not set")]
    MissingMachineReference,

    /// Infrastructure machine descriptor missing from the scope parameters
    #[error("infrastructure machine descriptor is not set")]
    MissingInfrastructureReference,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// VPC client could not be established
    #[error("failed to initialize VPC client: {0}")]
    ClientInitialization(#[source] VpcError),

    /// Instance lookup failed; distinct from "instance not found"
    #[error("failed to look up instance for machine {0}: {1}")]
    InstanceLookup(String, #[source] VpcError),

    /// Machine has no bootstrap data secret reference
    #[error("machine {0} has no bootstrap data secret reference")]
    MissingBootstrapReference(String),

    /// Bootstrap payload could not be resolved
    #[error("bootstrap data for machine {0} is unavailable: {1}")]
    BootstrapDataUnavailable(String, #[source] BootstrapError),

    /// Provider rejected the instance create call
    #[error("failed to create instance for machine {0}: {1}")]
    InstanceCreation(String, #[source] VpcError),

    /// Provider rejected the instance delete call for a reason other than
    /// "not found"
    #[error("failed to delete instance {1} for machine {0}: {2}")]
    InstanceDeletion(String, String, #[source] VpcError),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
