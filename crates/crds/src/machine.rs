//! Machine CRD
//!
//! Cluster-level desired state for one cluster member. The orchestration
//! layer owns this resource; the machine controller reads it, resolves its
//! infrastructure reference, and reports readiness back through the status.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::references::CloudResourceReference;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cloudops.microscaler.io",
    version = "v1alpha1",
    kind = "Machine",
    namespaced,
    status = "MachineStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Name of the owning cluster
    pub cluster_name: String,

    /// Bootstrap configuration used to join the instance to the cluster
    #[serde(default)]
    pub bootstrap: BootstrapSpec,

    /// Reference to the infrastructure-specific machine descriptor
    pub infrastructure_ref: CloudResourceReference,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSpec {
    /// Name of the secret holding the bootstrap payload.
    ///
    /// The bootstrap provisioner fills this in once the payload is ready;
    /// a machine cannot be provisioned while it is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_secret_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    /// Whether the backing cloud instance has been provisioned
    #[serde(default)]
    pub infrastructure_ready: bool,

    /// Last reconciliation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<chrono::DateTime<chrono::Utc>>,
}
