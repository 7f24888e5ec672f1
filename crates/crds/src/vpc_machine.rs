//! VpcMachine CRD
//!
//! Infrastructure-specific descriptor for one VPC compute instance.
//! The spec carries the desired instance shape; the status mirrors the
//! provider's view after each reconcile.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cloudops.microscaler.io",
    version = "v1alpha1",
    kind = "VpcMachine",
    namespaced,
    status = "VpcMachineStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct VpcMachineSpec {
    /// Instance display name (defaults to the VpcMachine object name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Image used to boot the instance
    pub image: String,

    /// Instance profile (size/class)
    pub profile: String,

    /// Availability zone to place the instance in
    pub zone: String,

    /// SSH key identifiers installed on the instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<String>,

    /// Primary network placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_network: Option<NetworkAttachment>,
}

/// Network placement for an instance's primary interface
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachment {
    /// Subnet the primary interface attaches to
    pub subnet: String,

    /// Interface name (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct VpcMachineStatus {
    /// Provider-assigned instance identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    /// Raw instance status as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_state: Option<String>,

    /// IP addresses assigned to the instance's interfaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,

    /// Reconciliation state
    pub state: ResourceState,

    /// Error message if reconciliation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Last reconciliation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<chrono::DateTime<chrono::Utc>>,
}

/// Machine reconciliation state
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum ResourceState {
    /// No instance provisioned yet
    #[default]
    Pending,

    /// Instance exists at the provider
    Provisioned,

    /// Instance teardown in progress
    Deleting,

    /// Reconciliation failed
    Failed,
}
