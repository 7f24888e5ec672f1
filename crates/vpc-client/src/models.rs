//! VPC API models
//!
//! These models match the instance serializers of the VPC compute API
//! (/v1/instances).

use serde::{Deserialize, Serialize};

/// Collection wrapper returned by the instance list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceCollection {
    pub total_count: u64,
    pub instances: Vec<Instance>,
    /// Link to the next page, absent on the last page
    #[serde(default)]
    pub next: Option<PageLink>,
}

/// Pagination link inside a collection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLink {
    pub href: String,
}

/// One compute instance as reported by the provider.
///
/// `id` is the durable identity; `name` is caller-chosen and not enforced
/// unique by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    /// Lifecycle status (e.g., "pending", "running", "stopping")
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<NamedReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<NamedReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<NamedReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_network_interface: Option<NetworkInterface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>, // ISO 8601 datetime
}

/// Nested reference carried by instance fields (zone, profile, image)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedReference {
    pub name: String,
}

/// Network interface attached to an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<NamedReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ipv4_address: Option<String>,
}

/// Request body for creating an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub image: String,
    pub profile: String,
    pub zone: String,
    /// SSH key identifiers installed on the instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Base64-encoded boot payload handed to the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_network_interface: Option<NetworkInterfacePrototype>,
}

/// Primary interface placement in a create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterfacePrototype {
    pub subnet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
