//! Kubernetes object references for CloudOps CRDs
//!
//! Provides standard Kubernetes-style object references for cross-resource
//! references, following the TypedLocalObjectReference pattern with
//! apiGroup, kind, name, and optional namespace.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kubernetes-compliant resource reference for CloudOps CRDs
///
/// Enables Kubernetes to validate reference types and documents which
/// resource kind is expected on the other end of the reference.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloudResourceReference {
    /// API group of the referenced resource (e.g., "cloudops.microscaler.io")
    pub api_group: String,

    /// Kind of the referenced resource (e.g., "VpcMachine")
    pub kind: String,

    /// Name of the referenced resource
    pub name: String,

    /// Namespace of the referenced resource (defaults to same namespace as
    /// the referencing resource)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl CloudResourceReference {
    /// Create a new reference with apiGroup, kind, and name (same namespace)
    pub fn new(api_group: String, kind: String, name: String) -> Self {
        Self {
            api_group,
            kind,
            name,
            namespace: None,
        }
    }

    /// Helper to create a reference to a CloudOps infrastructure CRD
    pub fn infrastructure(kind: &str, name: String) -> Self {
        Self {
            api_group: "cloudops.microscaler.io".to_string(),
            kind: kind.to_string(),
            name,
            namespace: None,
        }
    }
}
