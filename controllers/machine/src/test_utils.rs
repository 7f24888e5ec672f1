//! Test utilities for unit testing the machine reconciler.
//!
//! Every test constructs its own fakes and passes them into scope
//! construction; there is no shared mock state between tests.

use crate::bootstrap::{BootstrapDataProvider, BootstrapError};
use crate::scope::{MachineScope, MachineScopeParams};
use async_trait::async_trait;
use crds::{
    BootstrapSpec, CloudResourceReference, Machine, MachineSpec, NetworkAttachment, ResourceState,
    VpcMachine, VpcMachineSpec, VpcMachineStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::sync::Arc;
use vpc_client::MockVpcClient;

/// Helper to create a test Machine CRD
pub fn test_machine(name: &str, cluster_name: &str, data_secret_name: Option<&str>) -> Machine {
    Machine {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: MachineSpec {
            cluster_name: cluster_name.to_string(),
            bootstrap: BootstrapSpec {
                data_secret_name: data_secret_name.map(|s| s.to_string()),
            },
            infrastructure_ref: CloudResourceReference::infrastructure(
                "VpcMachine",
                name.to_string(),
            ),
        },
        status: None,
    }
}

/// Helper to create a test VpcMachine CRD
pub fn test_vpc_machine(name: &str) -> VpcMachine {
    VpcMachine {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: VpcMachineSpec {
            name: None,
            image: "ubuntu-24-04-amd64".to_string(),
            profile: "bx2-2x8".to_string(),
            zone: "eu-gb-1".to_string(),
            ssh_keys: vec!["ssh-key-1".to_string()],
            primary_network: Some(NetworkAttachment {
                subnet: "subnet-1".to_string(),
                name: None,
            }),
        },
        status: None,
    }
}

/// Helper to create a test VpcMachine CRD whose status already records a
/// provisioned instance
pub fn test_vpc_machine_with_instance(name: &str, instance_id: &str) -> VpcMachine {
    let mut vpc_machine = test_vpc_machine(name);
    vpc_machine.status = Some(VpcMachineStatus {
        instance_id: Some(instance_id.to_string()),
        instance_state: Some("running".to_string()),
        addresses: vec![],
        state: ResourceState::Provisioned,
        error: None,
        last_reconciled: None,
    });
    vpc_machine
}

/// In-memory bootstrap data provider fake
pub struct MockBootstrapProvider {
    payload: Option<Vec<u8>>,
}

impl MockBootstrapProvider {
    /// Provider that resolves every reference to the given payload
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    /// Provider that fails every resolution
    pub fn unavailable() -> Self {
        Self { payload: None }
    }
}

#[async_trait]
impl BootstrapDataProvider for MockBootstrapProvider {
    async fn resolve(&self, _namespace: &str, name: &str) -> Result<Vec<u8>, BootstrapError> {
        self.payload
            .clone()
            .ok_or_else(|| BootstrapError::SecretNotFound(name.to_string()))
    }
}

/// Helper to assemble a scope from explicit fakes
pub fn test_scope(
    machine: Machine,
    vpc_machine: VpcMachine,
    vpc_client: &MockVpcClient,
    bootstrap_provider: MockBootstrapProvider,
) -> MachineScope {
    MachineScope::new(MachineScopeParams {
        machine: Some(machine),
        vpc_machine: Some(vpc_machine),
        vpc_client: Some(Arc::new(vpc_client.clone())),
        bootstrap_provider: Some(Arc::new(bootstrap_provider)),
        vpc_config: None,
    })
    .expect("scope construction should succeed")
}
