//! Reconciliation logic for Machine CRDs.
//!
//! This module handles the reconciliation of `Machine` resources against
//! the VPC compute API: it resolves the machine's infrastructure
//! descriptor, assembles a `MachineScope`, drives the create or delete
//! path, and reports the outcome through the `VpcMachine` status.

use crate::bootstrap::BootstrapDataProvider;
use crate::error::ControllerError;
use crate::scope::{MachineScope, MachineScopeParams};
use chrono::Utc;
use crds::{Machine, MachineStatus, ResourceState, VpcMachine, VpcMachineStatus};
use kube::Api;
use kube::api::{Patch, PatchParams};
use std::sync::Arc;
use tracing::{error, info};
use vpc_client::{Instance, VpcClientTrait};

/// Reconciles Machine resources against the VPC compute API.
pub struct Reconciler {
    vpc_client: Arc<dyn VpcClientTrait>,
    bootstrap_provider: Arc<dyn BootstrapDataProvider>,
    machine_api: Api<Machine>,
    vpc_machine_api: Api<VpcMachine>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        vpc_client: Arc<dyn VpcClientTrait>,
        bootstrap_provider: Arc<dyn BootstrapDataProvider>,
        machine_api: Api<Machine>,
        vpc_machine_api: Api<VpcMachine>,
    ) -> Self {
        Self {
            vpc_client,
            bootstrap_provider,
            machine_api,
            vpc_machine_api,
        }
    }

    /// Resolves the machine's infrastructure reference and assembles the
    /// scope for one reconcile operation. An absent `VpcMachine` surfaces
    /// through scope construction as a missing-infrastructure error.
    async fn machine_scope(&self, machine: &Machine) -> Result<MachineScope, ControllerError> {
        let vpc_machine = self
            .vpc_machine_api
            .get_opt(&machine.spec.infrastructure_ref.name)
            .await?;

        MachineScope::new(MachineScopeParams {
            machine: Some(machine.clone()),
            vpc_machine,
            vpc_client: Some(self.vpc_client.clone()),
            bootstrap_provider: Some(self.bootstrap_provider.clone()),
            vpc_config: None,
        })
    }

    /// Reconciles a Machine resource toward its desired state.
    ///
    /// This method:
    /// 1. Resolves the referenced VpcMachine descriptor
    /// 2. Ensures the corresponding cloud instance exists (idempotent)
    /// 3. Updates the VpcMachine and Machine statuses with the result
    ///
    /// If reconciliation fails, the VpcMachine status records the error.
    pub async fn reconcile_machine(&self, machine: &Machine) -> Result<(), ControllerError> {
        let name = machine
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| ControllerError::InvalidConfig("Machine missing name".to_string()))?;
        let namespace = machine.metadata.namespace.as_deref().unwrap_or("default");

        info!("Reconciling Machine {}/{}", namespace, name);

        let infra_name = machine.spec.infrastructure_ref.name.clone();
        let scope = match self.machine_scope(machine).await {
            Ok(scope) => scope,
            Err(e) => {
                self.patch_vpc_machine_failed(&infra_name, &e).await;
                return Err(e);
            }
        };

        match scope.create_machine().await {
            Ok(instance) => {
                info!(
                    "Machine {}/{} backed by instance {}",
                    namespace, name, instance.id
                );
                self.patch_vpc_machine_provisioned(&infra_name, &instance)
                    .await;
                self.patch_machine_ready(name).await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to reconcile Machine {}/{}: {}", namespace, name, e);
                self.patch_vpc_machine_failed(&infra_name, &e).await;
                Err(e)
            }
        }
    }

    /// Reconciles the deletion of a Machine resource.
    ///
    /// Tears down the backing instance (tolerant of already-deleted state)
    /// and marks the VpcMachine as deleting. The VpcMachine object itself
    /// is owned by the orchestration layer and not removed here.
    pub async fn reconcile_machine_deletion(
        &self,
        machine: &Machine,
    ) -> Result<(), ControllerError> {
        let name = machine
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| ControllerError::InvalidConfig("Machine missing name".to_string()))?;
        let namespace = machine.metadata.namespace.as_deref().unwrap_or("default");

        info!("Reconciling deletion of Machine {}/{}", namespace, name);

        let infra_name = machine.spec.infrastructure_ref.name.clone();
        let scope = self.machine_scope(machine).await?;
        scope.delete_machine().await?;

        let status = VpcMachineStatus {
            state: ResourceState::Deleting,
            last_reconciled: Some(Utc::now()),
            ..Default::default()
        };
        self.patch_vpc_machine_status(&infra_name, status).await;
        Ok(())
    }

    async fn patch_vpc_machine_provisioned(&self, vpc_machine_name: &str, instance: &Instance) {
        let mut addresses: Vec<String> = Vec::new();
        let interfaces = instance
            .primary_network_interface
            .iter()
            .chain(instance.network_interfaces.iter());
        for interface in interfaces {
            if let Some(address) = &interface.primary_ipv4_address {
                if !addresses.contains(address) {
                    addresses.push(address.clone());
                }
            }
        }

        let status = VpcMachineStatus {
            instance_id: Some(instance.id.clone()),
            instance_state: Some(instance.status.clone()),
            addresses,
            state: ResourceState::Provisioned,
            error: None,
            last_reconciled: Some(Utc::now()),
        };
        self.patch_vpc_machine_status(vpc_machine_name, status).await;
    }

    async fn patch_vpc_machine_failed(&self, vpc_machine_name: &str, err: &ControllerError) {
        let status = VpcMachineStatus {
            state: ResourceState::Failed,
            error: Some(err.to_string()),
            last_reconciled: Some(Utc::now()),
            ..Default::default()
        };
        self.patch_vpc_machine_status(vpc_machine_name, status).await;
    }

    /// Patch the VpcMachine status subresource; a patch failure is logged
    /// rather than propagated so it cannot mask the reconcile outcome.
    async fn patch_vpc_machine_status(&self, vpc_machine_name: &str, status: VpcMachineStatus) {
        let status_patch = serde_json::json!({
            "status": status
        });

        let pp = PatchParams::default();
        if let Err(e) = self
            .vpc_machine_api
            .patch_status(vpc_machine_name, &pp, &Patch::Merge(&status_patch))
            .await
        {
            error!(
                "Failed to update VpcMachine {} status: {}",
                vpc_machine_name, e
            );
        }
    }

    async fn patch_machine_ready(&self, machine_name: &str) {
        let status = MachineStatus {
            infrastructure_ready: true,
            last_reconciled: Some(Utc::now()),
        };
        let status_patch = serde_json::json!({
            "status": status
        });

        let pp = PatchParams::default();
        if let Err(e) = self
            .machine_api
            .patch_status(machine_name, &pp, &Patch::Merge(&status_patch))
            .await
        {
            error!("Failed to update Machine {} status: {}", machine_name, e);
        }
    }
}
