//! Machine scope: the execution context for one reconcile operation.
//!
//! A `MachineScope` aggregates everything a single create or delete
//! reconcile needs: the orchestration-level `Machine`, the
//! infrastructure-level `VpcMachine`, the VPC client, and the bootstrap
//! data provider. Construction is the sole validation gate: a scope
//! cannot exist with a missing machine reference, missing infrastructure
//! descriptor, or unusable client, so every operation downstream can rely
//! on a complete context.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, info};

use crds::{Machine, VpcMachine};
use vpc_client::{
    CreateInstanceRequest, Instance, NetworkInterfacePrototype, VpcClient, VpcClientTrait, VpcError,
};

use crate::bootstrap::BootstrapDataProvider;
use crate::error::ControllerError;

/// Connection settings for building a `VpcClient` when no client is
/// injected through the params.
#[derive(Debug, Clone)]
pub struct VpcConfig {
    /// VPC API base URL, after any service endpoint override
    pub api_endpoint: String,
    /// Bearer token for the VPC API
    pub token: String,
}

/// Inputs to `MachineScope::new`.
///
/// `vpc_client` and `bootstrap_provider` are injection points: tests pass
/// in-memory fakes, the controller passes the shared real client. When
/// `vpc_client` is absent a `VpcClient` is built from `vpc_config`.
#[derive(Default)]
pub struct MachineScopeParams {
    pub machine: Option<Machine>,
    pub vpc_machine: Option<VpcMachine>,
    pub vpc_client: Option<Arc<dyn VpcClientTrait>>,
    pub bootstrap_provider: Option<Arc<dyn BootstrapDataProvider>>,
    pub vpc_config: Option<VpcConfig>,
}

/// Execution context for reconciling one machine.
pub struct MachineScope {
    machine: Machine,
    vpc_machine: VpcMachine,
    vpc_client: Arc<dyn VpcClientTrait>,
    bootstrap_provider: Arc<dyn BootstrapDataProvider>,
}

impl std::fmt::Debug for MachineScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineScope")
            .field("machine", &self.machine)
            .field("vpc_machine", &self.vpc_machine)
            .field("vpc_client", &"Arc<dyn VpcClientTrait>")
            .field("bootstrap_provider", &"Arc<dyn BootstrapDataProvider>")
            .finish()
    }
}

impl MachineScope {
    /// Validates the params and assembles a ready-to-use scope.
    ///
    /// Client initialization is the only side effect; no instance API is
    /// touched during construction.
    pub fn new(params: MachineScopeParams) -> Result<Self, ControllerError> {
        let machine = params
            .machine
            .ok_or(ControllerError::MissingMachineReference)?;
        let vpc_machine = params
            .vpc_machine
            .ok_or(ControllerError::MissingInfrastructureReference)?;
        let bootstrap_provider = params.bootstrap_provider.ok_or_else(|| {
            ControllerError::InvalidConfig("bootstrap data provider is required".to_string())
        })?;

        let vpc_client: Arc<dyn VpcClientTrait> = match params.vpc_client {
            Some(client) => client,
            None => {
                let config = params.vpc_config.ok_or_else(|| {
                    ControllerError::InvalidConfig(
                        "either a VPC client or VPC connection settings must be provided"
                            .to_string(),
                    )
                })?;
                Arc::new(
                    VpcClient::new(config.api_endpoint, config.token)
                        .map_err(ControllerError::ClientInitialization)?,
                )
            }
        };

        Ok(Self {
            machine,
            vpc_machine,
            vpc_client,
            bootstrap_provider,
        })
    }

    /// Name of the owning cluster.
    pub fn cluster_name(&self) -> &str {
        &self.machine.spec.cluster_name
    }

    /// Desired instance display name.
    ///
    /// Falls back to the VpcMachine object name when the spec does not pin
    /// an explicit instance name.
    pub fn name(&self) -> &str {
        self.vpc_machine
            .spec
            .name
            .as_deref()
            .or(self.vpc_machine.metadata.name.as_deref())
            .unwrap_or_default()
    }

    fn namespace(&self) -> &str {
        self.machine.metadata.namespace.as_deref().unwrap_or("default")
    }

    /// Looks up an instance by display name.
    ///
    /// Returns the first exact match in list order. The provider does not
    /// enforce name uniqueness; when several instances share the name, the
    /// first one in the provider's list ordering wins. A lookup failure is
    /// an error, never `Ok(None)`.
    pub async fn find_instance_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Instance>, ControllerError> {
        let instances = self
            .vpc_client
            .list_instances(Some(name))
            .await
            .map_err(|e| ControllerError::InstanceLookup(name.to_string(), e))?;

        Ok(instances.into_iter().find(|i| i.name == name))
    }

    async fn bootstrap_data(&self) -> Result<Vec<u8>, ControllerError> {
        let secret_name = self
            .machine
            .spec
            .bootstrap
            .data_secret_name
            .as_deref()
            .ok_or_else(|| ControllerError::MissingBootstrapReference(self.name().to_string()))?;

        self.bootstrap_provider
            .resolve(self.namespace(), secret_name)
            .await
            .map_err(|e| ControllerError::BootstrapDataUnavailable(self.name().to_string(), e))
    }

    /// Ensures exactly one instance exists for this machine.
    ///
    /// Safe to call on every reconcile tick: an instance already carrying
    /// the desired name is returned as-is and no create call is issued.
    /// Bootstrap data is resolved only once a create is actually needed,
    /// and the create call itself is the single state-mutating step.
    pub async fn create_machine(&self) -> Result<Instance, ControllerError> {
        let name = self.name();

        if let Some(existing) = self.find_instance_by_name(name).await? {
            debug!(
                "Instance {} already exists for machine {}, reusing",
                existing.id, name
            );
            return Ok(existing);
        }

        let payload = self.bootstrap_data().await?;

        let spec = &self.vpc_machine.spec;
        let request = CreateInstanceRequest {
            name: name.to_string(),
            image: spec.image.clone(),
            profile: spec.profile.clone(),
            zone: spec.zone.clone(),
            keys: spec.ssh_keys.clone(),
            user_data: Some(BASE64.encode(payload)),
            primary_network_interface: spec.primary_network.as_ref().map(|n| {
                NetworkInterfacePrototype {
                    subnet: n.subnet.clone(),
                    name: n.name.clone(),
                }
            }),
        };

        let instance = self
            .vpc_client
            .create_instance(&request)
            .await
            .map_err(|e| ControllerError::InstanceCreation(name.to_string(), e))?;

        info!(
            "Created instance {} for machine {} in cluster {}",
            instance.id,
            name,
            self.cluster_name()
        );
        Ok(instance)
    }

    /// Deletes this machine's instance, tolerating already-deleted state.
    ///
    /// The delete is optimistic: it goes straight to the instance id
    /// recorded in the status instead of looking the instance up first,
    /// and a NotFound from the provider counts as success. A machine with
    /// no recorded instance has nothing to delete.
    pub async fn delete_machine(&self) -> Result<(), ControllerError> {
        let instance_id = match self
            .vpc_machine
            .status
            .as_ref()
            .and_then(|s| s.instance_id.as_deref())
        {
            Some(id) => id,
            None => {
                debug!(
                    "Machine {} has no recorded instance, nothing to delete",
                    self.name()
                );
                return Ok(());
            }
        };

        match self.vpc_client.delete_instance(instance_id).await {
            Ok(()) => {
                info!(
                    "Deleted instance {} for machine {}",
                    instance_id,
                    self.name()
                );
                Ok(())
            }
            Err(VpcError::NotFound(_)) => {
                debug!(
                    "Instance {} for machine {} already gone",
                    instance_id,
                    self.name()
                );
                Ok(())
            }
            Err(e) => Err(ControllerError::InstanceDeletion(
                self.name().to_string(),
                instance_id.to_string(),
                e,
            )),
        }
    }
}
