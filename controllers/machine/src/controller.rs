//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires together the
//! VPC client, bootstrap provider, reconciler, and resource watcher for
//! the Machine Controller.

use crate::bootstrap::{BootstrapDataProvider, SecretBootstrapProvider};
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::scope::VpcConfig;
use crate::watcher::Watcher;
use crds::{Machine, VpcMachine};
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;
use vpc_client::{VpcClient, VpcClientTrait};

/// Main controller for machine lifecycle management.
pub struct Controller {
    machine_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(
        vpc_config: VpcConfig,
        namespace: Option<String>,
    ) -> Result<Self, ControllerError> {
        info!("Initializing Machine Controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        // Create VPC client; shared read-only across all reconciles
        let vpc_client: Arc<dyn VpcClientTrait> = Arc::new(
            VpcClient::new(vpc_config.api_endpoint, vpc_config.token)
                .map_err(ControllerError::ClientInitialization)?,
        );

        // Bootstrap payloads come from cluster secrets
        let bootstrap_provider: Arc<dyn BootstrapDataProvider> =
            Arc::new(SecretBootstrapProvider::new(kube_client.clone()));

        // Create API clients
        let ns = namespace.as_deref().unwrap_or("default");
        let machine_api: Api<Machine> = Api::namespaced(kube_client.clone(), ns);
        let vpc_machine_api: Api<VpcMachine> = Api::namespaced(kube_client, ns);

        // Create reconciler and watcher
        let reconciler = Arc::new(Reconciler::new(
            vpc_client,
            bootstrap_provider,
            machine_api.clone(),
            vpc_machine_api,
        ));
        let watcher_instance = Watcher::new(reconciler, machine_api);

        // Start the watcher in a background task
        let machine_watcher =
            tokio::spawn(async move { watcher_instance.watch_machines().await });

        Ok(Self { machine_watcher })
    }

    /// Runs the controller until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Machine Controller running");

        (&mut self.machine_watcher)
            .await
            .map_err(|e| ControllerError::Watch(format!("Machine watcher panicked: {}", e)))?
            .map_err(|e| ControllerError::Watch(format!("Machine watcher error: {}", e)))?;

        Ok(())
    }
}
