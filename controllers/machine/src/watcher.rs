//! Kubernetes resource watchers.
//!
//! This module handles watching Machine resources for changes and
//! triggering reconciliation. Retry is the watch loop's responsibility:
//! a failed reconcile backs the loop off along the Fibonacci sequence and
//! the resource is picked up again on the next watch event; the
//! reconcilers themselves never retry.

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::Machine;
use futures::TryStreamExt;
use kube::Api;
use kube_runtime::watcher;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Watches Machine resources for changes.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    machine_api: Api<Machine>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, machine_api: Api<Machine>) -> Self {
        Self {
            reconciler,
            machine_api,
        }
    }

    /// Starts watching Machine resources.
    pub async fn watch_machines(&self) -> Result<(), ControllerError> {
        info!("Starting Machine watcher");

        let mut backoff = FibonacciBackoff::new(1, 60);
        let mut stream = Box::pin(watcher(self.machine_api.clone(), watcher::Config::default()));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {}", e)))?
        {
            match event {
                watcher::Event::Apply(machine) => {
                    let name = machine.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("Machine applied: {}", name);

                    if let Err(e) = self.reconciler.reconcile_machine(&machine).await {
                        error!("Failed to reconcile Machine {}: {}", name, e);
                        tokio::time::sleep(backoff.next_backoff()).await;
                    } else {
                        backoff.reset();
                    }
                }
                watcher::Event::Delete(machine) => {
                    let name = machine.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("Machine deleted: {}", name);

                    if let Err(e) = self.reconciler.reconcile_machine_deletion(&machine).await {
                        error!(
                            "Failed to reconcile deletion of Machine {}: {}",
                            name, e
                        );
                        tokio::time::sleep(backoff.next_backoff()).await;
                    } else {
                        backoff.reset();
                    }
                }
                watcher::Event::Init => {
                    info!("Machine watcher initialized");
                }
                watcher::Event::InitApply(machine) => {
                    let name = machine.metadata.name.as_deref().unwrap_or("<unknown>");
                    debug!("Machine init apply: {}", name);

                    if let Err(e) = self.reconciler.reconcile_machine(&machine).await {
                        warn!("Failed to reconcile Machine {}: {}", name, e);
                    }
                }
                watcher::Event::InitDone => {
                    info!("Machine watcher initialization complete");
                }
            }
        }

        Ok(())
    }
}
