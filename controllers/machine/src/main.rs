//! Machine Controller
//!
//! Reconciles `Machine` and `VpcMachine` CRDs against the VPC compute
//! API, ensuring exactly one cloud instance exists per machine and
//! tearing the instance down when the machine goes away.
//!
//! Reconciliation is idempotent: the controller re-runs it on every watch
//! event, and a machine whose instance already exists is left untouched.

mod backoff;
mod bootstrap;
mod controller;
mod error;
mod reconciler;
mod scope;
mod watcher;

#[cfg(test)]
mod scope_test;
#[cfg(test)]
mod test_utils;

use crate::error::ControllerError;
use crate::scope::VpcConfig;
use controller::Controller;
use std::env;
use tracing::info;
use vpc_client::{endpoint_for, parse_service_endpoint_flag};

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Machine Controller");

    // Load configuration from environment variables
    let api_endpoint = env::var("VPC_API_ENDPOINT")
        .unwrap_or_else(|_| "https://vpc.cloud.microscaler.io".to_string());
    let api_token = env::var("VPC_API_TOKEN").map_err(|_| {
        ControllerError::InvalidConfig("VPC_API_TOKEN environment variable is required".to_string())
    })?;
    let region = env::var("VPC_REGION").unwrap_or_else(|_| "us-south".to_string());
    let endpoint_flag = env::var("SERVICE_ENDPOINTS").unwrap_or_default();
    let namespace = env::var("WATCH_NAMESPACE").ok();

    // Apply any service endpoint override for this region before the
    // client is constructed
    let overrides = parse_service_endpoint_flag(&endpoint_flag).map_err(|e| {
        ControllerError::InvalidConfig(format!("invalid SERVICE_ENDPOINTS: {}", e))
    })?;
    let api_endpoint = endpoint_for(&overrides, &region, "vpc")
        .unwrap_or(&api_endpoint)
        .to_string();

    info!("Configuration:");
    info!("  VPC API endpoint: {}", api_endpoint);
    info!("  Region: {}", region);
    info!(
        "  Namespace: {}",
        namespace.as_deref().unwrap_or("all namespaces")
    );

    // Initialize and run controller
    let vpc_config = VpcConfig {
        api_endpoint,
        token: api_token,
    };
    let controller = Controller::new(vpc_config, namespace).await?;
    controller.run().await?;

    Ok(())
}
