//! VPC Compute API Client
//!
//! A Rust client library for the VPC compute API used by the CloudOps
//! machine controllers. Provides type-safe models and methods for the
//! instance lifecycle: list, create, delete.
//!
//! # Example
//!
//! ```no_run
//! use vpc_client::{CreateInstanceRequest, VpcClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = VpcClient::new(
//!     "https://eu-gb.vpc.example.com".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Look for instances carrying a given display name
//! let instances = client.list_instances(Some("worker-0")).await?;
//!
//! // Provision an instance
//! let request = CreateInstanceRequest {
//!     name: "worker-0".to_string(),
//!     image: "ubuntu-24-04-amd64".to_string(),
//!     profile: "bx2-2x8".to_string(),
//!     zone: "eu-gb-1".to_string(),
//!     keys: vec!["ssh-key-1".to_string()],
//!     user_data: None,
//!     primary_network_interface: None,
//! };
//! let instance = client.create_instance(&request).await?;
//!
//! // Tear it down again
//! client.delete_instance(&instance.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Instance lifecycle**: list (with provider-side name filter),
//!   create, delete, get
//! - **Pagination**: the list call follows the collection's `next` link
//! - **Endpoint overrides**: per-region, per-service base URL overrides
//!   parsed from a single configuration flag

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod vpc_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::VpcClient;
pub use endpoints::{EndpointError, ServiceEndpoint, endpoint_for, parse_service_endpoint_flag};
pub use error::VpcError;
pub use models::*;
pub use vpc_trait::VpcClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockVpcClient;
