//! VpcClient trait for mocking
//!
//! This trait abstracts the VpcClient to enable mocking in unit tests.
//! The concrete VpcClient implements this trait, and tests use the
//! in-memory mock implementation instead of a live API.

use crate::error::VpcError;
use crate::models::*;

/// Trait for VPC compute API client operations
///
/// The machine reconcilers depend only on these operations' success/error
/// shape, never on transport details. All async methods must be `Send` to
/// work with Tokio's work-stealing runtime, and implementations must be
/// safe to share across concurrently reconciling machines.
#[async_trait::async_trait]
pub trait VpcClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// List instances, optionally filtered by display name
    async fn list_instances(&self, name: Option<&str>) -> Result<Vec<Instance>, VpcError>;

    /// Get an instance by ID
    async fn get_instance(&self, id: &str) -> Result<Instance, VpcError>;

    /// Create an instance
    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Instance, VpcError>;

    /// Delete an instance by ID
    async fn delete_instance(&self, id: &str) -> Result<(), VpcError>;
}
