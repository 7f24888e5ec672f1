//! Mock VpcClient for unit testing
//!
//! This module provides a mock implementation of VpcClientTrait that can be
//! used in unit tests without requiring a live VPC API.
//!
//! The mock stores instances in memory (in list order, since the provider
//! does not enforce name uniqueness and callers depend on first-match
//! semantics), records the create calls it receives, and can be armed to
//! fail individual operations for error-path testing.

use crate::error::VpcError;
use crate::models::*;
use crate::vpc_trait::VpcClientTrait;
use std::sync::{Arc, Mutex};

/// Mock VpcClient for testing
#[derive(Clone)]
pub struct MockVpcClient {
    base_url: String,
    // In-memory storage, in insertion order
    instances: Arc<Mutex<Vec<Instance>>>,
    // Call recording for idempotency assertions
    create_calls: Arc<Mutex<u64>>,
    last_create_request: Arc<Mutex<Option<CreateInstanceRequest>>>,
    // Armed failures
    fail_list: Arc<Mutex<Option<String>>>,
    fail_create: Arc<Mutex<Option<String>>>,
    fail_delete: Arc<Mutex<Option<String>>>,
    // Counter for generating IDs
    next_id: Arc<Mutex<u64>>,
}

impl MockVpcClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            instances: Arc::new(Mutex::new(Vec::new())),
            create_calls: Arc::new(Mutex::new(0)),
            last_create_request: Arc::new(Mutex::new(None)),
            fail_list: Arc::new(Mutex::new(None)),
            fail_create: Arc::new(Mutex::new(None)),
            fail_delete: Arc::new(Mutex::new(None)),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add an existing instance to the mock store (for test setup),
    /// returning it for assertions
    pub fn seed_instance(&self, name: &str) -> Instance {
        let instance = self.make_instance(name, None);
        self.instances.lock().unwrap().push(instance.clone());
        instance
    }

    /// Arm the next list call to fail with an API error
    pub fn fail_list(&self, message: impl Into<String>) {
        *self.fail_list.lock().unwrap() = Some(message.into());
    }

    /// Arm the next create call to fail with an API error
    pub fn fail_create(&self, message: impl Into<String>) {
        *self.fail_create.lock().unwrap() = Some(message.into());
    }

    /// Arm the next delete call to fail with an API error
    pub fn fail_delete(&self, message: impl Into<String>) {
        *self.fail_delete.lock().unwrap() = Some(message.into());
    }

    /// Number of create calls the mock has received
    pub fn create_calls(&self) -> u64 {
        *self.create_calls.lock().unwrap()
    }

    /// The most recent create request, if any
    pub fn last_create_request(&self) -> Option<CreateInstanceRequest> {
        self.last_create_request.lock().unwrap().clone()
    }

    /// Snapshot of the stored instances, in list order
    pub fn instances(&self) -> Vec<Instance> {
        self.instances.lock().unwrap().clone()
    }

    /// Generate next ID
    fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    fn make_instance(&self, name: &str, request: Option<&CreateInstanceRequest>) -> Instance {
        let id = self.next_id();
        Instance {
            id: format!("instance-{}", id),
            name: name.to_string(),
            status: "pending".to_string(),
            zone: request.map(|r| NamedReference {
                name: r.zone.clone(),
            }),
            profile: request.map(|r| NamedReference {
                name: r.profile.clone(),
            }),
            image: request.map(|r| NamedReference {
                name: r.image.clone(),
            }),
            primary_network_interface: request
                .and_then(|r| r.primary_network_interface.as_ref())
                .map(|p| NetworkInterface {
                    id: Some(format!("interface-{}", id)),
                    name: p.name.clone(),
                    subnet: Some(NamedReference {
                        name: p.subnet.clone(),
                    }),
                    primary_ipv4_address: Some(format!("10.0.0.{}", id)),
                }),
            network_interfaces: vec![],
            created_at: None,
        }
    }
}

#[async_trait::async_trait]
impl VpcClientTrait for MockVpcClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_instances(&self, name: Option<&str>) -> Result<Vec<Instance>, VpcError> {
        if let Some(message) = self.fail_list.lock().unwrap().take() {
            return Err(VpcError::Api(message));
        }
        let instances = self.instances.lock().unwrap();
        Ok(instances
            .iter()
            .filter(|i| name.is_none_or(|n| i.name == n))
            .cloned()
            .collect())
    }

    async fn get_instance(&self, id: &str) -> Result<Instance, VpcError> {
        self.instances
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| VpcError::NotFound(format!("Instance {} not found", id)))
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Instance, VpcError> {
        *self.create_calls.lock().unwrap() += 1;
        *self.last_create_request.lock().unwrap() = Some(request.clone());
        if let Some(message) = self.fail_create.lock().unwrap().take() {
            return Err(VpcError::Api(message));
        }
        let instance = self.make_instance(&request.name, Some(request));
        self.instances.lock().unwrap().push(instance.clone());
        Ok(instance)
    }

    async fn delete_instance(&self, id: &str) -> Result<(), VpcError> {
        if let Some(message) = self.fail_delete.lock().unwrap().take() {
            return Err(VpcError::Api(message));
        }
        let mut instances = self.instances.lock().unwrap();
        let before = instances.len();
        instances.retain(|i| i.id != id);
        if instances.len() == before {
            return Err(VpcError::NotFound(format!("Instance {} not found", id)));
        }
        Ok(())
    }
}
