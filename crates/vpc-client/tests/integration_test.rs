//! Integration tests for the VPC client
//!
//! These tests require a reachable VPC API.
//! Set VPC_API_ENDPOINT and VPC_API_TOKEN environment variables to run.

use vpc_client::{CreateInstanceRequest, VpcClient};

fn client_from_env() -> VpcClient {
    let url = std::env::var("VPC_API_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let token =
        std::env::var("VPC_API_TOKEN").expect("VPC_API_TOKEN environment variable must be set");

    VpcClient::new(url, token).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires reachable VPC API
async fn test_client_creation() {
    let client = client_from_env();

    // Test basic API connectivity
    let instances = client.list_instances(None).await;
    assert!(instances.is_ok(), "Failed to list instances");
}

#[tokio::test]
#[ignore]
async fn test_list_instances_by_name() {
    let client = client_from_env();

    let instances = client
        .list_instances(Some("does-not-exist"))
        .await
        .expect("Failed to list instances");

    assert!(instances.iter().all(|i| i.name == "does-not-exist"));
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_instance() {
    let client = client_from_env();

    let request = CreateInstanceRequest {
        name: "vpc-client-test".to_string(),
        image: std::env::var("VPC_TEST_IMAGE").unwrap_or_else(|_| "test-image".to_string()),
        profile: std::env::var("VPC_TEST_PROFILE").unwrap_or_else(|_| "bx2-2x8".to_string()),
        zone: std::env::var("VPC_TEST_ZONE").unwrap_or_else(|_| "eu-gb-1".to_string()),
        keys: vec![],
        user_data: None,
        primary_network_interface: None,
    };

    let instance = client.create_instance(&request).await;

    if let Ok(instance) = instance {
        println!("Created instance: {}", instance.id);

        // Clean up
        let _ = client.delete_instance(&instance.id).await;
    }
}
