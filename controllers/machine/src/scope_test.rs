//! Unit tests for machine scope construction and reconciliation

#[cfg(test)]
mod tests {
    use crate::error::ControllerError;
    use crate::scope::{MachineScope, MachineScopeParams, VpcConfig};
    use crate::test_utils::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use std::sync::Arc;
    use vpc_client::MockVpcClient;

    #[test]
    fn test_new_machine_scope_missing_machine() {
        let vpc = MockVpcClient::new("http://test-vpc");

        let err = MachineScope::new(MachineScopeParams {
            machine: None,
            vpc_machine: Some(test_vpc_machine("worker-0")),
            vpc_client: Some(Arc::new(vpc)),
            bootstrap_provider: Some(Arc::new(MockBootstrapProvider::with_payload(
                b"user data".to_vec(),
            ))),
            vpc_config: None,
        })
        .unwrap_err();

        assert!(matches!(err, ControllerError::MissingMachineReference));
    }

    #[test]
    fn test_new_machine_scope_missing_infrastructure() {
        let vpc = MockVpcClient::new("http://test-vpc");

        let err = MachineScope::new(MachineScopeParams {
            machine: Some(test_machine("worker-0", "test-cluster", Some("bootstrap"))),
            vpc_machine: None,
            vpc_client: Some(Arc::new(vpc)),
            bootstrap_provider: Some(Arc::new(MockBootstrapProvider::with_payload(
                b"user data".to_vec(),
            ))),
            vpc_config: None,
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ControllerError::MissingInfrastructureReference
        ));
    }

    #[test]
    fn test_new_machine_scope_missing_client_settings() {
        let err = MachineScope::new(MachineScopeParams {
            machine: Some(test_machine("worker-0", "test-cluster", Some("bootstrap"))),
            vpc_machine: Some(test_vpc_machine("worker-0")),
            vpc_client: None,
            bootstrap_provider: Some(Arc::new(MockBootstrapProvider::with_payload(
                b"user data".to_vec(),
            ))),
            vpc_config: None,
        })
        .unwrap_err();

        assert!(matches!(err, ControllerError::InvalidConfig(_)));
    }

    #[test]
    fn test_new_machine_scope_builds_client_from_config() {
        let scope = MachineScope::new(MachineScopeParams {
            machine: Some(test_machine("worker-0", "test-cluster", Some("bootstrap"))),
            vpc_machine: Some(test_vpc_machine("worker-0")),
            vpc_client: None,
            bootstrap_provider: Some(Arc::new(MockBootstrapProvider::with_payload(
                b"user data".to_vec(),
            ))),
            vpc_config: Some(VpcConfig {
                api_endpoint: "https://eu-gb.vpc.example.com".to_string(),
                token: "test-token".to_string(),
            }),
        })
        .unwrap();

        assert_eq!(scope.cluster_name(), "test-cluster");
        assert_eq!(scope.name(), "worker-0");
    }

    #[tokio::test]
    async fn test_create_machine() {
        let vpc = MockVpcClient::new("http://test-vpc");
        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let instance = scope.create_machine().await.unwrap();

        assert_eq!(instance.name, "worker-0");
        assert_eq!(vpc.create_calls(), 1);

        // The create request merges the machine spec with the bootstrap
        // payload as user data
        let request = vpc.last_create_request().unwrap();
        assert_eq!(request.image, "ubuntu-24-04-amd64");
        assert_eq!(request.profile, "bx2-2x8");
        assert_eq!(request.zone, "eu-gb-1");
        assert_eq!(request.keys, vec!["ssh-key-1".to_string()]);
        assert_eq!(request.user_data, Some(BASE64.encode(b"user data")));
        assert_eq!(
            request.primary_network_interface.unwrap().subnet,
            "subnet-1"
        );
    }

    #[tokio::test]
    async fn test_create_machine_is_idempotent() {
        let vpc = MockVpcClient::new("http://test-vpc");
        let machine = test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap"));
        let vpc_machine = test_vpc_machine("worker-0");

        let scope = test_scope(
            machine.clone(),
            vpc_machine.clone(),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );
        let first = scope.create_machine().await.unwrap();

        // Second reconcile with a fresh scope for the same machine name
        let scope = test_scope(
            machine,
            vpc_machine,
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );
        let second = scope.create_machine().await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(vpc.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_machine_returns_existing_instance() {
        let vpc = MockVpcClient::new("http://test-vpc");
        let existing = vpc.seed_instance("worker-0");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let instance = scope.create_machine().await.unwrap();

        assert_eq!(instance.id, existing.id);
        assert_eq!(vpc.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_find_instance_returns_first_match() {
        let vpc = MockVpcClient::new("http://test-vpc");
        let first = vpc.seed_instance("worker-0");
        let second = vpc.seed_instance("worker-0");
        assert_ne!(first.id, second.id);

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let found = scope.find_instance_by_name("worker-0").await.unwrap();
        assert_eq!(found.unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_create_machine_lookup_error_short_circuits() {
        let vpc = MockVpcClient::new("http://test-vpc");
        vpc.fail_list("Error when listing instances");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let err = scope.create_machine().await.unwrap_err();

        assert!(matches!(err, ControllerError::InstanceLookup(_, _)));
        assert_eq!(vpc.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_machine_missing_bootstrap_reference() {
        let vpc = MockVpcClient::new("http://test-vpc");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", None),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let err = scope.create_machine().await.unwrap_err();

        assert!(matches!(err, ControllerError::MissingBootstrapReference(_)));
        assert_eq!(vpc.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_machine_bootstrap_data_unavailable() {
        let vpc = MockVpcClient::new("http://test-vpc");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::unavailable(),
        );

        let err = scope.create_machine().await.unwrap_err();

        assert!(matches!(
            err,
            ControllerError::BootstrapDataUnavailable(_, _)
        ));
        assert_eq!(vpc.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_machine_provider_rejection() {
        let vpc = MockVpcClient::new("http://test-vpc");
        vpc.fail_create("Failed when creating instance");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let err = scope.create_machine().await.unwrap_err();

        assert!(matches!(err, ControllerError::InstanceCreation(_, _)));
    }

    #[tokio::test]
    async fn test_delete_machine() {
        let vpc = MockVpcClient::new("http://test-vpc");
        let existing = vpc.seed_instance("worker-0");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine_with_instance("worker-0", &existing.id),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        scope.delete_machine().await.unwrap();
        assert!(vpc.instances().is_empty());
    }

    #[tokio::test]
    async fn test_delete_machine_already_absent() {
        let vpc = MockVpcClient::new("http://test-vpc");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine_with_instance("worker-0", "instance-42"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        // The provider reports NotFound; deletion still succeeds
        scope.delete_machine().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_machine_provider_rejection() {
        let vpc = MockVpcClient::new("http://test-vpc");
        let existing = vpc.seed_instance("worker-0");
        vpc.fail_delete("Failed instance deletion");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine_with_instance("worker-0", &existing.id),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        let err = scope.delete_machine().await.unwrap_err();
        assert!(matches!(err, ControllerError::InstanceDeletion(_, _, _)));
    }

    #[tokio::test]
    async fn test_delete_machine_without_recorded_instance() {
        let vpc = MockVpcClient::new("http://test-vpc");
        // Armed failure proves no delete call is issued when the status
        // records no instance
        vpc.fail_delete("should not be called");

        let scope = test_scope(
            test_machine("worker-0", "test-cluster", Some("worker-0-bootstrap")),
            test_vpc_machine("worker-0"),
            &vpc,
            MockBootstrapProvider::with_payload(b"user data".to_vec()),
        );

        scope.delete_machine().await.unwrap();
    }
}
