//! Integration tests for the cluster API client.
//!
//! These tests use wiremock to simulate server responses.

use acloud_api::{AcloudClient, ApiError, ClusterApi, CreateCluster, UpdateCluster};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLUSTER_PATH: &str = "/api/orgs/avisi/environments/prod/clusters/main";

fn cluster_json(status: &str) -> serde_json::Value {
    json!({
        "identity": "c-123",
        "slug": "main",
        "name": "main",
        "status": status,
        "organisationSlug": "avisi",
        "environmentSlug": "prod",
        "cloudProvider": "aws",
        "addons": {
            "kured": { "enabled": true, "customValues": { "timeZone": "UTC" } }
        }
    })
}

#[tokio::test]
async fn test_get_cluster_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_json("running")))
        .mount(&mock_server)
        .await;

    let client = AcloudClient::new(mock_server.uri(), "secret").unwrap();
    let cluster = client
        .get_cluster("avisi", "prod", "main")
        .await
        .unwrap()
        .expect("cluster should exist");

    assert_eq!(cluster.identity, "c-123");
    assert_eq!(cluster.status, "running");
    assert_eq!(cluster.cloud_provider, "aws");
    assert_eq!(cluster.addons["kured"].custom_values["timeZone"], "UTC");
}

#[tokio::test]
async fn test_get_cluster_not_found_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "not found" })))
        .mount(&mock_server)
        .await;

    let client = AcloudClient::new(mock_server.uri(), "secret").unwrap();
    let cluster = assert_ok!(client.get_cluster("avisi", "prod", "main").await);
    assert!(cluster.is_none());
}

#[tokio::test]
async fn test_get_cluster_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLUSTER_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid token" })),
        )
        .mount(&mock_server)
        .await;

    let client = AcloudClient::new(mock_server.uri(), "wrong").unwrap();
    let err = assert_err!(client.get_cluster("avisi", "prod", "main").await);

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid token");
        }
        other => panic!("Expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_cluster_sends_payload() {
    let mock_server = MockServer::start().await;

    let request = CreateCluster {
        name: "main".to_string(),
        version: "1.30".to_string(),
        region: "eu-west-1".to_string(),
        cloud_account_identity: "ca-1".to_string(),
        enable_multi_availability_zones: true,
        enable_network_encryption: true,
        sla: "none".to_string(),
        ..Default::default()
    };

    Mock::given(method("POST"))
        .and(path("/api/orgs/avisi/environments/prod/clusters"))
        .and(body_json(json!({
            "name": "main",
            "version": "1.30",
            "region": "eu-west-1",
            "cloudAccountIdentity": "ca-1",
            "enableMultiAvailabilityZones": true,
            "enableHighAvailability": false,
            "enableNATGateway": false,
            "enableNetworkEncryption": true,
            "sla": "none",
            "nodePools": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(cluster_json("provisioning")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AcloudClient::new(mock_server.uri(), "secret").unwrap();
    let cluster = client.create_cluster("avisi", "prod", &request).await.unwrap();

    assert_eq!(cluster.slug, "main");
    assert_eq!(cluster.status, "provisioning");
}

#[tokio::test]
async fn test_update_cluster_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(CLUSTER_PATH))
        .and(body_json(json!({ "status": "stopping" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AcloudClient::new(mock_server.uri(), "secret").unwrap();
    let updated = client
        .update_cluster("avisi", "prod", "main", &UpdateCluster::with_status("stopping"))
        .await
        .unwrap();

    assert!(updated.is_none());
}

#[tokio::test]
async fn test_delete_cluster_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(CLUSTER_PATH))
        .and(body_json(json!({ "status": "deleting" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = AcloudClient::new(mock_server.uri(), "secret").unwrap();
    let err = client
        .delete_cluster("avisi", "prod", "main", &UpdateCluster::with_status("deleting"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("boom"));
}
