//! Convergence flows for IAM resources and connectors against a mock
//! control plane.

mod common;

use common::*;
use cirro_core::{DesiredState, Selector};
use cirro_provision::api_key::{self, ApiKeySpec};
use cirro_provision::connector::{self, ConnectorSpec, ConnectorState};
use cirro_provision::engine::Mode;
use cirro_provision::ping;
use cirro_provision::role_binding::{self, RoleBindingSpec};
use cirro_provision::user::{self, UserSpec};
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn api_key_create_response_is_flattened() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/api-keys"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page("ApiKeyList", json!([]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/iam/v2/api-keys"))
        .and(body_json(json!({
            "spec": {
                "display_name": "ingest",
                "owner": {"id": "sa-1"},
                "resource": {"id": "lkc-1"},
            },
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ak-9",
            "spec": {
                "display_name": "ingest",
                "owner": {"id": "sa-1"},
                "resource": {"id": "lkc-1"},
                "secret": "shhh",
            },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = ApiKeySpec {
        name: Some("ingest".to_string()),
        owner: Some("sa-1".to_string()),
        resource: Some("lkc-1".to_string()),
        ..Default::default()
    };
    let outcome = api_key::apply(&client, &spec, Mode::Apply).await.unwrap();

    assert!(outcome.changed);
    let resource = outcome.resource.unwrap();
    assert_eq!(resource["name"], "ingest");
    assert_eq!(resource["secret"], "shhh");
    assert!(resource.get("spec").is_none());
}

#[tokio::test]
async fn api_key_find_filters_by_owner() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/api-keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "ApiKeyList",
            json!([
                {"id": "ak-1", "spec": {"display_name": "a", "owner": {"id": "sa-1"}}},
                {"id": "ak-2", "spec": {"display_name": "b", "owner": {"id": "sa-2"}}},
            ]),
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let selector = Selector::new()
        .axis("ids", vec![])
        .axis("owners", vec!["sa-2".to_string()])
        .axis("names", vec![]);
    let found = api_key::find(&client, &selector).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found["ak-2"]["owner"]["id"], "sa-2");
}

#[tokio::test]
async fn missing_user_is_invited_by_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page("UserList", json!([]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/invitations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page("InvitationList", json!([]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/iam/v2/invitations"))
        .and(body_json(json!({"email": "new@example.com"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "i-9",
            "kind": "Invitation",
            "email": "new@example.com",
            "user": {"id": "u-42"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = UserSpec {
        email: Some("new@example.com".to_string()),
        ..Default::default()
    };
    let outcome = user::apply(&client, &spec, Mode::Apply).await.unwrap();

    assert!(outcome.changed);
    let resource = outcome.resource.unwrap();
    assert_eq!(resource["id"], "u-42");
    assert_eq!(resource["invitation"], "i-9");
}

#[tokio::test]
async fn pending_invitation_is_withdrawn_on_its_own_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page("UserList", json!([]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/invitations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "InvitationList",
            json!([{
                "id": "i-9",
                "kind": "Invitation",
                "email": "pending@example.com",
                "user": {"id": "u-42"},
            }]),
        )))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/iam/v2/invitations/i-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = UserSpec {
        email: Some("pending@example.com".to_string()),
        state: DesiredState::Absent,
        ..Default::default()
    };
    let outcome = user::apply(&client, &spec, Mode::Apply).await.unwrap();
    assert!(outcome.changed);
}

#[tokio::test]
async fn existing_role_binding_is_never_rewritten() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/role-bindings"))
        .and(query_param("crn_pattern", "crn://cloud/organization=1/environment=env-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "RoleBindingList",
            json!([{
                "id": "rb-1",
                "principal": "User:sa-1",
                "role_name": "EnvironmentAdmin",
            }]),
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = RoleBindingSpec {
        resource_uri: "crn://cloud/organization=1/environment=env-1".to_string(),
        // short form is canonicalized before matching
        principal: Some("sa-1".to_string()),
        role: Some("EnvironmentAdmin".to_string()),
        ..Default::default()
    };
    let outcome = role_binding::apply(&client, &spec, Mode::Apply).await.unwrap();

    assert!(!outcome.changed);
    let resource = outcome.resource.unwrap();
    assert_eq!(resource["role"], "EnvironmentAdmin");
    assert!(resource.get("role_name").is_none());
}

#[tokio::test]
async fn role_binding_create_uses_wire_field_names() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/iam/v2/role-bindings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page("RoleBindingList", json!([]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/iam/v2/role-bindings"))
        .and(body_json(json!({
            "principal": "User:sa-1",
            "role_name": "CloudClusterAdmin",
            "crn_pattern": "crn://cloud/organization=1",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "rb-9",
            "principal": "User:sa-1",
            "role_name": "CloudClusterAdmin",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = RoleBindingSpec {
        resource_uri: "crn://cloud/organization=1".to_string(),
        principal: Some("sa-1".to_string()),
        role: Some("CloudClusterAdmin".to_string()),
        ..Default::default()
    };
    let outcome = role_binding::apply(&client, &spec, Mode::Apply).await.unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.resource.unwrap()["role"], "CloudClusterAdmin");
}

fn expanded_connector(state: &str) -> serde_json::Value {
    json!({
        "datagen_source": {
            "info": {
                "name": "datagen_source",
                "type": "source",
                "config": {
                    "name": "datagen_source",
                    "connector.class": "DatagenSource",
                    "kafka.api.key": "AK",
                    "kafka.api.secret": "SK",
                    "quickstart": "ORDERS",
                },
            },
            "status": {
                "connector": {"state": state},
                "tasks": [{"id": 0, "state": state}],
            },
        },
    })
}

const CONNECTORS: &str = "/connect/v1/environments/env-1/clusters/lkc-1/connectors";

#[tokio::test]
async fn matching_connector_config_is_a_noop() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CONNECTORS))
        .and(query_param("expand", "status,info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(expanded_connector("RUNNING")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = ConnectorSpec {
        environment: "env-1".to_string(),
        cluster: "lkc-1".to_string(),
        name: "datagen_source".to_string(),
        connector_class: Some("DatagenSource".to_string()),
        kafka_key: Some("AK".to_string()),
        kafka_secret: Some("SK".to_string()),
        props: BTreeMap::from([("quickstart".to_string(), "ORDERS".to_string())]),
        ..Default::default()
    };
    let outcome = connector::apply(&client, &spec, Mode::Apply).await.unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.resource.unwrap()["status"]["state"], "RUNNING");
}

#[tokio::test]
async fn drifted_connector_config_is_put_in_full() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CONNECTORS))
        .respond_with(ResponseTemplate::new(200).set_body_json(expanded_connector("RUNNING")))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{CONNECTORS}/datagen_source/config")))
        .and(body_json(json!({
            "name": "datagen_source",
            "connector.class": "DatagenSource",
            "kafka.api.key": "AK",
            "kafka.api.secret": "SK",
            "quickstart": "USERS",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "datagen_source",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = ConnectorSpec {
        environment: "env-1".to_string(),
        cluster: "lkc-1".to_string(),
        name: "datagen_source".to_string(),
        connector_class: Some("DatagenSource".to_string()),
        kafka_key: Some("AK".to_string()),
        kafka_secret: Some("SK".to_string()),
        props: BTreeMap::from([("quickstart".to_string(), "USERS".to_string())]),
        ..Default::default()
    };
    let outcome = connector::apply(&client, &spec, Mode::Apply).await.unwrap();
    assert!(outcome.changed);
}

#[tokio::test]
async fn connector_pause_hits_the_pause_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CONNECTORS))
        .respond_with(ResponseTemplate::new(200).set_body_json(expanded_connector("RUNNING")))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{CONNECTORS}/datagen_source/pause")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = ConnectorSpec {
        environment: "env-1".to_string(),
        cluster: "lkc-1".to_string(),
        name: "datagen_source".to_string(),
        state: ConnectorState::Paused,
        ..Default::default()
    };
    let outcome = connector::apply(&client, &spec, Mode::Apply).await.unwrap();
    assert!(outcome.changed);
}

#[tokio::test]
async fn pausing_a_missing_connector_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CONNECTORS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let spec = ConnectorSpec {
        environment: "env-1".to_string(),
        cluster: "lkc-1".to_string(),
        name: "ghost".to_string(),
        state: ConnectorState::Paused,
        ..Default::default()
    };
    let err = connector::apply(&client, &spec, Mode::Apply).await.unwrap_err();
    assert!(err.to_string().contains("connector not found"));
}

#[tokio::test]
async fn connector_find_filters_by_class() {
    let server = MockServer::start().await;

    let mut listing = expanded_connector("RUNNING");
    listing["s3_sink"] = json!({
        "info": {
            "name": "s3_sink",
            "type": "sink",
            "config": {"connector.class": "S3Sink"},
        },
        "status": {"connector": {"state": "RUNNING"}, "tasks": []},
    });

    Mock::given(method("GET"))
        .and(path(CONNECTORS))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let selector = Selector::new()
        .axis("names", vec![])
        .axis("types", vec![])
        .axis("classes", vec!["S3Sink".to_string()]);
    let found = connector::find(&client, "env-1", "lkc-1", &selector).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found["s3_sink"]["type"], "sink");
}

#[tokio::test]
async fn ping_succeeds_against_environment_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/org/v2/environments"))
        .and(query_param("page_size", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "EnvironmentList",
            "metadata": {},
            "data": [],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(ping::ping(&client).await.unwrap(), "pong");
}

#[tokio::test]
async fn ping_rejects_unexpected_payloads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/org/v2/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "Error"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = ping::ping(&client).await.unwrap_err();
    assert!(err.to_string().contains("ping failed"));
}
