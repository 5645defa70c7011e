use std::time::Duration;

use cirro_client::{ApiClient, ClientConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::new("AKIRRO", "sekret")
        .with_endpoint(server.uri())
        .with_retries(0)
        .with_retry_max_delay(Duration::from_millis(10));
    ApiClient::new(config).unwrap()
}

/// A single-page collection envelope.
pub fn page(kind: &str, data: Value) -> Value {
    json!({"kind": kind, "metadata": {}, "data": data})
}
