//! Connectivity and credential check.

use cirro_client::ApiClient;
use cirro_core::CoreError;
use serde_json::Value;

use crate::Result;

/// Verifies endpoint reachability and credentials with the cheapest
/// authenticated read: an environment listing of one entry. Returns
/// `"pong"` on success.
pub async fn ping(client: &ApiClient) -> Result<&'static str> {
    let response = client
        .get_query("/org/v2/environments", &[("page_size", "1".to_string())])
        .await?;

    let kind = response
        .as_ref()
        .and_then(|body| body.get("kind"))
        .and_then(Value::as_str);

    if kind == Some("EnvironmentList") {
        Ok("pong")
    } else {
        Err(CoreError::configuration(format!(
            "ping failed: unexpected response: {}",
            response
                .map(|body| body.to_string())
                .unwrap_or_else(|| "empty body".to_string())
        ))
        .into())
    }
}
