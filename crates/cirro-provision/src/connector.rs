//! Managed connectors, scoped to a cluster within an environment.
//!
//! Connectors break the usual collection conventions: the expanded
//! listing returns a map keyed by connector name instead of a paged
//! envelope, identity is by name only, and besides present/absent the
//! desired state extends to the run states `paused` and `running`.

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, Selector, diff};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::Result;
use crate::engine::{Mode, Outcome};

/// Desired condition of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorState {
    #[default]
    Present,
    Absent,
    Paused,
    Running,
}

impl std::fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
            Self::Paused => write!(f, "paused"),
            Self::Running => write!(f, "running"),
        }
    }
}

impl std::str::FromStr for ConnectorState {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "paused" => Ok(Self::Paused),
            "running" => Ok(Self::Running),
            other => Err(CoreError::invalid_spec(format!(
                "unknown connector state \"{other}\" (expected present, absent, paused, or running)"
            ))),
        }
    }
}

/// Desired state of a connector. The effective configuration is the
/// standard keys (name, Kafka credentials, connector class) merged with
/// `props`, where class-specific `props` win on collision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorSpec {
    pub environment: String,
    pub cluster: String,
    pub name: String,
    pub connector_class: Option<String>,
    pub kafka_key: Option<String>,
    pub kafka_secret: Option<String>,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
    #[serde(default)]
    pub state: ConnectorState,
}

fn collection_path(environment: &str, cluster: &str) -> String {
    format!("/connect/v1/environments/{environment}/clusters/{cluster}/connectors")
}

/// Converge the remote connector toward `spec`.
pub async fn apply(client: &ApiClient, spec: &ConnectorSpec, mode: Mode) -> Result<Outcome> {
    let base = collection_path(&spec.environment, &spec.cluster);
    let connectors = list_expanded(client, &spec.environment, &spec.cluster).await?;
    let current = connectors.get(&spec.name);

    match spec.state {
        ConnectorState::Absent => match current {
            None => Ok(Outcome::unchanged(None)),
            Some(cur) => {
                if !mode.is_check() {
                    client.delete(&format!("{base}/{}", spec.name)).await?;
                }
                Ok(Outcome::changed(Some(canonicalize(cur))))
            }
        },
        ConnectorState::Paused | ConnectorState::Running => match current {
            None => Err(CoreError::not_found("connector", spec.name.clone()).into()),
            Some(cur) => {
                let verb = if spec.state == ConnectorState::Paused {
                    "pause"
                } else {
                    "resume"
                };
                if !mode.is_check() {
                    client
                        .put(&format!("{base}/{}/{verb}", spec.name), None)
                        .await?;
                }
                Ok(Outcome::changed(Some(canonicalize(cur))))
            }
        },
        ConnectorState::Present => {
            let config = desired_config(spec);
            match current {
                None => {
                    let body = json!({"name": spec.name, "config": config});
                    let created = if mode.is_check() {
                        None
                    } else {
                        client.post(&base, &body).await?
                    };
                    Ok(Outcome::changed(created))
                }
                Some(cur) => {
                    let running_config = cur.pointer("/info/config").cloned().unwrap_or(Value::Null);
                    if diff::differs(&running_config, &config) {
                        let updated = if mode.is_check() {
                            None
                        } else {
                            client
                                .put(&format!("{base}/{}/config", spec.name), Some(&config))
                                .await?
                        };
                        Ok(Outcome::changed(updated))
                    } else {
                        Ok(Outcome::unchanged(Some(canonicalize(cur))))
                    }
                }
            }
        }
    }
}

/// List connectors in a cluster, narrowed by `names`, `types`, or
/// `classes` axes. Records are returned in canonical shape, keyed by
/// connector name.
pub async fn find(
    client: &ApiClient,
    environment: &str,
    cluster: &str,
    selector: &Selector,
) -> Result<BTreeMap<String, Value>> {
    let connectors = list_expanded(client, environment, cluster).await?;
    Ok(connectors
        .iter()
        .filter(|(_, row)| {
            selector.matches(|axis| {
                let pointer = match axis {
                    "names" => "/info/name",
                    "types" => "/info/type",
                    "classes" => "/info/config/connector.class",
                    _ => return None,
                };
                row.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
            })
        })
        .map(|(name, row)| (name.clone(), canonicalize(row)))
        .collect())
}

/// Fetches the expanded listing: a map of connector name to its `info`
/// and `status` sub-objects.
async fn list_expanded(
    client: &ApiClient,
    environment: &str,
    cluster: &str,
) -> Result<Map<String, Value>> {
    let response = client
        .get_query(
            &collection_path(environment, cluster),
            &[
                ("expand", "status,info".to_string()),
                ("page_size", "100".to_string()),
            ],
        )
        .await?;
    match response {
        Some(Value::Object(map)) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// The full configuration submitted on create and update: standard keys
/// first, then class-specific props (which win on collision).
fn desired_config(spec: &ConnectorSpec) -> Value {
    let mut config = Map::new();
    config.insert("name".to_string(), json!(spec.name));
    if let Some(key) = &spec.kafka_key {
        config.insert("kafka.api.key".to_string(), json!(key));
    }
    if let Some(secret) = &spec.kafka_secret {
        config.insert("kafka.api.secret".to_string(), json!(secret));
    }
    if let Some(class) = &spec.connector_class {
        config.insert("connector.class".to_string(), json!(class));
    }
    for (key, value) in &spec.props {
        config.insert(key.clone(), json!(value));
    }
    Value::Object(config)
}

/// Hoists the expanded sub-objects into the flat record callers see.
fn canonicalize(expanded: &Value) -> Value {
    json!({
        "name": expanded.pointer("/info/name"),
        "type": expanded.pointer("/info/type"),
        "config": expanded.pointer("/info/config"),
        "status": expanded.pointer("/status/connector"),
        "tasks": expanded.pointer("/status/tasks"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;

    fn datagen_spec() -> ConnectorSpec {
        ConnectorSpec {
            environment: "env-1".to_string(),
            cluster: "lkc-1".to_string(),
            name: "datagen_source".to_string(),
            connector_class: Some("DatagenSource".to_string()),
            kafka_key: Some("AK".to_string()),
            kafka_secret: Some("SK".to_string()),
            props: BTreeMap::from([
                ("output.data.format".to_string(), "JSON".to_string()),
                ("quickstart".to_string(), "ORDERS".to_string()),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_desired_config_merges_props() {
        assert_json_eq!(
            desired_config(&datagen_spec()),
            json!({
                "name": "datagen_source",
                "kafka.api.key": "AK",
                "kafka.api.secret": "SK",
                "connector.class": "DatagenSource",
                "output.data.format": "JSON",
                "quickstart": "ORDERS",
            })
        );
    }

    #[test]
    fn test_props_win_over_standard_keys() {
        let mut spec = datagen_spec();
        spec.props
            .insert("connector.class".to_string(), "Overridden".to_string());
        let config = desired_config(&spec);
        assert_eq!(config["connector.class"], "Overridden");
    }

    #[test]
    fn test_canonicalize_hoists_expanded_fields() {
        let expanded = json!({
            "id": {"id": "lcc-1"},
            "info": {
                "name": "datagen_source",
                "type": "source",
                "config": {"connector.class": "DatagenSource"},
            },
            "status": {
                "connector": {"state": "RUNNING"},
                "tasks": [{"id": 0, "state": "RUNNING"}],
            },
        });
        let canonical = canonicalize(&expanded);
        assert_eq!(canonical["name"], "datagen_source");
        assert_eq!(canonical["type"], "source");
        assert_eq!(canonical["status"]["state"], "RUNNING");
        assert_eq!(canonical["tasks"][0]["id"], 0);
        assert!(canonical.get("info").is_none());
    }

    #[test]
    fn test_connector_state_parse() {
        assert_eq!("paused".parse::<ConnectorState>().unwrap(), ConnectorState::Paused);
        assert!("stopped".parse::<ConnectorState>().is_err());
    }
}
