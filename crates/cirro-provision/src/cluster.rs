//! Kafka clusters, scoped to an environment.
//!
//! Placement fields (availability, cloud, region, network) are immutable
//! after provisioning; desired drift on one of them is a spec error, not
//! a silent no-op. The only mutable fields are the display name and the
//! cluster kind (Basic -> Standard).

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, DesiredState, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::engine::{self, Action, Mode, Outcome};

const PATH: &str = "/cmk/v2/clusters";

/// Availability zone configuration. Immutable after provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    SingleZone,
    MultiZone,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleZone => write!(f, "SINGLE_ZONE"),
            Self::MultiZone => write!(f, "MULTI_ZONE"),
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SINGLE_ZONE" => Ok(Self::SingleZone),
            "MULTI_ZONE" => Ok(Self::MultiZone),
            other => Err(CoreError::invalid_spec(format!(
                "unknown availability \"{other}\" (expected SINGLE_ZONE or MULTI_ZONE)"
            ))),
        }
    }
}

/// Cloud provider hosting the cluster. Immutable after provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cloud {
    Aws,
    Gcp,
    Azure,
}

impl std::fmt::Display for Cloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aws => write!(f, "AWS"),
            Self::Gcp => write!(f, "GCP"),
            Self::Azure => write!(f, "AZURE"),
        }
    }
}

impl std::str::FromStr for Cloud {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "AWS" => Ok(Self::Aws),
            "GCP" => Ok(Self::Gcp),
            "AZURE" => Ok(Self::Azure),
            other => Err(CoreError::invalid_spec(format!(
                "unknown cloud \"{other}\" (expected AWS, GCP, or AZURE)"
            ))),
        }
    }
}

/// Cluster tier. Only Basic -> Standard changes are accepted after
/// provisioning; the control plane rejects the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterKind {
    Basic,
    Standard,
    Dedicated,
}

impl std::fmt::Display for ClusterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "Basic"),
            Self::Standard => write!(f, "Standard"),
            Self::Dedicated => write!(f, "Dedicated"),
        }
    }
}

impl std::str::FromStr for ClusterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(Self::Basic),
            "Standard" => Ok(Self::Standard),
            "Dedicated" => Ok(Self::Dedicated),
            other => Err(CoreError::invalid_spec(format!(
                "unknown cluster kind \"{other}\" (expected Basic, Standard, or Dedicated)"
            ))),
        }
    }
}

/// Desired state of a cluster. `environment` is the parent scope and is
/// always required; placement fields are required on create only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub environment: String,
    pub availability: Option<Availability>,
    pub cloud: Option<Cloud>,
    pub region: Option<String>,
    pub kind: Option<ClusterKind>,
    pub cku: Option<u32>,
    pub encryption_key: Option<String>,
    pub network: Option<String>,
    #[serde(default)]
    pub state: DesiredState,
}

/// Converge the remote cluster toward `spec`.
pub async fn apply(client: &ApiClient, spec: &ClusterSpec, mode: Mode) -> Result<Outcome> {
    let query = [("environment", spec.environment.clone())];
    let rows = client.get_all_pages(PATH, &query).await?;
    let current = engine::resolve(
        &rows,
        "cluster",
        spec.id.as_deref(),
        "/spec/display_name",
        spec.name.as_deref(),
    )?;

    if let Some(cur) = current
        && spec.state == DesiredState::Present
    {
        check_immutable(cur, spec)?;
    }

    let desired = update_body(spec);

    match engine::plan(current, Some(&desired), spec.state) {
        Action::Noop => Ok(Outcome::unchanged(current.cloned())),
        Action::Delete => {
            let id = current_id(current)?;
            if !mode.is_check() {
                client
                    .delete_query(&format!("{PATH}/{id}"), &query)
                    .await?;
            }
            Ok(Outcome::changed(current.cloned()))
        }
        Action::Create => {
            let body = create_body(spec)?;
            let created = if mode.is_check() {
                None
            } else {
                client.post(PATH, &body).await?
            };
            Ok(Outcome::changed(created))
        }
        Action::Update => {
            let id = current_id(current)?;
            // The PATCH body is the diffed subset plus the mandatory
            // environment routing field, which is never part of the diff.
            let mut body = desired.clone();
            engine::strip_nulls(&mut body);
            body["spec"]["environment"] = json!({"id": spec.environment});
            let updated = if mode.is_check() {
                None
            } else {
                client.patch(&format!("{PATH}/{id}"), &body).await?
            };
            Ok(Outcome::changed(updated))
        }
    }
}

/// List clusters in an environment, narrowed by `ids` or `names` axes.
pub async fn find(
    client: &ApiClient,
    environment: &str,
    selector: &Selector,
) -> Result<BTreeMap<String, Value>> {
    let query = [("environment", environment.to_string())];
    let rows = client.get_all_pages(PATH, &query).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            selector.matches(|axis| match axis {
                "ids" => engine::field_str(row, "/id").map(str::to_owned),
                "names" => engine::field_str(row, "/spec/display_name").map(str::to_owned),
                _ => None,
            })
        })
        .collect();
    Ok(engine::collect_keyed(rows, "/id"))
}

/// The mutable subset diffed against current state.
fn update_body(spec: &ClusterSpec) -> Value {
    json!({
        "spec": {
            "display_name": spec.name,
            "config": {
                "kind": spec.kind,
            },
        },
    })
}

fn create_body(spec: &ClusterSpec) -> Result<Value> {
    let name = require(spec.name.as_deref(), "name")?;
    let cloud = spec
        .cloud
        .ok_or_else(|| CoreError::invalid_spec("cloud is required to create a cluster"))?;
    let region = require(spec.region.as_deref(), "region")?;
    let kind = spec.kind.unwrap_or(ClusterKind::Basic);
    let availability = spec.availability.unwrap_or(Availability::SingleZone);

    let mut config = json!({"kind": kind});
    if kind == ClusterKind::Dedicated {
        config["cku"] = json!(spec.cku.unwrap_or(1));
        if let Some(key) = &spec.encryption_key {
            config["encryption_key"] = json!(key);
        }
    }

    let mut body = json!({
        "spec": {
            "display_name": name,
            "availability": availability,
            "cloud": cloud,
            "region": region,
            "config": config,
            "environment": {"id": spec.environment},
        },
    });
    if let Some(network) = &spec.network {
        body["spec"]["network"] = json!({"id": network});
    }
    Ok(body)
}

fn check_immutable(current: &Value, spec: &ClusterSpec) -> Result<()> {
    let placement = [
        (
            "availability",
            spec.availability.map(|v| v.to_string()),
            "/spec/availability",
        ),
        ("cloud", spec.cloud.map(|v| v.to_string()), "/spec/cloud"),
        ("region", spec.region.clone(), "/spec/region"),
        ("network", spec.network.clone(), "/spec/network/id"),
    ];

    for (field, desired, pointer) in placement {
        if let Some(want) = desired
            && let Some(have) = engine::field_str(current, pointer)
            && have != want
        {
            return Err(CoreError::invalid_spec(format!(
                "{field} is immutable after provisioning (current {have}, requested {want})"
            ))
            .into());
        }
    }
    Ok(())
}

fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    value.ok_or_else(|| {
        CoreError::invalid_spec(format!("{field} is required to create a cluster")).into()
    })
}

fn current_id(current: Option<&Value>) -> Result<&str> {
    current
        .and_then(|row| engine::field_str(row, "/id"))
        .ok_or_else(|| CoreError::invalid_spec("cluster record has no id").into())
}
