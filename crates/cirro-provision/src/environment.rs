//! Environments: the top-level scope owning clusters, connectors, and
//! scoped role bindings.

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, DesiredState, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::engine::{self, Action, Mode, Outcome};

const PATH: &str = "/org/v2/environments";

/// Desired state of an environment. Identity is `id`, or `name` when no
/// id is given; supplying both renames the environment found by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub state: DesiredState,
}

/// Converge the remote environment toward `spec`.
pub async fn apply(client: &ApiClient, spec: &EnvironmentSpec, mode: Mode) -> Result<Outcome> {
    let rows = client.get_all_pages(PATH, &[]).await?;
    let current = engine::resolve(
        &rows,
        "environment",
        spec.id.as_deref(),
        "/display_name",
        spec.name.as_deref(),
    )?;
    let desired = spec.name.as_ref().map(|name| json!({"display_name": name}));

    match engine::plan(current, desired.as_ref(), spec.state) {
        Action::Noop => Ok(Outcome::unchanged(current.cloned())),
        Action::Delete => {
            let id = current_id(current)?;
            if !mode.is_check() {
                client.delete(&format!("{PATH}/{id}")).await?;
            }
            Ok(Outcome::changed(current.cloned()))
        }
        Action::Create => {
            let body = desired.ok_or_else(|| {
                CoreError::invalid_spec("name is required to create an environment")
            })?;
            let created = if mode.is_check() {
                None
            } else {
                client.post(PATH, &body).await?
            };
            Ok(Outcome::changed(created))
        }
        Action::Update => {
            let id = current_id(current)?;
            let body = desired
                .ok_or_else(|| CoreError::invalid_spec("name is required to update an environment"))?;
            let updated = if mode.is_check() {
                None
            } else {
                client.patch(&format!("{PATH}/{id}"), &body).await?
            };
            Ok(Outcome::changed(updated))
        }
    }
}

/// List environments, narrowed by `ids` or `names` axes.
pub async fn find(client: &ApiClient, selector: &Selector) -> Result<BTreeMap<String, Value>> {
    let rows = client.get_all_pages(PATH, &[]).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            selector.matches(|axis| match axis {
                "ids" => engine::field_str(row, "/id").map(str::to_owned),
                "names" => engine::field_str(row, "/display_name").map(str::to_owned),
                _ => None,
            })
        })
        .collect();
    Ok(engine::collect_keyed(rows, "/id"))
}

fn current_id(current: Option<&Value>) -> Result<&str> {
    current
        .and_then(|row| engine::field_str(row, "/id"))
        .ok_or_else(|| CoreError::invalid_spec("environment record has no id").into())
}
