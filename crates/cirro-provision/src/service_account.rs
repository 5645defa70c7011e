//! Service accounts: non-human principals that own API keys and appear
//! in role bindings.

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, DesiredState, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::engine::{self, Action, Mode, Outcome};

const PATH: &str = "/iam/v2/service-accounts";

/// Desired state of a service account. `name` is immutable after
/// creation; only the description converges on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceAccountSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub state: DesiredState,
}

/// Converge the remote service account toward `spec`.
pub async fn apply(client: &ApiClient, spec: &ServiceAccountSpec, mode: Mode) -> Result<Outcome> {
    let rows = client.get_all_pages(PATH, &[]).await?;
    let current = engine::resolve(
        &rows,
        "service account",
        spec.id.as_deref(),
        "/display_name",
        spec.name.as_deref(),
    )?;
    // display_name is immutable; only the description is diffed.
    let desired = json!({"description": spec.description});

    match engine::plan(current, Some(&desired), spec.state) {
        Action::Noop => Ok(Outcome::unchanged(current.cloned())),
        Action::Delete => {
            let id = current_id(current)?;
            if !mode.is_check() {
                client.delete(&format!("{PATH}/{id}")).await?;
            }
            Ok(Outcome::changed(current.cloned()))
        }
        Action::Create => {
            let name = spec.name.as_ref().ok_or_else(|| {
                CoreError::invalid_spec("name is required to create a service account")
            })?;
            let mut body = json!({
                "display_name": name,
                "description": spec.description,
            });
            engine::strip_nulls(&mut body);
            let created = if mode.is_check() {
                None
            } else {
                client.post(PATH, &body).await?
            };
            Ok(Outcome::changed(created))
        }
        Action::Update => {
            let id = current_id(current)?;
            let updated = if mode.is_check() {
                None
            } else {
                client.patch(&format!("{PATH}/{id}"), &desired).await?
            };
            Ok(Outcome::changed(updated))
        }
    }
}

/// List service accounts, narrowed by `ids` or `names` axes.
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
        .ok_or_else(|| CoreError::invalid_spec("service account record has no id").into())
}
