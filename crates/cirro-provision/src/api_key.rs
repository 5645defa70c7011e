//! API keys: credentials owned by a user or service account, optionally
//! scoped to a cluster.
//!
//! The wire shape nests everything under `spec`; callers see a flattened
//! record (`name`, `description`, `owner`, `resource`, `secret`). The
//! secret appears exactly once, in the create response, and is never
//! persisted by this crate.

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, DesiredState, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::engine::{self, Action, Mode, Outcome};

const PATH: &str = "/iam/v2/api-keys";

/// Desired state of an API key. `owner` is a user or service account id;
/// `resource` is a cluster id, or `None` for a cloud key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeySpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub resource: Option<String>,
    #[serde(default)]
    pub state: DesiredState,
}

/// Converge the remote API key toward `spec`.
pub async fn apply(client: &ApiClient, spec: &ApiKeySpec, mode: Mode) -> Result<Outcome> {
    let rows = client.get_all_pages(PATH, &[]).await?;
    let current = engine::resolve(
        &rows,
        "api key",
        spec.id.as_deref(),
        "/spec/display_name",
        spec.name.as_deref(),
    )?;
    let desired = json!({
        "spec": {
            "display_name": spec.name,
            "description": spec.description,
        },
    });

    match engine::plan(current, Some(&desired), spec.state) {
        Action::Noop => Ok(Outcome::unchanged(current.cloned().map(flatten))),
        Action::Delete => {
            let id = current_id(current)?;
            if !mode.is_check() {
                client.delete(&format!("{PATH}/{id}")).await?;
            }
            Ok(Outcome::changed(current.cloned().map(flatten)))
        }
        Action::Create => {
            let body = create_body(spec)?;
            let created = if mode.is_check() {
                None
            } else {
                client.post(PATH, &body).await?
            };
            Ok(Outcome::changed(created.map(flatten)))
        }
        Action::Update => {
            let id = current_id(current)?;
            let mut body = desired.clone();
            engine::strip_nulls(&mut body);
            let updated = if mode.is_check() {
                None
            } else {
                client.patch(&format!("{PATH}/{id}"), &body).await?
            };
            Ok(Outcome::changed(updated.map(flatten)))
        }
    }
}

/// List API keys, narrowed by `ids`, `owners`, or `names` axes. Records
/// are returned in their flattened shape.
pub async fn find(client: &ApiClient, selector: &Selector) -> Result<BTreeMap<String, Value>> {
    let rows = client.get_all_pages(PATH, &[]).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            selector.matches(|axis| match axis {
                "ids" => engine::field_str(row, "/id").map(str::to_owned),
                "owners" => engine::field_str(row, "/spec/owner/id").map(str::to_owned),
                "names" => engine::field_str(row, "/spec/display_name").map(str::to_owned),
                _ => None,
            })
        })
        .map(flatten)
        .collect();
    Ok(engine::collect_keyed(rows, "/id"))
}

fn create_body(spec: &ApiKeySpec) -> Result<Value> {
    let name = spec
        .name
        .as_ref()
        .ok_or_else(|| CoreError::invalid_spec("name is required to create an api key"))?;
    let owner = spec
        .owner
        .as_ref()
        .ok_or_else(|| CoreError::invalid_spec("owner is required to create an api key"))?;

    let mut body = json!({
        "spec": {
            "display_name": name,
            "description": spec.description,
            "owner": {"id": owner},
        },
    });
    engine::strip_nulls(&mut body);
    if let Some(resource) = &spec.resource {
        body["spec"]["resource"] = json!({"id": resource});
    }
    Ok(body)
}

/// Hoists the interesting `spec` fields to the top level and renames
/// `display_name` to `name`.
fn flatten(mut row: Value) -> Value {
    let spec = match row.as_object_mut().and_then(|obj| obj.remove("spec")) {
        Some(Value::Object(spec)) => spec,
        _ => return row,
    };
    if let Some(obj) = row.as_object_mut() {
        if let Some(name) = spec.get("display_name") {
            obj.insert("name".to_string(), name.clone());
        }
        for key in ["description", "owner", "resource", "secret"] {
            if let Some(value) = spec.get(key) {
                obj.insert(key.to_string(), value.clone());
            }
        }
    }
    row
}

fn current_id(current: Option<&Value>) -> Result<&str> {
    current
        .and_then(|row| engine::field_str(row, "/id"))
        .ok_or_else(|| CoreError::invalid_spec("api key record has no id").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;

    #[test]
    fn test_create_body_nests_owner_and_resource() {
        let spec = ApiKeySpec {
            name: Some("ingest".to_string()),
            description: Some("ingest pipeline".to_string()),
            owner: Some("sa-1".to_string()),
            resource: Some("lkc-1".to_string()),
            ..Default::default()
        };
        assert_json_eq!(
            create_body(&spec).unwrap(),
            json!({
                "spec": {
                    "display_name": "ingest",
                    "description": "ingest pipeline",
                    "owner": {"id": "sa-1"},
                    "resource": {"id": "lkc-1"},
                },
            })
        );
    }

    #[test]
    fn test_create_body_cloud_key_omits_resource() {
        let spec = ApiKeySpec {
            name: Some("admin".to_string()),
            owner: Some("u-1".to_string()),
            ..Default::default()
        };
        let body = create_body(&spec).unwrap();
        assert!(body["spec"].get("resource").is_none());
    }

    #[test]
    fn test_create_requires_owner() {
        let spec = ApiKeySpec {
            name: Some("admin".to_string()),
            ..Default::default()
        };
        assert!(create_body(&spec).is_err());
    }

    #[test]
    fn test_flatten_hoists_spec_fields() {
        let raw = json!({
            "id": "ak-1",
            "spec": {
                "display_name": "ingest",
                "description": "d",
                "owner": {"id": "sa-1", "kind": "ServiceAccount"},
                "resource": {"id": "lkc-1"},
                "secret": "shhh",
            },
            "metadata": {"created_at": "2024-01-01T00:00:00Z"},
        });
        let flat = flatten(raw);
        assert_eq!(flat["name"], "ingest");
        assert_eq!(flat["owner"]["id"], "sa-1");
        assert_eq!(flat["secret"], "shhh");
        assert!(flat.get("spec").is_none());
        assert_eq!(flat["id"], "ak-1");
    }

    #[test]
    fn test_flatten_without_spec_is_identity() {
        let raw = json!({"id": "ak-1"});
        assert_eq!(flatten(raw.clone()), raw);
    }
}
