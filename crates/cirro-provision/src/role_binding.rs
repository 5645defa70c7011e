//! Role bindings: a principal granted a role over a CRN pattern.
//!
//! Bindings are immutable: converging an existing binding is always a
//! no-op, and any change means delete-and-recreate under a different
//! spec. The wire field `role_name` is canonicalized to `role` in every
//! record this module returns.

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, DesiredState, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::engine::{self, Mode, Outcome};

const PATH: &str = "/iam/v2/role-bindings";

/// Desired state of a role binding, scoped to a CRN pattern. Identity is
/// `id`, or the (principal, role) pair within the scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleBindingSpec {
    pub id: Option<String>,
    pub resource_uri: String,
    pub role: Option<String>,
    pub principal: Option<String>,
    #[serde(default)]
    pub state: DesiredState,
}

/// Prefixes bare user and service-account ids with the `User:` principal
/// kind the IAM API expects.
pub fn canonical_principal(principal: &str) -> String {
    if principal.starts_with("u-") || principal.starts_with("sa-") {
        format!("User:{principal}")
    } else {
        principal.to_string()
    }
}

/// Converge the remote role binding toward `spec`.
pub async fn apply(client: &ApiClient, spec: &RoleBindingSpec, mode: Mode) -> Result<Outcome> {
    let principal = spec.principal.as_deref().map(canonical_principal);
    let query = [("crn_pattern", spec.resource_uri.clone())];
    let rows = client.get_all_pages(PATH, &query).await?;
    let current = find_binding(&rows, spec.id.as_deref(), principal.as_deref(), spec.role.as_deref());

    match (spec.state, current) {
        (DesiredState::Absent, None) => Ok(Outcome::unchanged(None)),
        (DesiredState::Absent, Some(cur)) => {
            let id = engine::field_str(cur, "/id")
                .ok_or_else(|| CoreError::invalid_spec("role binding record has no id"))?;
            if !mode.is_check() {
                client.delete(&format!("{PATH}/{id}")).await?;
            }
            Ok(Outcome::changed(Some(canonicalize(cur.clone()))))
        }
        (DesiredState::Present, Some(cur)) => {
            // Bindings carry no mutable fields; found means converged.
            Ok(Outcome::unchanged(Some(canonicalize(cur.clone()))))
        }
        (DesiredState::Present, None) => {
            let principal = principal.ok_or_else(|| {
                CoreError::invalid_spec("principal is required to create a role binding")
            })?;
            let role = spec.role.as_ref().ok_or_else(|| {
                CoreError::invalid_spec("role is required to create a role binding")
            })?;
            let body = json!({
                "principal": principal,
                "role_name": role,
                "crn_pattern": spec.resource_uri,
            });
            let created = if mode.is_check() {
                None
            } else {
                client.post(PATH, &body).await?.map(canonicalize)
            };
            Ok(Outcome::changed(created))
        }
    }
}

/// List role bindings under a CRN pattern, narrowed by `principals` or
/// `roles` axes.
pub async fn find(
    client: &ApiClient,
    resource_uri: &str,
    selector: &Selector,
) -> Result<BTreeMap<String, Value>> {
    let query = [("crn_pattern", resource_uri.to_string())];
    let rows = client.get_all_pages(PATH, &query).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            selector.matches(|axis| match axis {
                "principals" => engine::field_str(row, "/principal").map(str::to_owned),
                "roles" => engine::field_str(row, "/role_name").map(str::to_owned),
                _ => None,
            })
        })
        .map(canonicalize)
        .collect();
    Ok(engine::collect_keyed(rows, "/id"))
}

fn find_binding<'a>(
    rows: &'a [Value],
    id: Option<&str>,
    principal: Option<&str>,
    role: Option<&str>,
) -> Option<&'a Value> {
    if let Some(id) = id {
        return rows.iter().find(|row| engine::field_str(row, "/id") == Some(id));
    }
    if let (Some(principal), Some(role)) = (principal, role) {
        return rows.iter().find(|row| {
            engine::field_str(row, "/principal") == Some(principal)
                && engine::field_str(row, "/role_name") == Some(role)
        });
    }
    None
}

fn canonicalize(mut row: Value) -> Value {
    if let Some(obj) = row.as_object_mut()
        && let Some(role) = obj.remove("role_name")
    {
        obj.insert("role".to_string(), role);
    }
    row
}
