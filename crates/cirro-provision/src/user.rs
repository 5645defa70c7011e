//! Organization users and their invitations.
//!
//! The control plane splits membership across two endpoints: accepted
//! users and outstanding invitations. Current state is the union of both,
//! with invitation records normalized to user shape so identity
//! resolution and filtering see one collection. Creating a user issues an
//! invitation; deletion targets whichever endpoint the record came from.

use std::collections::BTreeMap;

use cirro_client::ApiClient;
use cirro_core::{CoreError, DesiredState, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::engine::{self, Action, Mode, Outcome};

const USERS: &str = "/iam/v2/users";
const INVITATIONS: &str = "/iam/v2/invitations";

/// Desired state of a user. Identity is `id`, or `email` when no id is
/// given; `name` converges the full name of an accepted user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub state: DesiredState,
}

/// Converge the remote user toward `spec`.
pub async fn apply(client: &ApiClient, spec: &UserSpec, mode: Mode) -> Result<Outcome> {
    let rows = list_all(client).await?;
    let current = engine::resolve(&rows, "user", spec.id.as_deref(), "/email", spec.email.as_deref())?;
    let desired = json!({"full_name": spec.name});

    match engine::plan(current, Some(&desired), spec.state) {
        Action::Noop => Ok(Outcome::unchanged(current.cloned())),
        Action::Delete => {
            let cur = current.ok_or_else(|| CoreError::invalid_spec("user record missing"))?;
            if !mode.is_check() {
                client.delete(&removal_path(cur)?).await?;
            }
            Ok(Outcome::changed(Some(cur.clone())))
        }
        Action::Create => {
            let email = spec
                .email
                .as_ref()
                .ok_or_else(|| CoreError::invalid_spec("email is required to invite a user"))?;
            let invited = if mode.is_check() {
                None
            } else {
                client
                    .post(INVITATIONS, &json!({"email": email}))
                    .await?
                    .map(normalize_invitation)
            };
            Ok(Outcome::changed(invited))
        }
        Action::Update => {
            let id = current
                .and_then(|row| engine::field_str(row, "/id"))
                .ok_or_else(|| CoreError::invalid_spec("user record has no id"))?;
            let updated = if mode.is_check() {
                None
            } else {
                client.patch(&format!("{USERS}/{id}"), &desired).await?
            };
            Ok(Outcome::changed(updated))
        }
    }
}

/// List users and outstanding invitations, narrowed by `ids`, `emails`,
/// or `names` axes.
pub async fn find(client: &ApiClient, selector: &Selector) -> Result<BTreeMap<String, Value>> {
    let rows = list_all(client).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            selector.matches(|axis| match axis {
                "ids" => engine::field_str(row, "/id").map(str::to_owned),
                "emails" => engine::field_str(row, "/email").map(str::to_owned),
                "names" => engine::field_str(row, "/full_name").map(str::to_owned),
                _ => None,
            })
        })
        .collect();
    Ok(engine::collect_keyed(rows, "/id"))
}

async fn list_all(client: &ApiClient) -> Result<Vec<Value>> {
    let mut rows = client.get_all_pages(USERS, &[]).await?;
    for invitation in client.get_all_pages(INVITATIONS, &[]).await? {
        rows.push(normalize_invitation(invitation));
    }
    Ok(rows)
}

/// Reshapes an invitation to user shape: the invited user's id becomes
/// the record id, the invitation id moves to `invitation`, and the full
/// name is null until the invitation is accepted.
fn normalize_invitation(mut row: Value) -> Value {
    let invitation_id = row.get("id").cloned();
    let user_id = row.pointer("/user/id").cloned();
    if let Some(obj) = row.as_object_mut() {
        obj.insert("full_name".to_string(), Value::Null);
        if let Some(id) = invitation_id {
            obj.insert("invitation".to_string(), id);
        }
        if let Some(id) = user_id {
            obj.insert("id".to_string(), id);
        }
    }
    row
}

/// Invitations are withdrawn on their own endpoint; accepted users are
/// removed from the organization.
fn removal_path(row: &Value) -> Result<String> {
    if engine::field_str(row, "/kind") == Some("Invitation") {
        let invitation = engine::field_str(row, "/invitation")
            .ok_or_else(|| CoreError::invalid_spec("invitation record has no invitation id"))?;
        Ok(format!("{INVITATIONS}/{invitation}"))
    } else {
        let id = engine::field_str(row, "/id")
            .ok_or_else(|| CoreError::invalid_spec("user record has no id"))?;
        Ok(format!("{USERS}/{id}"))
    }
}
