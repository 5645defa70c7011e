//! The convergence engine shared by every resource module.
//!
//! Reconciliation is fetch-by-identity, compare, then the minimal write:
//!
//! 1. list the collection and resolve the desired resource by id, falling
//!    back to its name axis ([`resolve`])
//! 2. decide create / update / delete / no-op ([`plan`]) using the
//!    structural diff from `cirro_core::diff`
//! 3. issue at most one write call, or none in [`Mode::Check`]
//!
//! The engine never writes itself; resource modules own their endpoints
//! and request bodies.

use cirro_core::{CoreError, DesiredState, diff};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Whether writes are issued or only planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Issue the API calls required to converge.
    #[default]
    Apply,
    /// Dry run: report the decision without writing.
    Check,
}

impl Mode {
    pub fn is_check(self) -> bool {
        matches!(self, Self::Check)
    }
}

/// The minimal write required to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    Noop,
}

/// Result of a reconciliation: whether a change occurred (or would occur,
/// in check mode) and the resulting remote object when one is known.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl Outcome {
    pub fn changed(resource: Option<Value>) -> Self {
        Self {
            changed: true,
            resource,
        }
    }

    pub fn unchanged(resource: Option<Value>) -> Self {
        Self {
            changed: false,
            resource,
        }
    }
}

/// Decides the minimal write from current state, desired body, and the
/// desired presence. Absent-and-missing is a no-op, never an error.
pub fn plan(current: Option<&Value>, desired: Option<&Value>, state: DesiredState) -> Action {
    let action = match (state, current) {
        (DesiredState::Absent, None) => Action::Noop,
        (DesiredState::Absent, Some(_)) => Action::Delete,
        (DesiredState::Present, None) => Action::Create,
        (DesiredState::Present, Some(cur)) => match desired {
            Some(want) if diff::differs(cur, want) => Action::Update,
            _ => Action::Noop,
        },
    };
    debug!(?state, ?action, found = current.is_some(), "planned action");
    action
}

/// Resolves a resource's identity within a listed collection: a
/// server-assigned id wins, then the resource's name axis. Two rows under
/// one name is an error; the caller must disambiguate with an id.
pub fn resolve<'a>(
    rows: &'a [Value],
    kind: &'static str,
    id: Option<&str>,
    name_pointer: &str,
    name: Option<&str>,
) -> Result<Option<&'a Value>, CoreError> {
    if let Some(id) = id {
        return Ok(rows.iter().find(|row| field_str(row, "/id") == Some(id)));
    }

    if let Some(name) = name {
        let mut matches = rows
            .iter()
            .filter(|row| field_str(row, name_pointer) == Some(name));
        let first = matches.next();
        if matches.next().is_some() {
            return Err(CoreError::ambiguous(kind, name));
        }
        return Ok(first);
    }

    Ok(None)
}

/// Reads a string field through a JSON pointer.
pub fn field_str<'a>(row: &'a Value, pointer: &str) -> Option<&'a str> {
    row.pointer(pointer).and_then(Value::as_str)
}

/// Drops null object entries, recursively. Desired bodies use null for
/// "don't care" in the diff; write bodies must not send those nulls.
pub fn strip_nulls(value: &mut Value) {
    if let Value::Object(obj) = value {
        obj.retain(|_, entry| !entry.is_null());
        for entry in obj.values_mut() {
            strip_nulls(entry);
        }
    }
}

/// Keys rows by the string field behind `pointer`, dropping rows that
/// lack it.
pub fn collect_keyed(rows: Vec<Value>, pointer: &str) -> BTreeMap<String, Value> {
    rows.into_iter()
        .filter_map(|row| {
            let key = field_str(&row, pointer)?.to_owned();
            Some((key, row))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_absent_and_missing_is_noop() {
        assert_eq!(plan(None, None, DesiredState::Absent), Action::Noop);
    }

    #[test]
    fn test_plan_absent_and_found_deletes() {
        let cur = json!({"id": "env-1"});
        assert_eq!(plan(Some(&cur), None, DesiredState::Absent), Action::Delete);
    }

    #[test]
    fn test_plan_present_and_missing_creates() {
        let want = json!({"display_name": "prod"});
        assert_eq!(
            plan(None, Some(&want), DesiredState::Present),
            Action::Create
        );
    }

    #[test]
    fn test_plan_present_matching_is_noop() {
        let cur = json!({"id": "env-1", "display_name": "prod"});
        let want = json!({"display_name": "prod"});
        assert_eq!(
            plan(Some(&cur), Some(&want), DesiredState::Present),
            Action::Noop
        );
    }

    #[test]
    fn test_plan_present_with_drift_updates() {
        let cur = json!({"id": "env-1", "display_name": "prod"});
        let want = json!({"display_name": "production"});
        assert_eq!(
            plan(Some(&cur), Some(&want), DesiredState::Present),
            Action::Update
        );
    }

    #[test]
    fn test_plan_present_without_desired_body_is_noop() {
        let cur = json!({"id": "env-1"});
        assert_eq!(plan(Some(&cur), None, DesiredState::Present), Action::Noop);
    }

    #[test]
    fn test_resolve_prefers_id() {
        let rows = vec![
            json!({"id": "env-1", "display_name": "same"}),
            json!({"id": "env-2", "display_name": "same"}),
        ];
        let found = resolve(&rows, "environment", Some("env-2"), "/display_name", Some("same"))
            .unwrap()
            .unwrap();
        assert_eq!(field_str(found, "/id"), Some("env-2"));
    }

    #[test]
    fn test_resolve_falls_back_to_name() {
        let rows = vec![
            json!({"id": "env-1", "display_name": "prod"}),
            json!({"id": "env-2", "display_name": "staging"}),
        ];
        let found = resolve(&rows, "environment", None, "/display_name", Some("staging"))
            .unwrap()
            .unwrap();
        assert_eq!(field_str(found, "/id"), Some("env-2"));
    }

    #[test]
    fn test_resolve_duplicate_name_is_ambiguous() {
        let rows = vec![
            json!({"id": "env-1", "display_name": "same"}),
            json!({"id": "env-2", "display_name": "same"}),
        ];
        let err = resolve(&rows, "environment", None, "/display_name", Some("same")).unwrap_err();
        assert!(matches!(err, CoreError::AmbiguousIdentity { .. }));
    }

    #[test]
    fn test_resolve_without_identity_finds_nothing() {
        let rows = vec![json!({"id": "env-1"})];
        assert!(
            resolve(&rows, "environment", None, "/display_name", None)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_resolve_nested_name_pointer() {
        let rows = vec![json!({"id": "lkc-1", "spec": {"display_name": "kafka-main"}})];
        let found = resolve(&rows, "cluster", None, "/spec/display_name", Some("kafka-main"))
            .unwrap()
            .unwrap();
        assert_eq!(field_str(found, "/id"), Some("lkc-1"));
    }

    #[test]
    fn test_collect_keyed_drops_rows_without_key() {
        let rows = vec![json!({"id": "a"}), json!({"name": "no-id"})];
        let keyed = collect_keyed(rows, "/id");
        assert_eq!(keyed.len(), 1);
        assert!(keyed.contains_key("a"));
    }

    #[test]
    fn test_strip_nulls_is_recursive() {
        let mut body = json!({
            "spec": {"display_name": null, "config": {"kind": "Standard", "cku": null}},
            "note": null,
        });
        strip_nulls(&mut body);
        assert_eq!(
            body,
            json!({"spec": {"config": {"kind": "Standard"}}})
        );
    }

    #[test]
    fn test_outcome_serializes_without_null_resource() {
        let outcome = Outcome::changed(None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, json!({"changed": true}));
    }
}
