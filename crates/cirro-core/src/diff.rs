//! Structural comparison of desired state against current state.
//!
//! Every reconciler uses the same primitive: a desired body is a *subset*
//! description of the remote object. A resource needs an update when any
//! key the caller supplied is missing from the current object or carries a
//! different value. Keys the caller did not supply (and `null` values,
//! meaning "don't care") never force a change.

use serde_json::Value;

/// Returns true when `desired` demands a change relative to `current`.
///
/// Objects are compared key-by-key, recursing into nested objects; arrays
/// and scalars compare by equality. A `null` desired value matches
/// anything.
pub fn differs(current: &Value, desired: &Value) -> bool {
    match desired {
        Value::Null => false,
        Value::Object(want) => match current {
            Value::Object(have) => want.iter().any(|(key, value)| {
                if value.is_null() {
                    return false;
                }
                match have.get(key) {
                    None => true,
                    Some(cur) => differs(cur, value),
                }
            }),
            _ => true,
        },
        other => current != other,
    }
}
