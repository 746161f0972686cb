//! Copy-on-write state update helpers
//!
//! Utilities for applying shallow updates to map-shaped state held behind an
//! [`Arc`]. Both helpers return the incoming `Arc` untouched when the update
//! is a no-op, so reducers that change nothing never allocate and downstream
//! change detection (`Arc::ptr_eq`) keeps working.

use std::sync::Arc;

use serde_json::{Map, Value};

/// Map-shaped state, keyed by field name.
pub type StateMap = Map<String, Value>;

/// Apply a shallow set of overrides to `state`.
///
/// Returns the same `Arc` when every override already shallow-equals the
/// current value, otherwise a fresh map with the overrides applied. The
/// input map is never mutated.
pub fn set_with(state: &Arc<StateMap>, overrides: StateMap) -> Arc<StateMap> {
    if shallow_contains(state, &overrides) {
        return Arc::clone(state);
    }
    let mut next = StateMap::clone(state);
    for (key, value) in overrides {
        next.insert(key, value);
    }
    Arc::new(next)
}

/// Remove the given keys from `state`.
///
/// Returns the same `Arc` when none of the keys are present, otherwise a
/// copy lacking exactly those keys. The input map is never mutated. Removal
/// is shallow; nested paths are not interpreted.
pub fn omit(state: &Arc<StateMap>, keys: &[&str]) -> Arc<StateMap> {
    if !keys.iter().any(|key| state.contains_key(*key)) {
        return Arc::clone(state);
    }
    let mut next = StateMap::clone(state);
    for key in keys {
        next.remove(*key);
    }
    Arc::new(next)
}

/// Does `state` already contain every key-value pair in `partial`?
fn shallow_contains(state: &StateMap, partial: &StateMap) -> bool {
    partial
        .iter()
        .all(|(key, value)| state.get(key) == Some(value))
}
