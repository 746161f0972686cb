//! Keyed reducer combination over map states

use std::sync::Arc;

use serde_json::Value;

use crate::action::Action;
use crate::table::Reducer;
use crate::update::StateMap;

/// A reducer over one slice of a [`StateMap`] state.
///
/// An absent slice is presented to the reducer as JSON `null`.
pub type SliceReducer = Box<dyn Fn(Value, &Action) -> Value + Send + Sync>;

/// Combine keyed slice reducers into a single reducer over a shared
/// [`StateMap`].
///
/// Every slice reducer runs on each dispatch, in the order given. The state
/// map is copied at most once per dispatch, and only when some slice
/// actually changed; otherwise the incoming `Arc` is returned as-is, so
/// unrelated actions never allocate.
pub fn combine_reducers(
    reducer_map: Vec<(&'static str, SliceReducer)>,
) -> Reducer<Arc<StateMap>> {
    Box::new(move |state: Arc<StateMap>, action: &Action| {
        let mut next: Option<StateMap> = None;
        for (key, reducer) in &reducer_map {
            let slice = state.get(*key).cloned().unwrap_or(Value::Null);
            let reduced = reducer(slice.clone(), action);
            if reduced != slice {
                next.get_or_insert_with(|| StateMap::clone(&state))
                    .insert((*key).to_string(), reduced);
            }
        }
        match next {
            Some(map) => Arc::new(map),
            None => state,
        }
    })
}
