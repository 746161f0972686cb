//! Compound actions and the flattening reducer wrapper
//!
//! A compound action is an action whose tag is the library-owned
//! [`CompoundAction::TAG`] and whose payload is an ordered list of further
//! actions, nested arbitrarily deep. [`reduce_compound_actions`] wraps any
//! reducer so that compound actions are transparently unwrapped into a
//! left-to-right fold over their contents, threading the evolving state
//! through each step; plain actions pass straight through to the delegate.
//!
//! ```ignore
//! use typed_dispatch::prelude::*;
//!
//! let reducer = reduce_compound_actions(table.into_reducer());
//! let state = reducer(state, &CompoundAction::create(vec![first, second]));
//! ```

use std::borrow::Cow;

use serde_json::Value;

use crate::action::Action;
use crate::table::Reducer;

/// The library-owned compound action kind.
pub struct CompoundAction;

impl CompoundAction {
    /// Reserved tag identifying compound actions. No application definition
    /// may reuse it.
    pub const TAG: &'static str = "typed_dispatch::compound";

    /// Create a compound action wrapping the given actions, in order.
    ///
    /// An empty list is valid and reduces to a no-op.
    pub fn create(actions: Vec<Action>) -> Action {
        let payload = Value::Array(actions.iter().map(Action::to_value).collect());
        Action {
            tag: Cow::Borrowed(Self::TAG),
            payload: Some(payload),
            meta: None,
        }
    }

    /// Is this action a compound action?
    pub fn is(action: &Action) -> bool {
        action.tag == Self::TAG
    }

    /// The ordered sub-actions of a compound action.
    ///
    /// Returns `None` when the action is not a compound action or its
    /// payload is not a list. Elements that do not parse as actions are
    /// skipped with a warning; they cannot occur for compounds built through
    /// [`create`](Self::create).
    pub fn sub_actions(action: &Action) -> Option<Vec<Action>> {
        if !Self::is(action) {
            return None;
        }
        let Some(Value::Array(items)) = &action.payload else {
            return None;
        };
        let mut actions = Vec::with_capacity(items.len());
        for item in items {
            match Action::from_value(item) {
                Some(sub) => actions.push(sub),
                None => {
                    tracing::warn!(?item, "skipping compound payload element that is not an action");
                }
            }
        }
        Some(actions)
    }
}

/// Wrap a reducer so incoming compound actions are flattened into their
/// sub-actions before delegation.
///
/// Sub-actions apply in the exact order they appear, with the state produced
/// by each step visible to the next, recursing through nested compounds at
/// any depth. An empty compound returns the state unchanged without invoking
/// the delegate. Plain actions are passed through transparently.
pub fn reduce_compound_actions<S: 'static>(delegate: Reducer<S>) -> Reducer<S> {
    Box::new(move |state, action| reduce_one(&delegate, state, action))
}

fn reduce_one<S>(delegate: &Reducer<S>, state: S, action: &Action) -> S {
    if !CompoundAction::is(action) {
        return delegate(state, action);
    }
    match CompoundAction::sub_actions(action) {
        Some(sub_actions) => sub_actions
            .iter()
            .fold(state, |state, sub| reduce_one(delegate, state, sub)),
        None => {
            tracing::warn!("compound action payload is not an action list; state unchanged");
            state
        }
    }
}
