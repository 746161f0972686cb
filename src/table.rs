//! Dispatch tables: tag-keyed reducer routing
//!
//! A [`DispatchTableBuilder`] accumulates at most one handler per action tag
//! plus one optional fallback, then freezes them into a [`DispatchTable`]
//! whose `reduce` routes each incoming action to its handler by an O(1) tag
//! lookup. Most actions are irrelevant to most pieces of state, so the
//! common case short-circuits on the map lookup instead of scanning
//! predicate branches.
//!
//! ```ignore
//! use typed_dispatch::prelude::*;
//!
//! static COUNT: Definition<i64> = define("myapp::count");
//! static RESET: Definition<i64> = define("myapp::reset");
//!
//! let table = DispatchTableBuilder::<i64>::new()
//!     .with_handler(COUNT.tag(), |total, n, _meta| total + n)?
//!     .with_handler(RESET.tag(), |_total, n, _meta| n)?
//!     .build();
//!
//! let total = table.reduce(5, &COUNT.create(3)?);
//! assert_eq!(total, 8);
//! ```
//!
//! Registering twice for the same tag (or two fallbacks) is a programmer
//! error and fails at construction time rather than silently overriding.
//! `build` consumes the builder, so a frozen table can never be mutated
//! through it afterwards.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::action::{Action, ActionTag};

/// The reducer shape expected by Redux-style store frameworks:
/// a pure `(state, action) -> state` function.
pub type Reducer<S> = Box<dyn Fn(S, &Action) -> S + Send + Sync>;

type Handler<S> = Box<dyn Fn(S, &Action) -> S + Send + Sync>;

/// Error registering handlers on a [`DispatchTableBuilder`].
///
/// These are construction-time programmer errors: the registration code must
/// be fixed, there is nothing to recover from at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchTableError {
    /// A handler was already registered for this tag on this builder.
    #[error("duplicate handler registered for action `{tag}`")]
    DuplicateHandler {
        /// The offending tag.
        tag: &'static str,
    },
    /// A default handler was already registered on this builder.
    #[error("duplicate default handler registered on dispatch table")]
    DuplicateDefaultHandler,
}

/// Builder accumulating tag handlers and an optional fallback.
///
/// Single-use: `build` takes the builder by value.
pub struct DispatchTableBuilder<S> {
    handlers: HashMap<&'static str, Handler<S>>,
    default_handler: Option<Handler<S>>,
}

impl<S> Default for DispatchTableBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DispatchTableBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            default_handler: None,
        }
    }
}

impl<S: 'static> DispatchTableBuilder<S> {
    /// Register a handler for a tag, receiving the unwrapped payload and
    /// metadata instead of the raw action.
    ///
    /// Sugar over [`with_action_handler`](Self::with_action_handler): the
    /// payload is deserialized to the tag's payload type before the handler
    /// runs. If a dispatched action's payload does not deserialize (which
    /// cannot happen for actions built through the tag's own definition), a
    /// warning is logged and the state is returned unchanged.
    pub fn with_handler<P, F>(
        self,
        tag: ActionTag<P>,
        handler: F,
    ) -> Result<Self, DispatchTableError>
    where
        P: DeserializeOwned,
        F: Fn(S, P, Option<&Value>) -> S + Send + Sync + 'static,
    {
        let name = tag.name();
        self.with_action_handler(tag, move |state, action: &Action| {
            let raw = action.payload.clone().unwrap_or(Value::Null);
            match serde_json::from_value::<P>(raw) {
                Ok(payload) => handler(state, payload, action.meta.as_ref()),
                Err(error) => {
                    tracing::warn!(
                        tag = name,
                        %error,
                        "action payload does not match handler payload type; state unchanged"
                    );
                    state
                }
            }
        })
    }

    /// Register a handler for a tag, receiving the raw action.
    ///
    /// Used when building higher-order reducers that ferry the action down
    /// to delegates. Registering a second handler for the same tag fails
    /// with [`DispatchTableError::DuplicateHandler`].
    pub fn with_action_handler<P, F>(
        mut self,
        tag: ActionTag<P>,
        handler: F,
    ) -> Result<Self, DispatchTableError>
    where
        F: Fn(S, &Action) -> S + Send + Sync + 'static,
    {
        if self.handlers.contains_key(tag.name()) {
            return Err(DispatchTableError::DuplicateHandler { tag: tag.name() });
        }
        self.handlers.insert(tag.name(), Box::new(handler));
        Ok(self)
    }

    /// Register the single fallback handler, invoked only when no
    /// tag-specific handler matched. Registering a second fallback fails
    /// with [`DispatchTableError::DuplicateDefaultHandler`].
    pub fn with_default_handler<F>(mut self, handler: F) -> Result<Self, DispatchTableError>
    where
        F: Fn(S, &Action) -> S + Send + Sync + 'static,
    {
        if self.default_handler.is_some() {
            return Err(DispatchTableError::DuplicateDefaultHandler);
        }
        self.default_handler = Some(Box::new(handler));
        Ok(self)
    }

    /// Freeze the accumulated handlers into a [`DispatchTable`].
    ///
    /// If no fallback was registered, an identity handler that returns the
    /// state unchanged takes its place.
    pub fn build(self) -> DispatchTable<S> {
        tracing::debug!(
            handlers = self.handlers.len(),
            has_default = self.default_handler.is_some(),
            "built dispatch table"
        );
        DispatchTable {
            handlers: self.handlers,
            default_handler: self
                .default_handler
                .unwrap_or_else(|| Box::new(|state, _action| state)),
        }
    }
}

impl<S> fmt::Debug for DispatchTableBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTableBuilder")
            .field("handlers", &self.handlers.len())
            .field("has_default", &self.default_handler.is_some())
            .finish()
    }
}

/// A frozen mapping from tag to handler plus the fallback.
///
/// Immutable once built; safe for concurrent readers.
pub struct DispatchTable<S> {
    handlers: HashMap<&'static str, Handler<S>>,
    default_handler: Handler<S>,
}

impl<S> DispatchTable<S> {
    /// Route an action to its handler and return the new state.
    ///
    /// Unmatched tags go to the fallback; with no fallback registered the
    /// state comes back unchanged. If a handler panics, the panic propagates
    /// to the caller unchanged.
    pub fn reduce(&self, state: S, action: &Action) -> S {
        match self.handlers.get(action.tag.as_ref()) {
            Some(handler) => handler(state, action),
            None => (self.default_handler)(state, action),
        }
    }

    /// Whether a tag-specific handler is registered for this tag.
    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Number of tag-specific handlers in the table.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no tag-specific handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S: 'static> DispatchTable<S> {
    /// Convert the table into the plain [`Reducer`] shape.
    pub fn into_reducer(self) -> Reducer<S> {
        Box::new(move |state, action| self.reduce(state, action))
    }
}

impl<S> fmt::Debug for DispatchTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define::{define, Definition};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct CountState {
        total: i64,
    }

    static COUNT: Definition<i64> = define("test::count");
    static RESET: Definition<i64> = define("test::reset");
    static LOG: Definition<Vec<String>> = define("test::log");

    #[test]
    fn empty_table_is_identity() {
        let table = DispatchTableBuilder::<String>::new().build();
        let state = table.reduce("hello".to_string(), &COUNT.create(3).unwrap());
        assert_eq!(state, "hello");
    }

    #[test]
    fn default_handler_receives_unmatched_actions() {
        let table = DispatchTableBuilder::<String>::new()
            .with_default_handler(|state: String, _action| state + "!")
            .unwrap()
            .build();

        let state = table.reduce("hello".to_string(), &COUNT.create(3).unwrap());
        assert_eq!(state, "hello!");
    }

    #[test]
    fn action_handler_receives_raw_action() {
        let table = DispatchTableBuilder::<CountState>::new()
            .with_action_handler(COUNT.tag(), |state: CountState, action| CountState {
                total: state.total + COUNT.tag().payload_of(action).unwrap_or(0),
            })
            .unwrap()
            .build();

        let state = table.reduce(CountState { total: 5 }, &COUNT.create(3).unwrap());
        assert_eq!(state, CountState { total: 8 });
    }

    #[test]
    fn payload_handler_receives_unwrapped_payload() {
        let table = DispatchTableBuilder::<CountState>::new()
            .with_handler(COUNT.tag(), |state: CountState, to_add: i64, _meta| {
                CountState {
                    total: state.total + to_add,
                }
            })
            .unwrap()
            .build();

        let state = table.reduce(CountState { total: 5 }, &COUNT.create(3).unwrap());
        assert_eq!(state, CountState { total: 8 });
    }

    #[test]
    fn payload_handler_sees_meta() {
        let table = DispatchTableBuilder::<Option<Value>>::new()
            .with_handler(COUNT.tag(), |_state, _n: i64, meta: Option<&Value>| {
                meta.cloned()
            })
            .unwrap()
            .build();

        let action = COUNT.create_with_meta(1, json!({"ts": 9})).unwrap();
        assert_eq!(table.reduce(None, &action), Some(json!({"ts": 9})));
    }

    #[test]
    fn only_matching_handler_is_invoked() {
        let table = DispatchTableBuilder::<CountState>::new()
            .with_action_handler(COUNT.tag(), |_state, _action| -> CountState {
                panic!("count handler should not run");
            })
            .unwrap()
            .build();

        let state = table.reduce(CountState { total: 5 }, &RESET.create(3).unwrap());
        assert_eq!(state, CountState { total: 5 });
    }

    #[test]
    fn default_handler_not_invoked_when_tag_matches() {
        let table = DispatchTableBuilder::<i64>::new()
            .with_handler(COUNT.tag(), |total, n: i64, _meta| total + n)
            .unwrap()
            .with_default_handler(|_state, _action| -> i64 {
                panic!("default should not run for handled tags");
            })
            .unwrap()
            .build();

        assert_eq!(table.reduce(5, &COUNT.create(3).unwrap()), 8);
    }

    #[test]
    fn multiple_handlers_route_by_tag() {
        let table = DispatchTableBuilder::<CountState>::new()
            .with_handler(COUNT.tag(), |state: CountState, n: i64, _meta| CountState {
                total: state.total + n,
            })
            .unwrap()
            .with_handler(RESET.tag(), |_state, n: i64, _meta| CountState { total: n })
            .unwrap()
            .build();

        let mut state = CountState { total: 5 };
        state = table.reduce(state, &RESET.create(10).unwrap());
        state = table.reduce(state, &COUNT.create(4).unwrap());
        assert_eq!(state, CountState { total: 14 });
    }

    #[test]
    fn structured_payloads_deserialize_for_handlers() {
        let table = DispatchTableBuilder::<CountState>::new()
            .with_handler(LOG.tag(), |state: CountState, words: Vec<String>, _meta| {
                CountState {
                    total: state.total + words.iter().map(|w| w.len() as i64).sum::<i64>(),
                }
            })
            .unwrap()
            .build();

        let action = LOG
            .create(vec!["foobar".to_string(), "world".to_string()])
            .unwrap();
        assert_eq!(table.reduce(CountState { total: 8 }, &action), CountState { total: 19 });
    }

    #[test]
    fn duplicate_handler_fails_at_registration() {
        let err = DispatchTableBuilder::<i64>::new()
            .with_handler(COUNT.tag(), |total, n: i64, _meta| total + n)
            .unwrap()
            .with_action_handler(COUNT.tag(), |total, _action| total)
            .unwrap_err();

        assert_eq!(err, DispatchTableError::DuplicateHandler { tag: "test::count" });
    }

    #[test]
    fn duplicate_default_handler_fails_at_registration() {
        let err = DispatchTableBuilder::<i64>::new()
            .with_default_handler(|state, _action| state)
            .unwrap()
            .with_default_handler(|state, _action| state)
            .unwrap_err();

        assert_eq!(err, DispatchTableError::DuplicateDefaultHandler);
    }

    #[test]
    fn mismatched_payload_leaves_state_unchanged() {
        let table = DispatchTableBuilder::<i64>::new()
            .with_handler(COUNT.tag(), |total, n: i64, _meta| total + n)
            .unwrap()
            .build();

        // Hand-rolled action with a payload that is not an i64.
        let bogus = Action::new("test::count", json!("not a number"));
        assert_eq!(table.reduce(5, &bogus), 5);
    }

    #[test]
    fn handles_reports_registered_tags() {
        let table = DispatchTableBuilder::<i64>::new()
            .with_handler(COUNT.tag(), |total, n: i64, _meta| total + n)
            .unwrap()
            .build();

        assert!(table.handles("test::count"));
        assert!(!table.handles("test::reset"));
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn into_reducer_matches_table_behavior() {
        let reducer = DispatchTableBuilder::<i64>::new()
            .with_handler(COUNT.tag(), |total, n: i64, _meta| total + n)
            .unwrap()
            .build()
            .into_reducer();

        assert_eq!(reducer(5, &COUNT.create(3).unwrap()), 8);
        assert_eq!(reducer(5, &RESET.create(3).unwrap()), 5);
    }
}
