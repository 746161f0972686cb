//! Strongly-typed action definitions and dispatch-table reducers
//!
//! This crate layers typed helpers on top of a Redux-style
//! Action/Reducer/Store model. It does not provide the store itself; the
//! reducers built here plug into whatever state container the host
//! application uses, anywhere a `(state, action) -> state` function is
//! expected.
//!
//! # Core Concepts
//!
//! - **Action**: a tagged record with an optional payload and metadata
//! - **Definition**: a factory + matcher bound to one tag, created once at
//!   module load
//! - **DispatchTable**: a frozen tag-to-handler mapping compiled into a
//!   single routing reducer, with duplicate-registration detection
//! - **CompoundAction**: an action wrapping an ordered list of actions,
//!   flattened recursively at reduce time
//! - **Copy-on-write updates**: shallow map updates that return the input
//!   untouched when nothing changed
//!
//! # Basic Example
//!
//! ```ignore
//! use typed_dispatch::prelude::*;
//!
//! static ADD_TODO: Definition<String> = define("todos::add");
//! static CLEAR_TODOS: NoPayloadDefinition = define_without_payload("todos::clear");
//!
//! let table = DispatchTableBuilder::<Vec<String>>::new()
//!     .with_handler(ADD_TODO.tag(), |mut todos, title: String, _meta| {
//!         todos.push(title);
//!         todos
//!     })?
//!     .with_handler(CLEAR_TODOS.tag(), |_todos, (), _meta| Vec::new())?
//!     .build();
//!
//! let todos = table.reduce(vec![], &ADD_TODO.create("write docs".into())?);
//! assert_eq!(todos, ["write docs"]);
//! ```
//!
//! # Compound Actions
//!
//! Wrap the built reducer so batched actions apply atomically in order:
//!
//! ```ignore
//! let reducer = reduce_compound_actions(table.into_reducer());
//! let todos = reducer(
//!     vec![],
//!     &CompoundAction::create(vec![
//!         ADD_TODO.create("one".into())?,
//!         ADD_TODO.create("two".into())?,
//!     ]),
//! );
//! ```

pub mod action;
pub mod combine;
pub mod compose;
pub mod compound;
pub mod define;
pub mod table;
pub mod update;

// Action exports
pub use action::{Action, ActionTag};

// Definition exports
pub use define::{
    define, define_without_payload, ActionError, Definition, NoPayloadDefinition, ValidationMode,
};

// Dispatch table exports
pub use table::{DispatchTable, DispatchTableBuilder, DispatchTableError, Reducer};

// Compound action exports
pub use compound::{reduce_compound_actions, CompoundAction};

// Composition exports
pub use combine::{combine_reducers, SliceReducer};
pub use compose::compose_reducers;

// Copy-on-write update exports
pub use update::{omit, set_with, StateMap};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionTag};
    pub use crate::combine::{combine_reducers, SliceReducer};
    pub use crate::compose::compose_reducers;
    pub use crate::compound::{reduce_compound_actions, CompoundAction};
    pub use crate::define::{
        define, define_without_payload, ActionError, Definition, NoPayloadDefinition,
        ValidationMode,
    };
    pub use crate::table::{DispatchTable, DispatchTableBuilder, DispatchTableError, Reducer};
    pub use crate::update::{omit, set_with, StateMap};
}
