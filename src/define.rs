//! Action definition factory
//!
//! A [`Definition`] binds a tag string to a payload type once, at module
//! load, and is then used everywhere actions of that kind are constructed or
//! recognized. Definitions are `Copy` and const-constructible, so the usual
//! pattern is a process-wide static per action kind:
//!
//! ```ignore
//! use typed_dispatch::define::{define, Definition};
//!
//! static SET_VALUE: Definition<i64> = define("myapp::set_value");
//! static CLEAR: NoPayloadDefinition = define_without_payload("myapp::clear");
//!
//! let action = SET_VALUE.create(42)?;
//! assert!(SET_VALUE.is(&action));
//! ```
//!
//! All definitions used by one dispatch table must have unique tag strings.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::action::{Action, ActionTag};

/// Error constructing an action through a [`Definition`].
///
/// Construction either returns a well-formed action or fails with no side
/// effects; an action is never partially built.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The payload failed the validator supplied at definition time.
    #[error("payload validation failed for action `{tag}`")]
    Validation {
        /// Tag of the definition whose validator rejected the payload.
        tag: &'static str,
    },
    /// The payload or metadata could not be serialized to a JSON value.
    #[error("failed to serialize data for action `{tag}`")]
    Payload {
        /// Tag of the definition being constructed.
        tag: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Controls when a definition's validator runs.
///
/// The default, [`ValidationMode::DebugOnly`], runs validators only in builds
/// with debug assertions, trading safety for performance in release hot
/// paths. Set [`ValidationMode::Always`] to keep validation on everywhere, or
/// [`ValidationMode::Never`] to turn it off outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Run the validator on every construction.
    Always,
    /// Run the validator only when `cfg!(debug_assertions)` holds.
    #[default]
    DebugOnly,
    /// Never run the validator.
    Never,
}

impl ValidationMode {
    /// Whether validators run under this mode in the current build.
    pub const fn enabled(self) -> bool {
        match self {
            ValidationMode::Always => true,
            ValidationMode::DebugOnly => cfg!(debug_assertions),
            ValidationMode::Never => false,
        }
    }
}

/// A factory and matcher for actions of one tag, carrying payload type `P`.
///
/// See the [module docs](self) for the usual static-definition pattern.
pub struct Definition<P> {
    tag: ActionTag<P>,
    validate: Option<fn(&P) -> bool>,
    mode: ValidationMode,
}

/// Create a [`Definition`] for the given tag.
///
/// The payload type is supplied by the caller, either through the binding or
/// a turbofish: `define::<i64>("myapp::set_value")`.
pub const fn define<P>(tag: &'static str) -> Definition<P> {
    Definition::new(tag)
}

/// Create a [`NoPayloadDefinition`] for the given tag.
pub const fn define_without_payload(tag: &'static str) -> NoPayloadDefinition {
    NoPayloadDefinition::new(tag)
}

impl<P> Definition<P> {
    /// Create a definition with no validator.
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag: ActionTag::new(tag),
            validate: None,
            mode: ValidationMode::DebugOnly,
        }
    }

    /// Attach a payload validator, run on construction according to the
    /// definition's [`ValidationMode`].
    pub const fn with_validator(mut self, validate: fn(&P) -> bool) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Override when the validator runs.
    pub const fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// The typed tag owned by this definition.
    pub const fn tag(&self) -> ActionTag<P> {
        self.tag
    }

    /// Does the action belong to this definition's kind?
    pub fn is(&self, action: &Action) -> bool {
        self.tag.matches(action)
    }

    /// Tolerant kind check over a raw JSON value.
    ///
    /// Returns `false` for anything malformed: a non-object value, a missing
    /// `type` field, or a non-string `type`.
    pub fn is_value(&self, value: &Value) -> bool {
        value
            .as_object()
            .and_then(|object| object.get("type"))
            .and_then(Value::as_str)
            .is_some_and(|tag| tag == self.tag.name())
    }

    fn check(&self, payload: &P) -> Result<(), ActionError> {
        if let Some(validate) = self.validate {
            if self.mode.enabled() && !validate(payload) {
                return Err(ActionError::Validation {
                    tag: self.tag.name(),
                });
            }
        }
        Ok(())
    }

    fn serialize<T: Serialize>(&self, data: T) -> Result<Value, ActionError> {
        serde_json::to_value(data).map_err(|source| ActionError::Payload {
            tag: self.tag.name(),
            source,
        })
    }
}

impl<P: Serialize> Definition<P> {
    /// Construct an action of this kind from a payload.
    pub fn create(&self, payload: P) -> Result<Action, ActionError> {
        self.check(&payload)?;
        Ok(Action {
            tag: Cow::Borrowed(self.tag.name()),
            payload: Some(self.serialize(payload)?),
            meta: None,
        })
    }

    /// Construct an action of this kind from a payload, attaching metadata.
    pub fn create_with_meta<M: Serialize>(
        &self,
        payload: P,
        meta: M,
    ) -> Result<Action, ActionError> {
        self.check(&payload)?;
        Ok(Action {
            tag: Cow::Borrowed(self.tag.name()),
            payload: Some(self.serialize(payload)?),
            meta: Some(self.serialize(meta)?),
        })
    }
}

impl<P> Clone for Definition<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Definition<P> {}

impl<P> std::fmt::Debug for Definition<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("tag", &self.tag.name())
            .field("has_validator", &self.validate.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

/// A factory and matcher for actions of one tag that carry no payload.
///
/// Actions built here have no payload field at all, not a `null` payload; in
/// practice these are the "clear" or "invalidate" variety of action.
#[derive(Debug, Clone, Copy)]
pub struct NoPayloadDefinition {
    tag: ActionTag<()>,
}

impl NoPayloadDefinition {
    /// Create a no-payload definition for the given tag.
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag: ActionTag::new(tag),
        }
    }

    /// The typed tag owned by this definition. Handlers registered against
    /// it receive `()` as their payload.
    pub const fn tag(&self) -> ActionTag<()> {
        self.tag
    }

    /// Construct an action of this kind.
    pub fn create(&self) -> Action {
        Action::without_payload(self.tag.name())
    }

    /// Construct an action of this kind with metadata attached.
    pub fn create_with_meta<M: Serialize>(&self, meta: M) -> Result<Action, ActionError> {
        let meta = serde_json::to_value(meta).map_err(|source| ActionError::Payload {
            tag: self.tag.name(),
            source,
        })?;
        Ok(Action::without_payload(self.tag.name()).with_meta(meta))
    }

    /// Does the action belong to this definition's kind?
    pub fn is(&self, action: &Action) -> bool {
        self.tag.matches(action)
    }
}
