//! Action shape and typed action tags
//!
//! An [`Action`] is a tagged, immutable record in the Flux Standard Action
//! shape: a `type` string discriminant, an optional payload, and optional
//! metadata. Two actions are the same kind iff their tags are equal.
//!
//! [`ActionTag`] carries a payload type alongside a plain tag string, so that
//! dispatch tables and handlers can recover the payload type from the tag
//! value alone. At runtime a tag is just a `&'static str`.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dispatchable action: a tag string plus optional payload and metadata.
///
/// Serializes to the Flux Standard Action shape `{"type", "payload", "meta"}`,
/// with absent payload/meta omitted entirely rather than written as `null` —
/// a no-payload action is `{"type": "..."}` and nothing more.
///
/// Metadata carries auxiliary data (timestamps, correlation ids) and does not
/// participate in routing or equality: `PartialEq` compares tag and payload
/// only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// The tag string uniquely identifying this action's kind.
    #[serde(rename = "type")]
    pub tag: Cow<'static, str>,
    /// The payload, whose shape is dictated by the tag. `None` means the
    /// action has no payload field at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Optional metadata. Never consulted when routing or comparing actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.payload == other.payload
    }
}

impl Eq for Action {}

impl Action {
    /// Create an action with the given tag and payload.
    pub fn new(tag: impl Into<Cow<'static, str>>, payload: Value) -> Self {
        Self {
            tag: tag.into(),
            payload: Some(payload),
            meta: None,
        }
    }

    /// Create an action with the given tag and no payload field.
    pub fn without_payload(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: tag.into(),
            payload: None,
            meta: None,
        }
    }

    /// Attach metadata to this action.
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Convert to a raw JSON value in the Flux Standard Action shape.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            "type".to_string(),
            Value::String(self.tag.as_ref().to_owned()),
        );
        if let Some(payload) = &self.payload {
            object.insert("payload".to_string(), payload.clone());
        }
        if let Some(meta) = &self.meta {
            object.insert("meta".to_string(), meta.clone());
        }
        Value::Object(object)
    }

    /// Parse an action out of a raw JSON value.
    ///
    /// Lenient by contract: a non-object value, a missing `type` field, or a
    /// non-string `type` yields `None` rather than an error.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let tag = object.get("type")?.as_str()?;
        Some(Self {
            tag: Cow::Owned(tag.to_owned()),
            payload: object.get("payload").cloned(),
            meta: object.get("meta").cloned(),
        })
    }
}

/// A tag string branded with the payload type of its actions.
///
/// Tags are created by [`define`](crate::define::define); each
/// [`Definition`](crate::define::Definition) owns one. They compare purely by
/// string value. The payload type parameter exists so that registering a
/// handler against a tag fixes the payload type the handler receives;
/// `PhantomData<fn() -> P>` keeps the tag `Copy + Send + Sync` regardless of
/// `P`.
pub struct ActionTag<P> {
    name: &'static str,
    marker: PhantomData<fn() -> P>,
}

impl<P> ActionTag<P> {
    /// Create a tag from its string value.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            marker: PhantomData,
        }
    }

    /// The raw tag string.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Does this action belong to this tag's kind? Purely a string
    /// comparison on the tag.
    pub fn matches(&self, action: &Action) -> bool {
        action.tag == self.name
    }

    /// Extract the typed payload from a matching action.
    ///
    /// Returns `None` if the action has a different tag or its payload does
    /// not deserialize as `P`. An absent payload is treated as JSON `null`,
    /// so `ActionTag<()>` accepts payload-less actions.
    pub fn payload_of(&self, action: &Action) -> Option<P>
    where
        P: DeserializeOwned,
    {
        if !self.matches(action) {
            return None;
        }
        let raw = action.payload.clone().unwrap_or(Value::Null);
        serde_json::from_value(raw).ok()
    }
}

impl<P> Clone for ActionTag<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ActionTag<P> {}

impl<P> PartialEq for ActionTag<P> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<P> Eq for ActionTag<P> {}

impl<P> fmt::Debug for ActionTag<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionTag").field(&self.name).finish()
    }
}

impl<P> fmt::Display for ActionTag<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
