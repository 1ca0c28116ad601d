//! The self-describing value tree.
//!
//! A [`Value`] is a node holding a [`ValueType`] tag, an optional [`Payload`]
//! and per-node metadata:
//!
//! - **default**: substituted on read when the payload is absent
//! - **optional**: an absent payload does not make the node invalid
//! - **order number**: position among siblings when serializing. Dictionaries
//!   are keyed maps with no ordering of their own, so this is what carries
//!   field order from input text back to output text.
//!
//! Nodes own their children exclusively; cloning is a deep copy and there are
//! no parent back-pointers.
//!
//! # Sticky construction failures
//!
//! A node whose construction failed keeps `ValueType::None`, no payload, and
//! its construction error. Every later operation on it returns that same
//! error instead of touching the node.
//!
//! ```
//! use valtree_core::{ErrorKind, Payload, Value, ValueType};
//!
//! let broken = Value::builder()
//!     .payload(Payload::String("x".into()))
//!     .value_type(ValueType::Integer)
//!     .build();
//! assert_eq!(broken.error().map(|e| e.kind()), Some(ErrorKind::InvalidState));
//! assert!(!broken.is_valid());
//! assert_eq!(broken.get("a").unwrap_err().kind(), ErrorKind::InvalidState);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

use crate::error::{ErrorKind, Result, ValueError};
use crate::types::ValueType;

/// Mapping payload of a Dictionary node. Iteration order of the map carries
/// no meaning; see [`Value::ordered_entries`].
pub type Dictionary = BTreeMap<String, Value>;

/// The data held by a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Dictionary(Dictionary),
    List(Vec<Value>),
}

impl Payload {
    pub fn value_type(&self) -> ValueType {
        match self {
            Payload::Boolean(_) => ValueType::Boolean,
            Payload::Integer(_) => ValueType::Integer,
            Payload::Double(_) => ValueType::Double,
            Payload::String(_) => ValueType::String,
            Payload::Dictionary(_) => ValueType::Dictionary,
            Payload::List(_) => ValueType::List,
        }
    }

    /// Integer payloads stored under a Double type become Doubles.
    fn widen_to(self, value_type: ValueType) -> Payload {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Payload::Integer(i) if value_type == ValueType::Double => Payload::Double(i as f64),
            other => other,
        }
    }

    /// Convert a JSON number. `None` for an integer literal outside `i64`
    /// and for a float literal outside the finite `f64` range.
    pub(crate) fn from_number(n: &Number) -> Option<Payload> {
        if let Some(i) = n.as_i64() {
            return Some(Payload::Integer(i));
        }
        // Numbers keep their literal text, so `1e20` and `100000000000000000000`
        // stay distinguishable.
        if n.is_u64() || !n.to_string().contains(['.', 'e', 'E']) {
            return None;
        }
        n.as_f64().map(Payload::Double)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Boolean(b)
    }
}

impl From<i64> for Payload {
    fn from(i: i64) -> Self {
        Payload::Integer(i)
    }
}

impl From<i32> for Payload {
    fn from(i: i32) -> Self {
        Payload::Integer(i64::from(i))
    }
}

impl From<f64> for Payload {
    fn from(f: f64) -> Self {
        Payload::Double(f)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::String(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::String(s)
    }
}

impl From<Dictionary> for Payload {
    fn from(map: Dictionary) -> Self {
        Payload::Dictionary(map)
    }
}

impl From<Vec<Value>> for Payload {
    fn from(items: Vec<Value>) -> Self {
        Payload::List(items)
    }
}

/// A node of the value tree. See the [module docs](self).
#[derive(Debug)]
pub struct Value {
    value_type: ValueType,
    payload: Option<Payload>,
    default: Option<Payload>,
    optional: bool,
    order_number: i64,
    error: Option<ValueError>,
    last_error: Option<ValueError>,
}

impl Default for Value {
    /// An untyped, absent, non-optional node (invalid until replaced).
    fn default() -> Self {
        Self {
            value_type: ValueType::None,
            payload: None,
            default: None,
            optional: false,
            order_number: -1,
            error: None,
            last_error: None,
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self {
            value_type: self.value_type,
            payload: self.payload.clone(),
            default: self.default.clone(),
            optional: self.optional,
            order_number: self.order_number,
            error: self.error.clone(),
            last_error: None,
        }
    }
}

/// Two nodes are equal when they have the same type and structurally equal
/// payloads. Metadata (default, optional, order number) is not compared.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.value_type == other.value_type && self.payload == other.payload
    }
}

impl PartialEq<Payload> for Value {
    fn eq(&self, other: &Payload) -> bool {
        self.payload.as_ref() == Some(other)
    }
}

enum Input {
    Payload(Payload),
    Untyped(JsonValue),
}

/// Builder for [`Value`] covering every constructor argument.
///
/// `build` never fails outright: an invalid combination yields a node that
/// carries an `InvalidState` construction error.
pub struct ValueBuilder {
    input: Option<Input>,
    value_type: ValueType,
    default: Option<Payload>,
    optional: bool,
    order_number: i64,
    recurse_children: bool,
}

impl Default for ValueBuilder {
    fn default() -> Self {
        Self {
            input: None,
            value_type: ValueType::None,
            default: None,
            optional: false,
            order_number: -1,
            recurse_children: false,
        }
    }
}

impl ValueBuilder {
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.input = Some(Input::Payload(payload.into()));
        self
    }

    /// Use an untyped JSON tree as the payload. Non-empty objects and arrays
    /// are only accepted together with [`recurse_children`](Self::recurse_children).
    #[must_use]
    pub fn untyped(mut self, json: JsonValue) -> Self {
        self.input = Some(Input::Untyped(json));
        self
    }

    #[must_use]
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<Payload>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    #[must_use]
    pub fn order_number(mut self, order_number: i64) -> Self {
        self.order_number = order_number;
        self
    }

    /// Wrap nested untyped objects/arrays into child nodes recursively.
    /// Children inherit this node's `optional` flag.
    #[must_use]
    pub fn recurse_children(mut self, recurse: bool) -> Self {
        self.recurse_children = recurse;
        self
    }

    pub fn build(self) -> Value {
        let optional = self.optional;
        let order_number = self.order_number;
        match self.resolve() {
            Ok((value_type, payload, default)) => Value {
                value_type,
                payload,
                default,
                optional,
                order_number,
                error: None,
                last_error: None,
            },
            Err(err) => {
                debug!(error = %err, "value construction failed");
                Value {
                    optional,
                    order_number,
                    error: Some(err),
                    ..Value::default()
                }
            }
        }
    }

    fn resolve(self) -> Result<(ValueType, Option<Payload>, Option<Payload>)> {
        let payload = match self.input {
            None => None,
            Some(Input::Payload(payload)) => Some(payload),
            Some(Input::Untyped(json)) => untyped_payload(json, self.optional, self.recurse_children)?,
        };

        let value_type = match &payload {
            Some(payload) => {
                let inferred = payload.value_type();
                if self.value_type != ValueType::None && self.value_type != inferred {
                    return Err(ValueError::new(
                        ErrorKind::InvalidState,
                        format!(
                            "Parameter 'value_type' is invalid ({} given for a {} payload)",
                            self.value_type, inferred
                        ),
                    ));
                }
                inferred
            }
            None => self.value_type,
        };

        if let Some(default) = &self.default {
            if default.value_type() != value_type {
                return Err(ValueError::new(
                    ErrorKind::InvalidState,
                    format!(
                        "Parameter 'default' is invalid ({} default for a {} value)",
                        default.value_type(),
                        value_type
                    ),
                ));
            }
        }

        Ok((value_type, payload, self.default))
    }
}

/// Infer a payload from an untyped JSON tree. `null` is "no payload".
fn untyped_payload(json: JsonValue, optional: bool, recurse: bool) -> Result<Option<Payload>> {
    let payload = match json {
        JsonValue::Null => return Ok(None),
        JsonValue::Bool(b) => Payload::Boolean(b),
        JsonValue::Number(n) => Payload::from_number(&n).ok_or_else(|| {
            ValueError::new(
                ErrorKind::InvalidState,
                format!("Parameter 'value' is invalid (number {n} is out of range)"),
            )
        })?,
        JsonValue::String(s) => Payload::String(s),
        JsonValue::Array(items) if items.is_empty() => Payload::List(Vec::new()),
        JsonValue::Object(map) if map.is_empty() => Payload::Dictionary(Dictionary::new()),
        JsonValue::Array(items) if recurse => {
            let mut children = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let child = untyped_child(item, optional)
                    .map_err(|err| err.context(format_args!("Item[{index}] is invalid")))?;
                children.push(child);
            }
            Payload::List(children)
        }
        JsonValue::Object(map) if recurse => {
            let mut children = Dictionary::new();
            for (key, item) in map {
                let child = untyped_child(item, optional)
                    .map_err(|err| err.context(format_args!("Field \"{key}\" is invalid")))?;
                children.insert(key, child);
            }
            Payload::Dictionary(children)
        }
        JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(ValueError::new(
                ErrorKind::InvalidState,
                "Parameter 'value' is invalid (nested content requires recursive construction)",
            ));
        }
    };
    Ok(Some(payload))
}

fn untyped_child(json: JsonValue, optional: bool) -> Result<Value> {
    let child = Value::builder()
        .untyped(json)
        .optional(optional)
        .recurse_children(true)
        .build();
    match child.error.clone() {
        Some(err) => Err(err),
        None => Ok(child),
    }
}

impl Value {
    pub fn builder() -> ValueBuilder {
        ValueBuilder::default()
    }

    /// A node holding `payload`, typed after it.
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self::builder().payload(payload).build()
    }

    /// A typed node without a payload.
    pub fn typed(value_type: ValueType) -> Self {
        Self::builder().value_type(value_type).build()
    }

    /// An empty Dictionary node.
    pub fn dictionary() -> Self {
        Self::new(Dictionary::new())
    }

    /// An empty List node.
    pub fn list() -> Self {
        Self::new(Vec::new())
    }

    /// Build a tree from untyped JSON, wrapping every nested value.
    ///
    /// ```
    /// use serde_json::json;
    /// use valtree_core::{Value, ValueType};
    ///
    /// let v = Value::from_untyped(json!({"name": "Alice", "tags": ["a", "b"]}));
    /// assert!(v.is_valid());
    /// assert_eq!(v.find_string_path(&["name"]), Some("Alice"));
    /// assert_eq!(v.find_path(&["tags"]).map(Value::value_type), Some(ValueType::List));
    /// ```
    pub fn from_untyped(json: JsonValue) -> Self {
        Self::builder().untyped(json).recurse_children(true).build()
    }

    /// An empty node shaped after a schema node: same type, default, optional
    /// flag and order number, but no payload.
    pub fn from_schema(schema: &Value) -> Self {
        Self {
            value_type: schema.value_type,
            payload: None,
            default: schema.default.clone(),
            optional: schema.optional,
            order_number: schema.order_number,
            error: schema.error.clone(),
            last_error: None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The stored payload, ignoring the default.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The payload, or the default when no payload is stored.
    pub fn value(&self) -> Option<&Payload> {
        self.payload.as_ref().or(self.default.as_ref())
    }

    pub fn default_value(&self) -> Option<&Payload> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn order_number(&self) -> i64 {
        self.order_number
    }

    pub fn is_absent(&self) -> bool {
        self.payload.is_none()
    }

    /// Construction outcome; `Some` means the node is permanently invalid.
    pub fn error(&self) -> Option<&ValueError> {
        self.error.as_ref()
    }

    /// Outcome of the most recent mutating operation.
    pub fn last_error(&self) -> Option<&ValueError> {
        self.last_error.as_ref()
    }

    /// Whether construction succeeded, a payload is present (or the node is
    /// optional), and every child is valid.
    pub fn is_valid(&self) -> bool {
        if self.error.is_some() {
            return false;
        }
        match &self.payload {
            None => self.optional,
            Some(Payload::Dictionary(map)) => map.values().all(Value::is_valid),
            Some(Payload::List(items)) => items.iter().all(Value::is_valid),
            Some(_) => true,
        }
    }

    /// Whether a payload of `payload`'s type may be stored here.
    pub fn is_matching_type(&self, payload: &Payload) -> bool {
        self.value_type.accepts(payload.value_type())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value()? {
            Payload::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value()? {
            Payload::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value()? {
            Payload::Double(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Payload::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.value()? {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self.value()? {
            Payload::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self.value()? {
            Payload::List(items) => Some(items),
            _ => None,
        }
    }

    fn ensure_constructed(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => {
                debug!(error = %err, "value operation failed");
                self.last_error = Some(err.clone());
            }
        }
        result
    }

    /// Replace the payload. `None` clears it. An Integer stored in a Double
    /// node is widened.
    pub fn set_value(&mut self, payload: Option<Payload>) -> Result<()> {
        let result = self.ensure_constructed().and_then(|()| match payload {
            Some(payload) if !self.is_matching_type(&payload) => Err(ValueError::new(
                ErrorKind::InvalidParameter,
                format!(
                    "Parameter 'value' is invalid ({} value for a {} node)",
                    payload.value_type(),
                    self.value_type
                ),
            )),
            payload => {
                let value_type = self.value_type;
                self.payload = payload.map(|p| p.widen_to(value_type));
                Ok(())
            }
        });
        self.record(result)
    }

    pub fn set_default(&mut self, default: Option<Payload>) -> Result<()> {
        let result = self.ensure_constructed().and_then(|()| match default {
            Some(default) if default.value_type() != self.value_type => Err(ValueError::new(
                ErrorKind::InvalidParameter,
                format!(
                    "Parameter 'default' is invalid ({} default for a {} node)",
                    default.value_type(),
                    self.value_type
                ),
            )),
            default => {
                self.default = default;
                Ok(())
            }
        });
        self.record(result)
    }

    /// Set the optional flag on this node and, when `recursive`, on every
    /// descendant. A node whose construction failed is left untouched.
    pub fn set_optional(&mut self, optional: bool, recursive: bool) {
        if self.error.is_some() {
            return;
        }
        self.optional = optional;
        if !recursive {
            return;
        }
        match &mut self.payload {
            Some(Payload::Dictionary(map)) => {
                for child in map.values_mut() {
                    child.set_optional(optional, true);
                }
            }
            Some(Payload::List(items)) => {
                for child in items {
                    child.set_optional(optional, true);
                }
            }
            _ => {}
        }
    }

    pub fn set_order_number(&mut self, order_number: i64) {
        if self.error.is_some() {
            return;
        }
        self.order_number = order_number;
    }

    fn access_error(&self, message: String) -> ValueError {
        ValueError::new(ErrorKind::InvalidAccess, message)
    }

    /// Child of a Dictionary node by key.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.ensure_constructed()?;
        match &self.payload {
            Some(Payload::Dictionary(map)) => map
                .get(key)
                .ok_or_else(|| self.access_error(format!("Key \"{key}\" not found"))),
            _ => Err(self.access_error(format!(
                "{} value doesn't have an access by key \"{key}\"",
                self.value_type
            ))),
        }
    }

    /// Child of a List node by position.
    pub fn get_index(&self, index: usize) -> Result<&Value> {
        self.ensure_constructed()?;
        match &self.payload {
            Some(Payload::List(items)) => items.get(index).ok_or_else(|| {
                self.access_error(format!(
                    "Index {index} is out of range (length {})",
                    items.len()
                ))
            }),
            _ => Err(self.access_error(format!(
                "{} value doesn't have an access by index",
                self.value_type
            ))),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value> {
        self.ensure_constructed()?;
        let value_type = self.value_type;
        match &mut self.payload {
            Some(Payload::Dictionary(map)) => map.get_mut(key).ok_or_else(|| {
                ValueError::new(ErrorKind::InvalidAccess, format!("Key \"{key}\" not found"))
            }),
            _ => Err(ValueError::new(
                ErrorKind::InvalidAccess,
                format!("{value_type} value doesn't have an access by key \"{key}\""),
            )),
        }
    }

    pub fn get_index_mut(&mut self, index: usize) -> Result<&mut Value> {
        self.ensure_constructed()?;
        let value_type = self.value_type;
        match &mut self.payload {
            Some(Payload::List(items)) => {
                let len = items.len();
                items.get_mut(index).ok_or_else(|| {
                    ValueError::new(
                        ErrorKind::InvalidAccess,
                        format!("Index {index} is out of range (length {len})"),
                    )
                })
            }
            _ => Err(ValueError::new(
                ErrorKind::InvalidAccess,
                format!("{value_type} value doesn't have an access by index"),
            )),
        }
    }

    /// The mapping payload, allocated on first use. `None` unless this is a
    /// Dictionary node.
    fn dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        if self.value_type != ValueType::Dictionary {
            return None;
        }
        let payload = self
            .payload
            .get_or_insert_with(|| Payload::Dictionary(Dictionary::new()));
        match payload {
            Payload::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    fn list_mut(&mut self) -> Option<&mut Vec<Value>> {
        if self.value_type != ValueType::List {
            return None;
        }
        let payload = self.payload.get_or_insert_with(|| Payload::List(Vec::new()));
        match payload {
            Payload::List(items) => Some(items),
            _ => None,
        }
    }

    fn update_error(message: String) -> ValueError {
        ValueError::new(ErrorKind::InvalidUpdate, message)
    }

    /// Insert or replace a child of a Dictionary node.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let result = self.ensure_constructed().and_then(|()| {
            let value_type = self.value_type;
            match self.dictionary_mut() {
                Some(map) => {
                    map.insert(key, value.into());
                    Ok(())
                }
                None => Err(Self::update_error(format!(
                    "{value_type} value doesn't set a value by key \"{key}\""
                ))),
            }
        });
        self.record(result)
    }

    /// Replace an existing element of a List node.
    pub fn set_index(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let result = self.ensure_constructed().and_then(|()| {
            let value_type = self.value_type;
            match self.list_mut() {
                Some(items) => match items.get_mut(index) {
                    Some(slot) => {
                        *slot = value.into();
                        Ok(())
                    }
                    None => {
                        let len = items.len();
                        Err(Self::update_error(format!(
                            "Index {index} is out of range (length {len})"
                        )))
                    }
                },
                None => Err(Self::update_error(format!(
                    "{value_type} value doesn't set a value by index"
                ))),
            }
        });
        self.record(result)
    }

    /// Append to a List node.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let result = self.ensure_constructed().and_then(|()| {
            let value_type = self.value_type;
            match self.list_mut() {
                Some(items) => {
                    items.push(value.into());
                    Ok(())
                }
                None => Err(Self::update_error(format!("{value_type} value can't be appended to"))),
            }
        });
        self.record(result)
    }

    /// Whether a Dictionary node has `key`. Always false for other kinds.
    pub fn contains_key(&self, key: &str) -> bool {
        matches!(&self.payload, Some(Payload::Dictionary(map)) if map.contains_key(key))
    }

    /// Keys of a Dictionary node in map order (not serialization order).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_dictionary()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Number of children, or characters for a String node.
    pub fn len(&self) -> Result<usize> {
        self.ensure_constructed()?;
        match self.value() {
            Some(Payload::Dictionary(map)) => Ok(map.len()),
            Some(Payload::List(items)) => Ok(items.len()),
            Some(Payload::String(s)) => Ok(s.chars().count()),
            None if self.value_type.is_container() || self.value_type == ValueType::String => {
                Ok(0)
            }
            _ => Err(ValueError::new(
                ErrorKind::UnsupportedType,
                format!("{} value doesn't have a length", self.value_type),
            )),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Children of the effective Dictionary payload sorted by
    /// `(order_number, key)`.
    pub fn ordered_entries(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<(&str, &Value)> = self
            .as_dictionary()
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default();
        entries.sort_by(|(ka, va), (kb, vb)| match va.order_number.cmp(&vb.order_number) {
            Ordering::Equal => ka.cmp(kb),
            other => other,
        });
        entries
    }

    /// Children of the effective List payload, stably sorted by order number.
    pub fn ordered_items(&self) -> Vec<&Value> {
        let mut items: Vec<&Value> = self.as_list().map(|l| l.iter().collect()).unwrap_or_default();
        items.sort_by_key(|v| v.order_number);
        items
    }

    /// Follow a chain of Dictionary keys. An empty path yields `self`.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let mut node = self;
        for segment in path {
            if node.value_type != ValueType::Dictionary {
                return None;
            }
            node = match &node.payload {
                Some(Payload::Dictionary(map)) => map.get(segment.as_ref())?,
                _ => return None,
            };
        }
        Some(node)
    }

    pub fn find_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Value> {
        let mut node = self;
        for segment in path {
            if node.value_type != ValueType::Dictionary {
                return None;
            }
            node = match &mut node.payload {
                Some(Payload::Dictionary(map)) => map.get_mut(segment.as_ref())?,
                _ => return None,
            };
        }
        Some(node)
    }

    pub fn find_path_of_type<S: AsRef<str>>(
        &self,
        path: &[S],
        value_type: ValueType,
    ) -> Option<&Value> {
        self.find_path(path)
            .filter(|node| node.value_type == value_type)
    }

    /// Like [`find_path_of_type`](Self::find_path_of_type) but unwrapped into
    /// plain JSON.
    pub fn find_path_raw<S: AsRef<str>>(
        &self,
        path: &[S],
        value_type: ValueType,
    ) -> Option<JsonValue> {
        self.find_path_of_type(path, value_type).map(Value::to_untyped)
    }

    pub fn find_bool_path<S: AsRef<str>>(&self, path: &[S]) -> Option<bool> {
        self.find_path_of_type(path, ValueType::Boolean)?.as_bool()
    }

    pub fn find_int_path<S: AsRef<str>>(&self, path: &[S]) -> Option<i64> {
        self.find_path_of_type(path, ValueType::Integer)?.as_i64()
    }

    pub fn find_double_path<S: AsRef<str>>(&self, path: &[S]) -> Option<f64> {
        self.find_path_of_type(path, ValueType::Double)?.as_f64()
    }

    pub fn find_string_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.find_path_of_type(path, ValueType::String)?.as_str()
    }

    pub fn find_dict_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        self.find_path_of_type(path, ValueType::Dictionary)
    }

    pub fn find_list_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        self.find_path_of_type(path, ValueType::List)
    }

    /// Assign `value` at a Dictionary path, creating missing intermediate
    /// Dictionaries. An empty path replaces this node's own payload.
    ///
    /// ```
    /// use valtree_core::Value;
    ///
    /// let mut root = Value::dictionary();
    /// root.set_path(&["server", "port"], 8080).unwrap();
    /// assert_eq!(root.find_int_path(&["server", "port"]), Some(8080));
    /// ```
    pub fn set_path<S: AsRef<str>>(&mut self, path: &[S], value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let Some((last, parents)) = path.split_last() else {
            let payload = value.value().cloned();
            return self.set_value(payload);
        };
        let result = self
            .ensure_constructed()
            .and_then(|()| self.assign_path(parents, last.as_ref(), value));
        self.record(result)
    }

    fn assign_path<S: AsRef<str>>(&mut self, parents: &[S], last: &str, value: Value) -> Result<()> {
        let mut node = self;
        for segment in parents {
            let segment = segment.as_ref();
            let value_type = node.value_type;
            let map = node.dictionary_mut().ok_or_else(|| {
                ValueError::new(
                    ErrorKind::InvalidUpdate,
                    format!("Path segment \"{segment}\" goes through a {value_type} value"),
                )
            })?;
            node = map
                .entry(segment.to_string())
                .or_insert_with(Value::dictionary);
        }
        let value_type = node.value_type;
        let map = node.dictionary_mut().ok_or_else(|| {
            ValueError::new(
                ErrorKind::InvalidUpdate,
                format!("Key \"{last}\" can't be set on a {value_type} value"),
            )
        })?;
        map.insert(last.to_string(), value);
        Ok(())
    }

    /// Convert to untyped JSON, children in serialization order. Absent
    /// payloads and non-finite doubles become `null`.
    pub fn to_untyped(&self) -> JsonValue {
        match self.value() {
            None => JsonValue::Null,
            Some(Payload::Boolean(b)) => JsonValue::Bool(*b),
            Some(Payload::Integer(i)) => JsonValue::Number(Number::from(*i)),
            Some(Payload::Double(f)) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Some(Payload::String(s)) => JsonValue::String(s.clone()),
            Some(Payload::Dictionary(_)) => {
                let mut map = Map::new();
                for (key, child) in self.ordered_entries() {
                    map.insert(key.to_string(), child.to_untyped());
                }
                JsonValue::Object(map)
            }
            Some(Payload::List(_)) => {
                JsonValue::Array(self.ordered_items().into_iter().map(Value::to_untyped).collect())
            }
        }
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Value::new(payload)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::new(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::new(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::new(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(s)
    }
}

impl From<Dictionary> for Value {
    fn from(map: Dictionary) -> Self {
        Value::new(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::new(items)
    }
}
