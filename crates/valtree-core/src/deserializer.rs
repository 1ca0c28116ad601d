//! JSON text → value tree.
//!
//! Deserialization runs in two passes. The text is first parsed into an
//! untyped `serde_json::Value`; the workspace enables serde_json's
//! `preserve_order` feature, so object entries keep their input order. The
//! untyped tree is then rebuilt into [`Value`] nodes, optionally shaped and
//! validated against a schema tree at every level.
//!
//! # Key design decisions
//!
//! - **Order numbers from input position**: object entries and list elements
//!   are numbered `0, 1, 2, ...` as they appear in the text. Dictionaries have
//!   no intrinsic order, so this is what lets the serializer replay them.
//! - **Schema-shaped nodes**: with a schema, each node starts as
//!   [`Value::from_schema`] of its sub-schema, inheriting default, optional
//!   flag and order number, and then receives the parsed payload.
//! - **All or nothing**: any mismatch aborts the whole call. No partial tree
//!   is returned.

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, instrument};

use crate::config::CodecOptions;
use crate::error::{ErrorKind, Result, ValueError};
use crate::types::ValueType;
use crate::value::{Dictionary, Payload, Value};

/// Deserialize JSON text with default options.
pub fn deserialize(text: &str, schema: Option<&Value>) -> Result<Value> {
    deserialize_with(text, schema, &CodecOptions::default())
}

/// Deserialize JSON text into a value tree, optionally against a schema.
///
/// # Errors
///
/// - `ParseFailure` for malformed text or a bare top-level `null`
/// - `InvalidType` when a node's type disagrees with its schema
/// - `InvalidObject` for fields missing from, or unknown to, the schema
/// - `UnsupportedType` for integers outside `i64` and floats outside `f64`
/// - `Unencodable` for strings outside the configured charset
///
/// Nested errors name the field/index trail leading to the failure.
#[instrument(level = "trace", skip_all, fields(len = text.len(), schema = schema.is_some()))]
pub fn deserialize_with(
    text: &str,
    schema: Option<&Value>,
    options: &CodecOptions,
) -> Result<Value> {
    let result = parse(text).and_then(|json| build_node(json, schema, options));
    if let Err(err) = &result {
        debug!(error = %err, "deserialization failed");
    }
    result
}

/// First pass: text → untyped tree.
fn parse(text: &str) -> Result<JsonValue> {
    let json: JsonValue = serde_json::from_str(text)?;
    if json.is_null() {
        return Err(ValueError::new(
            ErrorKind::ParseFailure,
            "Json has an unknown value type (top-level null)",
        ));
    }
    Ok(json)
}

/// Second pass: dispatch on the untyped node's kind.
fn build_node(json: JsonValue, schema: Option<&Value>, options: &CodecOptions) -> Result<Value> {
    match json {
        JsonValue::Null => build_null(schema),
        JsonValue::Bool(b) => build_scalar(Payload::Boolean(b), schema),
        JsonValue::Number(n) => {
            let payload = Payload::from_number(&n).ok_or_else(|| {
                ValueError::new(
                    ErrorKind::UnsupportedType,
                    format!("Number {n} is out of the INTEGER and DOUBLE range"),
                )
            })?;
            build_scalar(payload, schema)
        }
        JsonValue::String(s) => {
            options.charset.check(&s)?;
            build_scalar(Payload::String(s), schema)
        }
        JsonValue::Array(items) => build_list(items, schema, options),
        JsonValue::Object(map) => build_dictionary(map, schema, options),
    }
}

/// Start a node of the `inferred` kind, shaped after `schema` when given.
fn shaped(schema: Option<&Value>, inferred: ValueType) -> Result<Value> {
    match schema {
        Some(schema) if schema.value_type().accepts(inferred) => Ok(Value::from_schema(schema)),
        Some(schema) => Err(ValueError::new(
            ErrorKind::InvalidType,
            format!(
                "Value must be {} but it's {}",
                schema.value_type(),
                inferred
            ),
        )),
        None => Ok(Value::typed(inferred)),
    }
}

/// `null` is an absent payload. Without a schema it becomes an untyped
/// optional node; with one it is only allowed where the schema is optional.
fn build_null(schema: Option<&Value>) -> Result<Value> {
    match schema {
        Some(schema) if schema.is_optional() => Ok(Value::from_schema(schema)),
        Some(schema) => Err(ValueError::new(
            ErrorKind::InvalidObject,
            format!("Value must be {} but it's null", schema.value_type()),
        )),
        None => Ok(Value::builder().optional(true).build()),
    }
}

fn build_scalar(payload: Payload, schema: Option<&Value>) -> Result<Value> {
    let mut node = shaped(schema, payload.value_type())?;
    node.set_value(Some(payload))?;
    Ok(node)
}

fn build_dictionary(
    map: Map<String, JsonValue>,
    schema: Option<&Value>,
    options: &CodecOptions,
) -> Result<Value> {
    let mut node = shaped(schema, ValueType::Dictionary)?;
    node.set_value(Some(Payload::Dictionary(Dictionary::new())))?;
    // A schema dictionary without a payload leaves its fields unconstrained.
    let fields = schema.and_then(Value::as_dictionary);

    for (order, (key, item)) in map.into_iter().enumerate() {
        options
            .charset
            .check(&key)
            .map_err(|err| err.context(format_args!("Key \"{key}\" is inappropriate")))?;
        let child_schema = match fields {
            Some(fields) => Some(fields.get(&key).ok_or_else(|| {
                ValueError::new(
                    ErrorKind::InvalidObject,
                    format!("Dictionary has inappropriate field - \"{key}\""),
                )
            })?),
            None => None,
        };
        let mut child = build_node(item, child_schema, options)
            .map_err(|err| err.context(format_args!("Field \"{key}\" is inappropriate")))?;
        child.set_order_number(order_number(order));
        node.set(key, child)?;
    }

    if let Some(fields) = fields {
        for (key, child_schema) in fields {
            if !child_schema.is_optional() && !node.contains_key(key) {
                return Err(ValueError::new(
                    ErrorKind::InvalidObject,
                    format!("Dictionary doesn't have field - \"{key}\""),
                ));
            }
        }
    }
    Ok(node)
}

fn build_list(items: Vec<JsonValue>, schema: Option<&Value>, options: &CodecOptions) -> Result<Value> {
    let mut node = shaped(schema, ValueType::List)?;
    node.set_value(Some(Payload::List(Vec::with_capacity(items.len()))))?;
    // Only a single-element list schema constrains the elements.
    let template = match schema.and_then(Value::as_list) {
        Some([template]) => Some(template),
        _ => None,
    };

    for (index, item) in items.into_iter().enumerate() {
        let mut child = build_node(item, template, options)
            .map_err(|err| err.context(format_args!("Item[{index}] is inappropriate")))?;
        child.set_order_number(order_number(index));
        node.push(child)?;
    }
    Ok(node)
}

fn order_number(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
