//! Value tree → JSON text.
//!
//! The serializer walks the tree and writes compact JSON:
//!
//! - **Absent payloads** are written as `null` (the default is used when set)
//! - **Dictionaries** emit children sorted by `(order_number, key)`, never in
//!   map order. This replays deserialized objects in their input field order.
//! - **Lists** emit children stably sorted by `order_number`
//! - **Strings** escape only `\b \f \n \r \t \\ \"`; every other character is
//!   written verbatim after a charset encodability check
//! - **Doubles** always keep a fraction or exponent (`1.0`, `1e300`) so they
//!   re-parse as Doubles
//!
//! # Example
//! ```
//! use valtree_core::{deserialize, serialize};
//!
//! let tree = deserialize(r#"{"b":1,"a":2}"#, None).unwrap();
//! assert_eq!(serialize(&tree).unwrap(), r#"{"b":1,"a":2}"#);
//! ```

use tracing::{debug, instrument};

use crate::config::CodecOptions;
use crate::error::{ErrorKind, Result, ValueError};
use crate::value::{Payload, Value};

const NULL: &str = "null";

/// Serialize a valid value tree with default options.
pub fn serialize(root: &Value) -> Result<String> {
    serialize_with(root, &CodecOptions::default())
}

/// Serialize a value tree into compact JSON.
///
/// Fails with the node's own construction error for a broken root, and with
/// `InvalidParameter` for any other invalid tree.
#[instrument(level = "trace", skip_all, fields(charset = %options.charset))]
pub fn serialize_with(root: &Value, options: &CodecOptions) -> Result<String> {
    if let Some(err) = root.error() {
        debug!(error = %err, "refusing to serialize a broken value");
        return Err(err.clone());
    }
    if !root.is_valid() {
        let err = ValueError::new(ErrorKind::InvalidParameter, "Parameter 'root' is invalid");
        debug!(error = %err, "refusing to serialize an invalid tree");
        return Err(err);
    }
    let mut out = String::new();
    if let Err(err) = serialize_node(root, options, &mut out) {
        debug!(error = %err, "serialization failed");
        return Err(err);
    }
    Ok(out)
}

/// Dispatch on the effective payload of a node.
fn serialize_node(value: &Value, options: &CodecOptions, out: &mut String) -> Result<()> {
    match value.value() {
        None => out.push_str(NULL),
        Some(Payload::Boolean(b)) => out.push_str(if *b { "true" } else { "false" }),
        Some(Payload::Integer(i)) => out.push_str(&i.to_string()),
        Some(Payload::Double(f)) => out.push_str(&format_double(*f)?),
        Some(Payload::String(s)) => serialize_string(s, options, out)?,
        Some(Payload::Dictionary(_)) => serialize_dictionary(value, options, out)?,
        Some(Payload::List(_)) => serialize_list(value, options, out)?,
    }
    Ok(())
}

/// `{"key":value,...}` in `(order_number, key)` order.
fn serialize_dictionary(value: &Value, options: &CodecOptions, out: &mut String) -> Result<()> {
    out.push('{');
    for (i, (key, child)) in value.ordered_entries().into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        serialize_string(key, options, out)
            .map_err(|err| err.context(format_args!("Key \"{key}\" is inappropriate")))?;
        out.push(':');
        serialize_node(child, options, out)
            .map_err(|err| err.context(format_args!("Field \"{key}\" is inappropriate")))?;
    }
    out.push('}');
    Ok(())
}

/// `[value,...]` in `order_number` order; ties keep storage order.
fn serialize_list(value: &Value, options: &CodecOptions, out: &mut String) -> Result<()> {
    out.push('[');
    for (i, child) in value.ordered_items().into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        serialize_node(child, options, out)
            .map_err(|err| err.context(format_args!("Item[{i}] is inappropriate")))?;
    }
    out.push(']');
    Ok(())
}

/// Quote and escape a string. Characters outside the escape set, including
/// other control characters, pass through untouched.
fn serialize_string(s: &str, options: &CodecOptions, out: &mut String) -> Result<()> {
    options.charset.check(s)?;
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out.push('"');
    Ok(())
}

/// Shortest text that parses back to the same `f64` and still reads as a
/// Double: `1.0`, `0.25`, `1e300`, `-0.0`.
fn format_double(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(ValueError::new(
            ErrorKind::UnsupportedType,
            format!("Double {f} has no JSON representation"),
        ));
    }
    Ok(format!("{f:?}"))
}
