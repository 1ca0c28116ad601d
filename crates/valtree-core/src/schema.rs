//! Structural validation of a value tree against a schema tree.
//!
//! A schema is itself a [`Value`]: its shape and leaf types describe the
//! expected candidate.
//!
//! - Scalar leaves must match the schema's type; an Integer candidate is
//!   accepted where the schema says Double.
//! - A Dictionary schema without a payload accepts any dictionary. Otherwise
//!   every candidate key must exist in the schema and match recursively, and
//!   every non-optional schema key must be present in the candidate.
//! - A List schema holding exactly one element is a template applied to
//!   every candidate element. Any other List schema accepts any list.
//!
//! Failures are re-wrapped at each level with the offending field or index,
//! so the message traces the path from the root to the violation.
//!
//! ```
//! use serde_json::json;
//! use valtree_core::{check, ErrorKind, Value};
//!
//! let schema = Value::from_untyped(json!({"ids": [0]}));
//! let candidate = Value::from_untyped(json!({"ids": [1, 2, "x"]}));
//! let err = check(&candidate, &schema).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidType);
//! assert_eq!(
//!     err.message(),
//!     "Field \"ids\" is inappropriate - Item[2] is inappropriate - Value must be INTEGER but it's STRING"
//! );
//! ```

use tracing::debug;

use crate::error::{ErrorKind, Result, ValueError};
use crate::types::ValueType;
use crate::value::{Payload, Value};

/// Check `candidate` against `schema`.
pub fn check(candidate: &Value, schema: &Value) -> Result<()> {
    let result = check_node(candidate, schema);
    if let Err(err) = &result {
        debug!(error = %err, "schema check failed");
    }
    result
}

impl Value {
    /// Method form of [`check`].
    pub fn check_by_schema(&self, schema: &Value) -> Result<()> {
        check(self, schema)
    }
}

fn check_node(candidate: &Value, schema: &Value) -> Result<()> {
    if let Some(err) = candidate.error() {
        return Err(err.clone());
    }
    match candidate.value_type() {
        ValueType::Boolean | ValueType::Integer | ValueType::Double | ValueType::String => {
            check_scalar(candidate, schema)
        }
        ValueType::Dictionary => check_dictionary(candidate, schema),
        ValueType::List => check_list(candidate, schema),
        // A null leaf: acceptable only where the schema allows absence.
        ValueType::None if schema.is_optional() => Ok(()),
        ValueType::None => Err(ValueError::new(
            ErrorKind::InvalidType,
            format!("Value must be {} but it's null", schema.value_type()),
        )),
    }
}

fn type_mismatch(candidate: &Value, schema: &Value) -> ValueError {
    ValueError::new(
        ErrorKind::InvalidType,
        format!(
            "Value must be {} but it's {}",
            schema.value_type(),
            candidate.value_type()
        ),
    )
}

fn check_scalar(candidate: &Value, schema: &Value) -> Result<()> {
    if schema.value_type().accepts(candidate.value_type()) {
        Ok(())
    } else {
        Err(type_mismatch(candidate, schema))
    }
}

fn check_dictionary(candidate: &Value, schema: &Value) -> Result<()> {
    if candidate.value_type() != schema.value_type() {
        return Err(type_mismatch(candidate, schema));
    }
    let Some(Payload::Dictionary(fields)) = schema.value() else {
        return Ok(());
    };

    // Walk in serialization order so the first reported field is the first
    // one a reader of the document would see.
    for (key, child) in candidate.ordered_entries() {
        let Some(child_schema) = fields.get(key) else {
            return Err(ValueError::new(
                ErrorKind::InvalidObject,
                format!("Dictionary has inappropriate field - \"{key}\""),
            ));
        };
        check_node(child, child_schema)
            .map_err(|err| err.context(format_args!("Field \"{key}\" is inappropriate")))?;
    }

    for (key, child_schema) in fields {
        if child_schema.is_optional() || candidate.contains_key(key) {
            continue;
        }
        return Err(ValueError::new(
            ErrorKind::InvalidObject,
            format!("Dictionary doesn't have field - \"{key}\""),
        ));
    }
    Ok(())
}

fn check_list(candidate: &Value, schema: &Value) -> Result<()> {
    if candidate.value_type() != schema.value_type() {
        return Err(type_mismatch(candidate, schema));
    }
    let template = match schema.value() {
        Some(Payload::List(items)) if items.len() == 1 => &items[0],
        _ => return Ok(()),
    };

    for (index, item) in candidate.as_list().unwrap_or_default().iter().enumerate() {
        check_node(item, template)
            .map_err(|err| err.context(format_args!("Item[{index}] is inappropriate")))?;
    }
    Ok(())
}
