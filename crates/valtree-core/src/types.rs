//! The closed set of value kinds a [`crate::Value`] node can hold.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of a value node.
///
/// `None` means "no type yet". It is what a node reports after a failed
/// construction and is never the type of a live payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    #[default]
    None,
    Boolean,
    Integer,
    Double,
    String,
    Dictionary,
    List,
}

impl ValueType {
    /// Scalar kinds: everything except `None` and the two containers.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            ValueType::Boolean | ValueType::Integer | ValueType::Double | ValueType::String
        )
    }

    pub fn is_container(self) -> bool {
        matches!(self, ValueType::Dictionary | ValueType::List)
    }

    /// Whether a payload of kind `other` may be stored under this type.
    /// Only Integer widens, and only into Double.
    pub fn accepts(self, other: ValueType) -> bool {
        self == other || (self == ValueType::Double && other == ValueType::Integer)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::None => "NONE",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Integer => "INTEGER",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Dictionary => "DICTIONARY",
            ValueType::List => "LIST",
        };
        f.write_str(name)
    }
}
