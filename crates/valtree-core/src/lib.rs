//! # valtree-core
//!
//! A dynamic, self-describing value tree with schema matching and an
//! order-preserving JSON codec.
//!
//! Every node carries a type tag, an optional payload, a default, an
//! optionality flag and an order number. Dictionaries are keyed maps; their
//! serialization order comes from the children's order numbers, which the
//! deserializer assigns from input position. That makes `deserialize` →
//! `serialize` reproduce the original field order.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use valtree_core::{check, deserialize, serialize, Value};
//!
//! // An example document doubles as a schema.
//! let schema = Value::from_untyped(json!({"name": "", "scores": [0]}));
//!
//! let text = r#"{"scores":[95,87,92],"name":"Alice"}"#;
//! let tree = deserialize(text, Some(&schema)).unwrap();
//! assert!(check(&tree, &schema).is_ok());
//! assert_eq!(tree.find_string_path(&["name"]), Some("Alice"));
//!
//! // Field order survives the roundtrip.
//! assert_eq!(serialize(&tree).unwrap(), text);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value` nodes, payloads, path lookup and mutation
//! - [`schema`]: structural validation against a schema tree
//! - [`serializer`]: value tree → JSON text
//! - [`deserializer`]: JSON text → value tree, optionally schema-shaped
//! - [`config`]: codec options (charset)
//! - [`error`]: error kinds shared by every operation
//! - [`types`]: the `ValueType` tag

pub mod config;
pub mod deserializer;
pub mod error;
pub mod schema;
pub mod serializer;
pub mod types;
pub mod value;

pub use config::{Charset, CodecOptions};
pub use deserializer::{deserialize, deserialize_with};
pub use error::{ErrorKind, Result, ValueError};
pub use schema::check;
pub use serializer::{serialize, serialize_with};
pub use types::ValueType;
pub use value::{Dictionary, Payload, Value, ValueBuilder};
