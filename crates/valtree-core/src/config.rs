//! Codec configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ValueError};

/// Character set every string leaf must be representable in.
///
/// Rust strings are always UTF-8, so `Utf8` accepts everything. The narrower
/// sets reject strings containing characters outside their range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    Ascii,
    #[serde(rename = "latin-1", alias = "latin1")]
    Latin1,
}

impl Charset {
    /// Returns the first character that cannot be encoded, if any.
    pub fn first_unencodable(self, s: &str) -> Option<char> {
        let limit = match self {
            Charset::Utf8 => return None,
            Charset::Ascii => 0x80,
            Charset::Latin1 => 0x100,
        };
        s.chars().find(|&c| u32::from(c) >= limit)
    }

    pub fn check(self, s: &str) -> crate::Result<()> {
        match self.first_unencodable(s) {
            Some(c) => Err(ValueError::new(
                ErrorKind::Unencodable,
                format!("Character {c:?} (U+{:04X}) can't be encoded as {self}", u32::from(c)),
            )),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Charset::Utf8 => "utf-8",
            Charset::Ascii => "ascii",
            Charset::Latin1 => "latin-1",
        })
    }
}

impl FromStr for Charset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "ascii" | "us-ascii" => Ok(Charset::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Charset::Latin1),
            other => Err(ValueError::new(
                ErrorKind::InvalidParameter,
                format!("Unknown charset: '{other}'"),
            )),
        }
    }
}

/// Options shared by the serializer and the deserializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub charset: Charset,
}

impl CodecOptions {
    pub fn with_charset(charset: Charset) -> Self {
        Self { charset }
    }
}
