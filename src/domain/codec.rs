// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw value decoding.
//!
//! Values arriving from YAML text or from a command-line override list are often
//! strings that spell a richer value, e.g. `"0.5"` or `"(3, 4)"`. Decoding turns
//! such strings into their literal value and keeps every other string as is.

use crate::domain::config_value::ConfigValue;
use crate::domain::literal::parse_literal;

/// Outcome of decoding a string.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    /// The string spelled a literal.
    Literal(ConfigValue),
    /// The string is plain text and is kept unchanged.
    Raw(String),
}

impl Decoded {
    /// Converts the outcome into a value.
    pub fn into_value(self) -> ConfigValue {
        match self {
            Decoded::Literal(value) => value,
            Decoded::Raw(s) => ConfigValue::Str(s),
        }
    }
}

/// Decodes a string through the strict literal grammar.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::codec::{decode_str, Decoded};
/// use cfgtree::domain::ConfigValue;
///
/// assert_eq!(decode_str("123"), Decoded::Literal(ConfigValue::Int(123)));
/// assert_eq!(decode_str("foo/bar"), Decoded::Raw("foo/bar".to_string()));
/// ```
pub fn decode_str(raw: &str) -> Decoded {
    match parse_literal(raw) {
        Ok(value) => Decoded::Literal(value),
        Err(err) => {
            tracing::trace!("Keeping '{}' as a string: {}", raw, err);
            Decoded::Raw(raw.to_string())
        }
    }
}

/// Decodes a raw value into its in-memory representation.
///
/// Strings go through [`decode_str`]; every other value, including nested nodes,
/// is returned unchanged. This never fails.
pub fn decode(raw: ConfigValue) -> ConfigValue {
    match raw {
        ConfigValue::Str(s) => match decode_str(&s) {
            Decoded::Literal(value) => value,
            Decoded::Raw(_) => ConfigValue::Str(s),
        },
        other => other,
    }
}
