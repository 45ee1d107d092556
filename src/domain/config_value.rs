// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration values.
//!
//! This module provides the `ConfigValue` type stored at every key of a
//! configuration tree, together with type-safe accessors and the literal-syntax
//! rendering used when a value has to be stringified.

use crate::domain::array::NumericArray;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::node::CfgNode;
use serde::{Serialize, Serializer};
use std::fmt;

/// The kind of a [`ConfigValue`], used to decide type compatibility during merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// No value.
    Null,
    /// A boolean.
    Bool,
    /// An integer.
    Int,
    /// A float.
    Float,
    /// A string.
    Str,
    /// A growable sequence.
    List,
    /// A fixed sequence.
    Tuple,
    /// A numeric array.
    Array,
    /// A nested tree node.
    Node,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Array => "array",
            ValueKind::Node => "node",
        };
        f.write_str(name)
    }
}

/// A value stored in a configuration tree.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{ConfigValue, ValueKind};
///
/// let value = ConfigValue::from(42);
/// assert_eq!(value.kind(), ValueKind::Int);
/// assert_eq!(value.as_i64("MODEL.DEPTH").unwrap(), 42);
///
/// let pair = ConfigValue::tuple([1, 2]);
/// assert_eq!(pair.to_string(), "(1, 2)");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(String),
    /// A growable sequence.
    List(Vec<ConfigValue>),
    /// A fixed sequence.
    Tuple(Vec<ConfigValue>),
    /// A numeric array.
    Array(NumericArray),
    /// A nested tree node.
    Node(CfgNode),
}

impl ConfigValue {
    /// Builds a list from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ConfigValue>,
    {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a tuple from anything convertible into values.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ConfigValue>,
    {
        ConfigValue::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Null => ValueKind::Null,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::Str(_) => ValueKind::Str,
            ConfigValue::List(_) => ValueKind::List,
            ConfigValue::Tuple(_) => ValueKind::Tuple,
            ConfigValue::Array(_) => ValueKind::Array,
            ConfigValue::Node(_) => ValueKind::Node,
        }
    }

    /// Returns `true` for [`ConfigValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns the value as a boolean.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            ConfigValue::Bool(b) => Ok(*b),
            other => Err(other.conversion_error(key, "bool")),
        }
    }

    /// Returns the value as an integer.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match self {
            ConfigValue::Int(i) => Ok(*i),
            other => Err(other.conversion_error(key, "int")),
        }
    }

    /// Returns the value as a float. Integers are widened.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            ConfigValue::Float(x) => Ok(*x),
            ConfigValue::Int(i) => Ok(*i as f64),
            other => Err(other.conversion_error(key, "float")),
        }
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self, key: &str) -> Result<&str> {
        match self {
            ConfigValue::Str(s) => Ok(s),
            other => Err(other.conversion_error(key, "str")),
        }
    }

    /// Returns the elements of a list or tuple.
    pub fn as_sequence(&self, key: &str) -> Result<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) | ConfigValue::Tuple(items) => Ok(items),
            other => Err(other.conversion_error(key, "sequence")),
        }
    }

    /// Returns the value as a nested node.
    pub fn as_node(&self, key: &str) -> Result<&CfgNode> {
        match self {
            ConfigValue::Node(node) => Ok(node),
            other => Err(other.conversion_error(key, "node")),
        }
    }

    fn conversion_error(&self, key: &str, target_type: &str) -> ConfigError {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: target_type.to_string(),
            found: self.kind().to_string(),
        }
    }

    /// Renders the value in literal syntax, quoting strings.
    ///
    /// The output can be decoded back into an equal value.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        write_repr(self, &mut out);
        out
    }

    pub(crate) fn set_immutable(&mut self, immutable: bool) {
        match self {
            ConfigValue::Node(node) => node.set_immutable(immutable),
            ConfigValue::List(items) | ConfigValue::Tuple(items) => {
                for item in items {
                    item.set_immutable(immutable);
                }
            }
            _ => {}
        }
    }
}

/// Strings render raw at the top level and quoted inside containers.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Str(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

fn write_repr(value: &ConfigValue, out: &mut String) {
    match value {
        ConfigValue::Null => out.push_str("None"),
        ConfigValue::Bool(true) => out.push_str("True"),
        ConfigValue::Bool(false) => out.push_str("False"),
        ConfigValue::Int(i) => out.push_str(&i.to_string()),
        ConfigValue::Float(x) => out.push_str(&format_float(*x)),
        ConfigValue::Str(s) => write_quoted(s, out),
        ConfigValue::List(items) => {
            out.push('[');
            write_items(items, out);
            out.push(']');
        }
        ConfigValue::Tuple(items) => {
            out.push('(');
            write_items(items, out);
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        ConfigValue::Array(array) => {
            out.push('[');
            write_items(&array.to_values(), out);
            out.push(']');
        }
        ConfigValue::Node(node) => {
            out.push('{');
            for (i, (key, value)) in node.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(key, out);
                out.push_str(": ");
                write_repr(value, out);
            }
            out.push('}');
        }
    }
}

fn write_items(items: &[ConfigValue], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(item, out);
    }
}

fn write_quoted(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        let sign = if x > 0.0 { "" } else { "-" };
        return format!("{}inf", sign);
    }

    // LowerExp yields the shortest round-trip digits, e.g. "-1.25e3"
    let sci = format!("{:e}", x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    // scientific notation outside 1e-4 <= |x| < 1e16, with a signed two-digit exponent
    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs());
    }

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exp + 1;
    if point <= 0 {
        format!("{}0.{}{}", sign, "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        format!("{}{}{}.0", sign, digits, zeros)
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}{}.{}", sign, int, frac)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Int(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(x) => serializer.serialize_f64(*x),
            ConfigValue::Str(s) => serializer.serialize_str(s),
            ConfigValue::List(items) | ConfigValue::Tuple(items) => items.serialize(serializer),
            ConfigValue::Array(array) => array.serialize(serializer),
            ConfigValue::Node(node) => node.serialize(serializer),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Int(i64::from(i))
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<u32> for ConfigValue {
    fn from(i: u32) -> Self {
        ConfigValue::Int(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        ConfigValue::Float(x)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<CfgNode> for ConfigValue {
    fn from(node: CfgNode) -> Self {
        ConfigValue::Node(node)
    }
}

impl From<NumericArray> for ConfigValue {
    fn from(array: NumericArray) -> Self {
        ConfigValue::Array(array)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::list(items)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(ConfigValue::Null.kind(), ValueKind::Null);
        assert_eq!(ConfigValue::from(true).kind(), ValueKind::Bool);
        assert_eq!(ConfigValue::from(1).kind(), ValueKind::Int);
        assert_eq!(ConfigValue::from(1.5).kind(), ValueKind::Float);
        assert_eq!(ConfigValue::from("x").kind(), ValueKind::Str);
        assert_eq!(ConfigValue::list([1]).kind(), ValueKind::List);
        assert_eq!(ConfigValue::tuple([1]).kind(), ValueKind::Tuple);
        assert_eq!(ConfigValue::from(CfgNode::new()).kind(), ValueKind::Node);
    }

    #[test]
    fn test_as_bool() {
        assert!(ConfigValue::from(true).as_bool("k").unwrap());
        assert!(ConfigValue::from(1).as_bool("k").is_err());
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(ConfigValue::from(-42).as_i64("k").unwrap(), -42);
        let err = ConfigValue::from("42").as_i64("k").unwrap_err();
        assert!(matches!(err, ConfigError::TypeConversionError { .. }));
        assert!(err.to_string().contains("found str"));
    }

    #[test]
    fn test_as_f64_widens_integers() {
        assert_eq!(ConfigValue::from(3).as_f64("k").unwrap(), 3.0);
        assert_eq!(ConfigValue::from(0.25).as_f64("k").unwrap(), 0.25);
    }

    #[test]
    fn test_as_sequence_accepts_list_and_tuple() {
        assert_eq!(ConfigValue::list([1, 2]).as_sequence("k").unwrap().len(), 2);
        assert_eq!(ConfigValue::tuple([1]).as_sequence("k").unwrap().len(), 1);
        assert!(ConfigValue::from("x").as_sequence("k").is_err());
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(ConfigValue::Null.to_string(), "None");
        assert_eq!(ConfigValue::from(true).to_string(), "True");
        assert_eq!(ConfigValue::from(123).to_string(), "123");
        assert_eq!(ConfigValue::from(1.0).to_string(), "1.0");
        assert_eq!(ConfigValue::from(0.1).to_string(), "0.1");
        assert_eq!(ConfigValue::from("plain").to_string(), "plain");
    }

    #[test]
    fn test_display_floats_positional_and_scientific() {
        let cases = [
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (100.0, "100.0"),
            (1234.5, "1234.5"),
            (-0.00025, "-0.00025"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (1e20, "1e+20"),
            (1.5e-7, "1.5e-07"),
            (1e-5, "1e-05"),
            (-2.5e300, "-2.5e+300"),
        ];
        for (value, expected) in cases {
            assert_eq!(ConfigValue::Float(value).to_string(), expected);
        }
    }

    #[test]
    fn test_display_containers_quote_strings() {
        let value = ConfigValue::list([ConfigValue::from("a"), ConfigValue::from(1)]);
        assert_eq!(value.to_string(), "['a', 1]");
        assert_eq!(ConfigValue::tuple([5]).to_string(), "(5,)");
        assert_eq!(ConfigValue::Tuple(vec![]).to_string(), "()");
    }

    #[test]
    fn test_display_node() {
        let node = CfgNode::new().with("B", 2).with("A", "x");
        assert_eq!(ConfigValue::from(node).to_string(), "{'A': 'x', 'B': 2}");
    }

    #[test]
    fn test_repr_escapes_quotes() {
        assert_eq!(ConfigValue::from("it's").repr(), "\"it's\"");
        assert_eq!(ConfigValue::from("a'b\"c").repr(), "'a\\'b\"c'");
        assert_eq!(ConfigValue::from("line\nbreak").repr(), "'line\\nbreak'");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ConfigValue::from(None::<i64>), ConfigValue::Null);
        assert_eq!(ConfigValue::from(Some(3)), ConfigValue::Int(3));
    }
}
