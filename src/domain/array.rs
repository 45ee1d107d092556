// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-dimensional numeric arrays.
//!
//! A `NumericArray` is the array-like leaf type of a configuration tree. When a
//! merge replaces an array, the replacement is cast into the existing array's
//! element type instead of being rejected.

use crate::domain::config_value::ConfigValue;
use serde::{Serialize, Serializer};
use std::fmt;

/// Element type of a [`NumericArray`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayDtype {
    /// Booleans.
    Bool,
    /// Signed 64-bit integers.
    Int64,
    /// 64-bit floats.
    Float64,
}

impl fmt::Display for ArrayDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayDtype::Bool => f.write_str("bool"),
            ArrayDtype::Int64 => f.write_str("int64"),
            ArrayDtype::Float64 => f.write_str("float64"),
        }
    }
}

/// A homogeneous one-dimensional numeric array.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{ArrayDtype, ConfigValue, NumericArray};
///
/// let candidate = ConfigValue::list([1, 2, 3]);
/// let cast = NumericArray::cast(&candidate, ArrayDtype::Float64).unwrap();
/// assert_eq!(cast, NumericArray::Float64(vec![1.0, 2.0, 3.0]));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum NumericArray {
    /// An array of booleans.
    Bool(Vec<bool>),
    /// An array of integers.
    Int64(Vec<i64>),
    /// An array of floats.
    Float64(Vec<f64>),
}

impl NumericArray {
    /// Returns the element type.
    pub fn dtype(&self) -> ArrayDtype {
        match self {
            NumericArray::Bool(_) => ArrayDtype::Bool,
            NumericArray::Int64(_) => ArrayDtype::Int64,
            NumericArray::Float64(_) => ArrayDtype::Float64,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match self {
            NumericArray::Bool(v) => v.len(),
            NumericArray::Int64(v) => v.len(),
            NumericArray::Float64(v) => v.len(),
        }
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the elements as scalar configuration values.
    pub fn to_values(&self) -> Vec<ConfigValue> {
        match self {
            NumericArray::Bool(v) => v.iter().copied().map(ConfigValue::Bool).collect(),
            NumericArray::Int64(v) => v.iter().copied().map(ConfigValue::Int).collect(),
            NumericArray::Float64(v) => v.iter().copied().map(ConfigValue::Float).collect(),
        }
    }

    /// Casts `candidate` into an array of `dtype`.
    ///
    /// Sequences and arrays are cast element-wise, a scalar becomes a one-element
    /// array. Floats are truncated toward zero when cast to integers, and numeric
    /// strings are parsed. Returns `None` when any element cannot be cast.
    pub fn cast(candidate: &ConfigValue, dtype: ArrayDtype) -> Option<NumericArray> {
        let elements = match candidate {
            ConfigValue::List(items) | ConfigValue::Tuple(items) => items.clone(),
            ConfigValue::Array(array) => array.to_values(),
            ConfigValue::Bool(_)
            | ConfigValue::Int(_)
            | ConfigValue::Float(_)
            | ConfigValue::Str(_) => vec![candidate.clone()],
            ConfigValue::Null | ConfigValue::Node(_) => return None,
        };

        match dtype {
            ArrayDtype::Bool => elements
                .iter()
                .map(cast_bool)
                .collect::<Option<Vec<_>>>()
                .map(NumericArray::Bool),
            ArrayDtype::Int64 => elements
                .iter()
                .map(cast_i64)
                .collect::<Option<Vec<_>>>()
                .map(NumericArray::Int64),
            ArrayDtype::Float64 => elements
                .iter()
                .map(cast_f64)
                .collect::<Option<Vec<_>>>()
                .map(NumericArray::Float64),
        }
    }
}

fn cast_bool(value: &ConfigValue) -> Option<bool> {
    match value {
        ConfigValue::Bool(b) => Some(*b),
        ConfigValue::Int(i) => Some(*i != 0),
        ConfigValue::Float(x) => Some(*x != 0.0),
        _ => None,
    }
}

fn cast_i64(value: &ConfigValue) -> Option<i64> {
    match value {
        ConfigValue::Bool(b) => Some(i64::from(*b)),
        ConfigValue::Int(i) => Some(*i),
        ConfigValue::Float(x) if x.is_finite() => Some(x.trunc() as i64),
        ConfigValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cast_f64(value: &ConfigValue) -> Option<f64> {
    match value {
        ConfigValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        ConfigValue::Int(i) => Some(*i as f64),
        ConfigValue::Float(x) => Some(*x),
        ConfigValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Serialize for NumericArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericArray::Bool(v) => v.serialize(serializer),
            NumericArray::Int64(v) => v.serialize(serializer),
            NumericArray::Float64(v) => v.serialize(serializer),
        }
    }
}
