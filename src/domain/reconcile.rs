// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type reconciliation for merged values.
//!
//! A merge may only replace a value with one of the same kind. A few lossless
//! coercions are allowed, mostly to absorb differences introduced by a text
//! round trip (a tuple default parsed back as a list, a numeric string).

use crate::domain::array::NumericArray;
use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};

/// Checks that `candidate` may replace `existing` and coerces it if needed.
///
/// The rules, in order:
///
/// 1. Same kind: accepted unchanged.
/// 2. `existing` is an array: `candidate` is cast to the array's dtype.
/// 3. `existing` is a string: `candidate` is stringified.
/// 4. Tuple replacing a list: converted to a list.
/// 5. List replacing a tuple: converted to a tuple.
///
/// Anything else fails with [`ConfigError::TypeMismatch`] naming `full_key`.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::reconcile::reconcile;
/// use cfgtree::domain::{ConfigKey, ConfigValue};
///
/// let key = ConfigKey::from("INPUT.SIZE");
/// let value = reconcile(ConfigValue::list([3, 4]), &ConfigValue::tuple([1, 2]), &key).unwrap();
/// assert_eq!(value, ConfigValue::tuple([3, 4]));
///
/// assert!(reconcile(ConfigValue::from(1.5), &ConfigValue::from(true), &key).is_err());
/// ```
pub fn reconcile(
    candidate: ConfigValue,
    existing: &ConfigValue,
    full_key: &ConfigKey,
) -> Result<ConfigValue> {
    if candidate.kind() == existing.kind() {
        return Ok(candidate);
    }

    let coerced = match (candidate, existing) {
        (candidate, ConfigValue::Array(array)) => {
            match NumericArray::cast(&candidate, array.dtype()) {
                Some(cast) => ConfigValue::Array(cast),
                None => return Err(mismatch(&candidate, existing, full_key)),
            }
        }
        (candidate, ConfigValue::Str(_)) => ConfigValue::Str(candidate.to_string()),
        (ConfigValue::Tuple(items), ConfigValue::List(_)) => ConfigValue::List(items),
        (ConfigValue::List(items), ConfigValue::Tuple(_)) => ConfigValue::Tuple(items),
        (candidate, existing) => return Err(mismatch(&candidate, existing, full_key)),
    };

    tracing::trace!(
        "Coerced value for '{}' from {} to {}",
        full_key,
        coerced.kind(),
        existing.kind()
    );
    Ok(coerced)
}

fn mismatch(candidate: &ConfigValue, existing: &ConfigValue, full_key: &ConfigKey) -> ConfigError {
    ConfigError::TypeMismatch {
        key: full_key.to_string(),
        expected_type: existing.kind().to_string(),
        actual_type: candidate.kind().to_string(),
        expected_value: existing.to_string(),
        actual_value: candidate.to_string(),
    }
}
