// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration tree.
//!
//! This module defines the errors that can occur while building, merging, freezing
//! or reading a configuration tree. All errors use `thiserror` for proper error
//! handling and conversion.

use std::fmt;
use thiserror::Error;

/// The kind of key policy a registration targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationKind {
    /// A key registered as deprecated.
    Deprecated,
    /// A key registered as renamed.
    Renamed,
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationKind::Deprecated => f.write_str("deprecated"),
            RegistrationKind::Renamed => f.write_str("renamed"),
        }
    }
}

/// The main error type for configuration operations.
///
/// Every variant is fatal for the call that produced it. Merges are not
/// transactional: keys applied before the failing key stay applied. It is marked
/// as `#[non_exhaustive]` to allow for future additions without breaking
/// backwards compatibility.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::errors::ConfigError;
///
/// fn lookup() -> Result<i64, ConfigError> {
///     Err(ConfigError::UnknownKey {
///         key: "MODEL.DEPTH".to_string(),
///     })
/// }
///
/// assert_eq!(
///     lookup().unwrap_err().to_string(),
///     "Non-existent config key: MODEL.DEPTH"
/// );
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An overlay named a key the target tree does not define.
    #[error("Non-existent config key: {key}")]
    UnknownKey {
        /// The full dotted key
        key: String,
    },

    /// An overlay named a key that has been registered as renamed.
    #[error(
        "Key {old_key} was renamed to {new_key}; please update your config.{}",
        rename_note(.message)
    )]
    KeyRenamed {
        /// The key used in the overlay
        old_key: String,
        /// The key that replaced it
        new_key: String,
        /// Optional migration guidance
        message: Option<String>,
    },

    /// A replacement value could not be reconciled with the existing value's type.
    #[error(
        "Type mismatch ({expected_type} vs. {actual_type}) with values ({expected_value} vs. {actual_value}) for config key: {key}"
    )]
    TypeMismatch {
        /// The full dotted key
        key: String,
        /// The type of the existing value
        expected_type: String,
        /// The type of the replacement value
        actual_type: String,
        /// The existing value, rendered
        expected_value: String,
        /// The replacement value, rendered
        actual_value: String,
    },

    /// A write was attempted on a frozen node.
    #[error("Attempted to set \"{key}\" to \"{value}\", but CfgNode is immutable")]
    ImmutableWrite {
        /// The key being written
        key: String,
        /// The value being written, rendered
        value: String,
    },

    /// A key was registered twice with the same policy.
    #[error("key '{key}' is already registered as a {kind} key")]
    DuplicateRegistration {
        /// The full dotted key
        key: String,
        /// Which registry rejected it
        kind: RegistrationKind,
    },

    /// A flat override list did not contain whole key/value pairs.
    #[error("Override list must alternate keys and values, got {len} entries")]
    InvalidOverrideList {
        /// Number of entries in the list
        len: usize,
    },

    /// The requested configuration key was not found.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// A typed accessor was applied to a value of another kind.
    #[error("Failed to convert configuration value for key '{key}' to type {target_type}: found {found}")]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The requested type name
        target_type: String,
        /// The type actually stored
        found: String,
    },

    /// Failed to parse or render configuration text.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration source refused to load.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

fn rename_note(message: &Option<String>) -> String {
    match message {
        Some(note) => format!(" Note: {}", note),
        None => String::new(),
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
