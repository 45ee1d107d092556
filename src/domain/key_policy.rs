// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deprecated and renamed key registry.
//!
//! When an option is removed, registering its full key as deprecated keeps old
//! config files loading: the key is skipped with a warning. When an option is
//! renamed, registering the old key makes any use of it fail with a message that
//! points at the new name.

use crate::domain::config_key::ConfigKey;
use crate::domain::errors::{ConfigError, RegistrationKind, Result};
use crate::ports::{Diagnostic, DiagnosticSink};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Replacement recorded for a renamed key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenamedKey {
    /// The key that replaces the old one.
    pub new_key: ConfigKey,
    /// Optional migration guidance shown to the user.
    pub message: Option<String>,
}

/// Registry of deprecated and renamed full keys.
///
/// The registry owned by the node a merge starts from is the one consulted
/// for every level of that merge.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{ConfigKey, KeyPolicy};
///
/// let mut policy = KeyPolicy::new();
/// policy.register_deprecated("MODEL.OLD_FLAG").unwrap();
/// policy
///     .register_renamed("SOLVER.LR", "SOLVER.BASE_LR", Some("LR is now per group"))
///     .unwrap();
///
/// assert!(policy.is_deprecated(&ConfigKey::from("MODEL.OLD_FLAG")));
/// assert!(policy.is_renamed(&ConfigKey::from("SOLVER.LR")));
/// assert!(policy.register_deprecated("MODEL.OLD_FLAG").is_err());
/// ```
#[derive(Clone, Default)]
pub struct KeyPolicy {
    deprecated: BTreeSet<ConfigKey>,
    renamed: BTreeMap<ConfigKey, RenamedKey>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl KeyPolicy {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends deprecation events to `sink` in addition to the log.
    pub fn set_diagnostic_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sink = Some(sink);
    }

    /// Registers `key` as deprecated.
    ///
    /// Fails with [`ConfigError::DuplicateRegistration`] if it already is.
    pub fn register_deprecated(&mut self, key: impl Into<ConfigKey>) -> Result<()> {
        let key = key.into();
        if self.deprecated.contains(&key) {
            return Err(ConfigError::DuplicateRegistration {
                key: key.into_string(),
                kind: RegistrationKind::Deprecated,
            });
        }
        self.deprecated.insert(key);
        Ok(())
    }

    /// Registers `old_key` as renamed to `new_key`, with optional guidance.
    ///
    /// An empty message is treated as no message. Fails with
    /// [`ConfigError::DuplicateRegistration`] if `old_key` is already registered.
    pub fn register_renamed(
        &mut self,
        old_key: impl Into<ConfigKey>,
        new_key: impl Into<ConfigKey>,
        message: Option<&str>,
    ) -> Result<()> {
        let old_key = old_key.into();
        if self.renamed.contains_key(&old_key) {
            return Err(ConfigError::DuplicateRegistration {
                key: old_key.into_string(),
                kind: RegistrationKind::Renamed,
            });
        }
        let renamed = RenamedKey {
            new_key: new_key.into(),
            message: message.filter(|m| !m.is_empty()).map(str::to_string),
        };
        self.renamed.insert(old_key, renamed);
        Ok(())
    }

    /// Returns `true` if `key` is deprecated, warning that it will be ignored.
    pub fn is_deprecated(&self, key: &ConfigKey) -> bool {
        if !self.deprecated.contains(key) {
            return false;
        }
        tracing::warn!(key = %key, "Deprecated config key (ignoring): {}", key);
        if let Some(sink) = &self.sink {
            sink.emit(&Diagnostic::DeprecatedKeyIgnored { key: key.clone() });
        }
        true
    }

    /// Returns `true` if `key` has been renamed.
    pub fn is_renamed(&self, key: &ConfigKey) -> bool {
        self.renamed.contains_key(key)
    }

    /// Returns the replacement registered for `key`.
    pub fn renamed(&self, key: &ConfigKey) -> Option<&RenamedKey> {
        self.renamed.get(key)
    }

    /// Builds the error reported when an overlay uses the renamed `key`.
    ///
    /// An unregistered key yields [`ConfigError::UnknownKey`].
    pub fn rename_error(&self, key: &ConfigKey) -> ConfigError {
        match self.renamed.get(key) {
            Some(renamed) => ConfigError::KeyRenamed {
                old_key: key.to_string(),
                new_key: renamed.new_key.to_string(),
                message: renamed.message.clone(),
            },
            None => ConfigError::UnknownKey {
                key: key.to_string(),
            },
        }
    }

    /// Iterates over the deprecated keys in sorted order.
    pub fn deprecated_keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.deprecated.iter()
    }

    /// Iterates over the renamed keys and their replacements in sorted order.
    pub fn renamed_keys(&self) -> impl Iterator<Item = (&ConfigKey, &RenamedKey)> {
        self.renamed.iter()
    }
}

impl fmt::Debug for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPolicy")
            .field("deprecated", &self.deprecated)
            .field("renamed", &self.renamed)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl PartialEq for KeyPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.deprecated == other.deprecated && self.renamed == other.renamed
    }
}
