// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted configuration key newtype.
//!
//! This module provides the `ConfigKey` type, a newtype wrapper around `String`
//! naming a location in the configuration tree, e.g. `SOLVER.BASE_LR`. The merge
//! engine builds full keys with [`ConfigKey::child`] while it descends.

use serde::Serialize;
use std::fmt;

/// A dotted path from the root of a configuration tree.
///
/// The empty key denotes the root itself.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::root().child("MODEL").child("DEPTH");
/// assert_eq!(key.as_str(), "MODEL.DEPTH");
/// assert_eq!(key.leaf(), "DEPTH");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the empty key naming the root of a tree.
    pub fn root() -> Self {
        ConfigKey(String::new())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` for the root key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key for `segment` nested under this key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::domain::config_key::ConfigKey;
    ///
    /// assert_eq!(ConfigKey::root().child("A").as_str(), "A");
    /// assert_eq!(ConfigKey::from("A").child("B").as_str(), "A.B");
    /// ```
    pub fn child(&self, segment: &str) -> ConfigKey {
        if self.0.is_empty() {
            ConfigKey(segment.to_string())
        } else {
            ConfigKey(format!("{}.{}", self.0, segment))
        }
    }

    /// Iterates over the path segments. The root key has no segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|_| !self.0.is_empty())
    }

    /// Returns the last path segment.
    pub fn leaf(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((_, leaf)) => leaf,
            None => &self.0,
        }
    }

    /// Returns the key one level up, or `None` for single-segment and root keys.
    pub fn parent(&self) -> Option<ConfigKey> {
        self.0
            .rsplit_once('.')
            .map(|(parent, _)| ConfigKey(parent.to_string()))
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<&ConfigKey> for ConfigKey {
    fn from(key: &ConfigKey) -> Self {
        key.clone()
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
