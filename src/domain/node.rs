// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration tree node.
//!
//! A `CfgNode` maps string keys to [`ConfigValue`]s, any of which may itself be a
//! nested node. Node metadata (the mutability flag and the key policy registry)
//! lives beside the entries, never among them, so no configuration key can
//! collide with it.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::file_source;
use crate::domain::key_policy::{KeyPolicy, RenamedKey};
use crate::domain::merge;
use crate::ports::{ConfigParser, DiagnosticSink};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Index;
use std::path::Path;
use std::sync::Arc;

/// Per-node metadata, stored apart from the configuration entries.
#[derive(Clone, Debug, Default)]
struct NodeMeta {
    immutable: bool,
    policy: KeyPolicy,
}

/// One level of a configuration tree.
///
/// Keys iterate in sorted order. Cloning produces an independent deep copy.
/// Equality compares entries only; frozen state and key policies are ignored.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{CfgNode, ConfigValue};
///
/// let mut cfg = CfgNode::new()
///     .with("NAME", "resnet")
///     .with("SOLVER", CfgNode::new().with("BASE_LR", 0.1).with("STEPS", ConfigValue::tuple([30, 60])));
///
/// cfg.merge_from_list(&["SOLVER.BASE_LR", "0.01"]).unwrap();
/// assert_eq!(cfg.lookup("SOLVER.BASE_LR").unwrap(), &ConfigValue::Float(0.01));
///
/// cfg.freeze();
/// assert!(cfg.set("NAME", "vgg").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CfgNode {
    entries: BTreeMap<String, ConfigValue>,
    meta: NodeMeta,
}

impl CfgNode {
    /// Creates an empty, mutable node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry while building a node.
    ///
    /// Builder-style insert for fresh nodes; use [`CfgNode::set`] on a node
    /// that may be frozen.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub(crate) fn insert(&mut self, key: String, value: ConfigValue) {
        self.entries.insert(key, value);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the node has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the node has an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Returns the value stored under `name`, or an error naming it.
    ///
    /// This is the name-based view of the entries; it reads the same storage as
    /// [`CfgNode::get`].
    pub fn attr(&self, name: &str) -> Result<&ConfigValue> {
        self.entries
            .get(name)
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: name.to_string(),
            })
    }

    /// Returns the value at a dotted path such as `MODEL.BACKBONE.DEPTH`.
    pub fn lookup(&self, path: &str) -> Result<&ConfigValue> {
        let key = ConfigKey::from(path);
        let not_found = || ConfigError::ConfigKeyNotFound {
            key: path.to_string(),
        };
        let mut node = self;
        let mut segments = key.segments().peekable();
        while let Some(segment) = segments.next() {
            let value = node.entries.get(segment).ok_or_else(not_found)?;
            if segments.peek().is_none() {
                return Ok(value);
            }
            node = match value {
                ConfigValue::Node(child) => child,
                _ => return Err(not_found()),
            };
        }
        Err(not_found())
    }

    /// Returns the nested node stored under `key`.
    pub fn node(&self, key: &str) -> Option<&CfgNode> {
        match self.entries.get(key) {
            Some(ConfigValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns the nested node stored under `key` for modification.
    ///
    /// Handing out the child would let a caller replace it wholesale, so this
    /// fails with [`ConfigError::ImmutableWrite`] while this node is frozen. A
    /// missing key or a non-node value gives [`ConfigError::ConfigKeyNotFound`].
    pub fn node_mut(&mut self, key: &str) -> Result<&mut CfgNode> {
        if self.meta.immutable {
            let value = self
                .entries
                .get(key)
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(ConfigError::ImmutableWrite {
                key: key.to_string(),
                value,
            });
        }
        self.child_mut(key).ok_or_else(|| ConfigError::ConfigKeyNotFound {
            key: key.to_string(),
        })
    }

    /// Unguarded access to a nested node; writes into it still go through `set`.
    pub(crate) fn child_mut(&mut self, key: &str) -> Option<&mut CfgNode> {
        match self.entries.get_mut(key) {
            Some(ConfigValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Sets `key` to `value`, adding the key if needed.
    ///
    /// Fails with [`ConfigError::ImmutableWrite`] while the node is frozen.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        if self.meta.immutable {
            return Err(ConfigError::ImmutableWrite {
                key,
                value: value.to_string(),
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Makes this node and every node nested in it immutable.
    pub fn freeze(&mut self) {
        self.set_immutable(true);
    }

    /// Makes this node and every node nested in it mutable again.
    pub fn defrost(&mut self) {
        self.set_immutable(false);
    }

    /// Returns `true` while the node is frozen.
    pub fn is_frozen(&self) -> bool {
        self.meta.immutable
    }

    pub(crate) fn set_immutable(&mut self, immutable: bool) {
        self.meta.immutable = immutable;
        for value in self.entries.values_mut() {
            value.set_immutable(immutable);
        }
    }

    /// Returns the key policy registry of this node.
    pub fn key_policy(&self) -> &KeyPolicy {
        &self.meta.policy
    }

    /// Sends deprecation events raised by merges into this node to `sink`.
    pub fn set_diagnostic_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.meta.policy.set_diagnostic_sink(sink);
    }

    /// Registers a full key (e.g. `FOO.BAR`) as deprecated.
    ///
    /// Merging a deprecated key that the tree no longer defines logs a warning
    /// and skips it.
    pub fn register_deprecated_key(&mut self, key: impl Into<ConfigKey>) -> Result<()> {
        self.meta.policy.register_deprecated(key)
    }

    /// Registers a full key as renamed from `old_key` to `new_key`.
    ///
    /// Merging the old key fails with [`ConfigError::KeyRenamed`].
    pub fn register_renamed_key(
        &mut self,
        old_key: impl Into<ConfigKey>,
        new_key: impl Into<ConfigKey>,
        message: Option<&str>,
    ) -> Result<()> {
        self.meta.policy.register_renamed(old_key, new_key, message)
    }

    /// Returns `true` if `full_key` is deprecated, warning that it is ignored.
    pub fn key_is_deprecated(&self, full_key: &str) -> bool {
        self.meta.policy.is_deprecated(&ConfigKey::from(full_key))
    }

    /// Returns `true` if `full_key` has been renamed.
    pub fn key_is_renamed(&self, full_key: &str) -> bool {
        self.meta.policy.is_renamed(&ConfigKey::from(full_key))
    }

    /// Returns the replacement registered for `full_key`.
    pub fn renamed_key(&self, full_key: &str) -> Option<&RenamedKey> {
        self.meta.policy.renamed(&ConfigKey::from(full_key))
    }

    /// Builds the error reported when `full_key` is used after being renamed.
    pub fn key_rename_error(&self, full_key: &str) -> ConfigError {
        self.meta.policy.rename_error(&ConfigKey::from(full_key))
    }

    /// Merges `other` into this node, overwriting the values it specifies.
    ///
    /// Every key in `other` must already exist here. A failure leaves the keys
    /// processed before it applied; clone first to merge atomically.
    pub fn merge_from_other(&mut self, other: &CfgNode) -> Result<()> {
        let policy = self.meta.policy.clone();
        merge::merge_into(other, self, &policy, &ConfigKey::root())
    }

    /// Reads, parses and merges the file at `path`.
    ///
    /// I/O errors are returned unchanged as [`ConfigError::IoError`]; files over
    /// 10MB are refused with [`ConfigError::SourceError`].
    pub fn merge_from_file_with<P: AsRef<Path>>(
        &mut self,
        path: P,
        parser: &dyn ConfigParser,
    ) -> Result<()> {
        let content = file_source::read_config_file(path.as_ref())?;
        let overlay = parser.parse(&content)?;
        self.merge_from_other(&overlay)
    }

    /// Merges a flat list alternating dotted keys and values,
    /// e.g. `["SOLVER.BASE_LR", "0.5", "MODEL.NAME", "vgg"]`.
    ///
    /// An odd-length list fails with [`ConfigError::InvalidOverrideList`] before
    /// anything is merged.
    pub fn merge_from_list<S: AsRef<str>>(&mut self, list: &[S]) -> Result<()> {
        if list.len() % 2 != 0 {
            return Err(ConfigError::InvalidOverrideList { len: list.len() });
        }
        let pairs = list
            .chunks_exact(2)
            .map(|pair| (pair[0].as_ref(), ConfigValue::from(pair[1].as_ref())));
        self.merge_from_pairs(pairs)
    }

    /// Merges `(dotted key, value)` pairs in order.
    pub fn merge_from_pairs<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ConfigValue>,
    {
        let policy = self.meta.policy.clone();
        for (key, value) in pairs {
            merge::merge_pair(self, &ConfigKey::from(key.as_ref()), value.into(), &policy)?;
        }
        Ok(())
    }
}

impl PartialEq for CfgNode {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Index<&str> for CfgNode {
    type Output = ConfigValue;

    /// Panics if `key` is missing; use [`CfgNode::get`] or [`CfgNode::attr`]
    /// to handle that case.
    fn index(&self, key: &str) -> &ConfigValue {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("config key not found: {}", key),
        }
    }
}

impl<'a> IntoIterator for &'a CfgNode {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = btree_map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for CfgNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut node = CfgNode::new();
        for (key, value) in iter {
            node.entries.insert(key.into(), value.into());
        }
        node
    }
}

impl Serialize for CfgNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
