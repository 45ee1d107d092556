// SPDX-License-Identifier: MIT OR Apache-2.0

//! The merge engine.
//!
//! Merging overwrites values of an existing tree with the values of an overlay.
//! The target acts as the schema: an overlay may only name keys the target
//! already defines, and each replacement must be type-compatible with the value
//! it replaces. The key policy of the merge root decides what happens to keys
//! the target does not define.
//!
//! Merges are not transactional. When a key fails, keys processed before it
//! remain applied.

use crate::domain::codec::decode;
use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::key_policy::KeyPolicy;
use crate::domain::node::CfgNode;
use crate::domain::reconcile::reconcile;

/// Recursively merges `overlay` into `target`.
///
/// `prefix` is the full key of `target` relative to the merge root (the root key
/// for a top-level merge) and `policy` is the root's key policy registry.
///
/// For each overlay key absent from `target`: a deprecated key is skipped with
/// a warning, a renamed key fails with [`ConfigError::KeyRenamed`], and any other
/// key fails with [`ConfigError::UnknownKey`]. A renamed key that `target`
/// still defines fails as well. Present keys are decoded,
/// reconciled against the existing value, and either merged recursively (nodes)
/// or assigned.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::merge::merge_into;
/// use cfgtree::domain::{CfgNode, ConfigKey, KeyPolicy};
///
/// let mut target = CfgNode::new().with("A", CfgNode::new().with("B", 1).with("C", 2));
/// let overlay = CfgNode::new().with("A", CfgNode::new().with("B", 5));
///
/// merge_into(&overlay, &mut target, &KeyPolicy::new(), &ConfigKey::root()).unwrap();
///
/// let expected = CfgNode::new().with("A", CfgNode::new().with("B", 5).with("C", 2));
/// assert_eq!(target, expected);
/// ```
pub fn merge_into(
    overlay: &CfgNode,
    target: &mut CfgNode,
    policy: &KeyPolicy,
    prefix: &ConfigKey,
) -> Result<()> {
    for (key, raw) in overlay {
        let full_key = prefix.child(key);

        let Some(existing) = target.get(key) else {
            if policy.is_deprecated(&full_key) {
                continue;
            }
            if policy.is_renamed(&full_key) {
                return Err(policy.rename_error(&full_key));
            }
            return Err(ConfigError::UnknownKey {
                key: full_key.into_string(),
            });
        };
        if policy.is_renamed(&full_key) {
            return Err(policy.rename_error(&full_key));
        }

        let value = reconcile(decode(raw.clone()), existing, &full_key)?;
        tracing::trace!("Merging config key '{}'", full_key);
        assign(target, key, value, policy, &full_key)?;
    }
    Ok(())
}

/// Merges one `(dotted key, raw value)` override into `root`.
///
/// Every segment of `full_key` must already exist in `root`; intermediate
/// segments must name nodes.
pub fn merge_pair(
    root: &mut CfgNode,
    full_key: &ConfigKey,
    raw: ConfigValue,
    policy: &KeyPolicy,
) -> Result<()> {
    if policy.is_deprecated(full_key) {
        return Ok(());
    }
    if policy.is_renamed(full_key) {
        return Err(policy.rename_error(full_key));
    }

    let unknown = || ConfigError::UnknownKey {
        key: full_key.to_string(),
    };
    let leaf = full_key.leaf();
    let mut node = root;
    if let Some(parent) = full_key.parent() {
        for segment in parent.segments() {
            node = node.child_mut(segment).ok_or_else(unknown)?;
        }
    }

    let existing = node.get(leaf).ok_or_else(unknown)?;
    let value = reconcile(decode(raw), existing, full_key)?;
    tracing::trace!("Merging override '{}'", full_key);
    assign(node, leaf, value, policy, full_key)
}

/// Stores a reconciled value, descending into nested nodes so that an overlay
/// node never replaces the target node wholesale.
fn assign(
    target: &mut CfgNode,
    key: &str,
    value: ConfigValue,
    policy: &KeyPolicy,
    full_key: &ConfigKey,
) -> Result<()> {
    if let ConfigValue::Node(overlay) = &value {
        if let Some(child) = target.child_mut(key) {
            return merge_into(overlay, child, policy, full_key);
        }
    }
    target.set(key, value)
}
