// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the configuration tree and the merge-and-validate
//! engine: value decoding, type reconciliation, the key policy registry and the
//! recursive merge. It is independent of any text format or file system.

pub mod array;
pub mod codec;
pub mod config_key;
pub mod config_value;
pub mod errors;
pub(crate) mod file_source;
pub mod key_policy;
pub mod literal;
pub mod merge;
pub mod node;
pub mod reconcile;

// Re-export commonly used types
pub use array::{ArrayDtype, NumericArray};
pub use codec::{decode, Decoded};
pub use config_key::ConfigKey;
pub use config_value::{ConfigValue, ValueKind};
pub use errors::{ConfigError, RegistrationKind, Result};
pub use key_policy::{KeyPolicy, RenamedKey};
pub use node::CfgNode;
