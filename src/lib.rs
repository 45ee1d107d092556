// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical configuration tree with schema-checked merging.
//!
//! A program declares its defaults as a tree of [`CfgNode`](domain::CfgNode)s.
//! Experiments then override those defaults from YAML files, other trees, or
//! flat `KEY VALUE` lists such as command-line arguments. The defaults act as
//! the schema: an override may only name keys that already exist, and each new
//! value must be type-compatible with the value it replaces. String overrides
//! are decoded as literals first, so `"0.5"` becomes a float and `"(1, 2)"` a
//! tuple. Once loaded, a tree can be frozen to reject further writes.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The tree, its values, the literal codec, the merge engine
//!   and the key policy registry (`CfgNode`, `ConfigValue`, `KeyPolicy`, errors)
//! - **Ports**: Trait definitions at the boundaries (`ConfigParser`, `DiagnosticSink`)
//! - **Adapters**: Implementations for YAML, command-line overrides and diagnostics
//! - **Service**: The layered loader that ties defaults and overrides together
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML parsing, rendering and file merging (default)
//! - `cli`: Enable `clap` override arguments (default, implies `yaml`)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use cfgtree::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut cfg = CfgNode::new()
//!     .with("MODEL", CfgNode::new().with("NAME", "resnet").with("DEPTH", 50))
//!     .with("SOLVER", CfgNode::new().with("BASE_LR", 0.1).with("STEPS", ConfigValue::tuple([30, 60])));
//!
//! cfg.merge_from_list(&["SOLVER.BASE_LR", "0.01", "SOLVER.STEPS", "[40, 80]"])?;
//! cfg.freeze();
//!
//! assert_eq!(cfg.lookup("SOLVER.BASE_LR")?, &ConfigValue::Float(0.01));
//! assert_eq!(cfg.lookup("SOLVER.STEPS")?, &ConfigValue::tuple([40, 80]));
//! assert!(cfg.set("SEED", 1).is_err());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        CfgNode, ConfigError, ConfigKey, ConfigValue, KeyPolicy, NumericArray, Result, ValueKind,
    };
    pub use crate::ports::{ConfigParser, Diagnostic, DiagnosticSink};
    pub use crate::service::ConfigLoader;

    pub use crate::adapters::CollectingSink;
    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::OverrideArgs;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
