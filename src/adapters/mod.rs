// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the YAML implementation of `ConfigParser`, the
//! command-line override arguments, and an in-memory `DiagnosticSink`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod diagnostics;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::OverrideArgs;
pub use diagnostics::CollectingSink;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
