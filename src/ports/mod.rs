// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) through which the
//! configuration tree talks to the outside world: text formats and diagnostic
//! receivers. They are implemented by adapters in the adapters layer.

pub mod diagnostics;
pub mod parser;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use parser::ConfigParser;
