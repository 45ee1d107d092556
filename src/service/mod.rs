// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer.
//!
//! This module contains [`ConfigLoader`], which assembles a configuration tree
//! from defaults plus an ordered list of files, text, trees and overrides.

pub mod loader;

// Re-export commonly used types
pub use loader::ConfigLoader;
