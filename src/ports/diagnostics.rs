// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic sink trait definition.
//!
//! This module defines the `DiagnosticSink` trait, which receives the non-fatal
//! events produced while merging, such as a deprecated key being ignored.
//! Every event is also logged through `tracing`; a sink lets callers observe the
//! events directly.

use crate::domain::ConfigKey;
use serde::Serialize;

/// A non-fatal event raised while merging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Diagnostic {
    /// An overlay named a deprecated key; the key was skipped.
    DeprecatedKeyIgnored {
        /// The full dotted key
        key: ConfigKey,
    },
}

/// A receiver for [`Diagnostic`] events.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a configured tree can be moved to
/// another thread.
///
/// # Examples
///
/// ```rust
/// use cfgtree::ports::{Diagnostic, DiagnosticSink};
///
/// #[derive(Debug)]
/// struct StderrSink;
///
/// impl DiagnosticSink for StderrSink {
///     fn emit(&self, diagnostic: &Diagnostic) {
///         eprintln!("{:?}", diagnostic);
///     }
/// }
/// ```
pub trait DiagnosticSink: Send + Sync + std::fmt::Debug {
    /// Receives one event. Must not panic.
    fn emit(&self, diagnostic: &Diagnostic);
}
