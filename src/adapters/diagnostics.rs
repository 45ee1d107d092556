// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory diagnostic sink.

use crate::ports::{Diagnostic, DiagnosticSink};
use std::sync::RwLock;

/// A [`DiagnosticSink`] that keeps every event in memory.
///
/// Useful in tests and for reporting ignored keys after a load.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::CollectingSink;
/// use cfgtree::domain::CfgNode;
/// use std::sync::Arc;
///
/// let sink = Arc::new(CollectingSink::new());
/// let mut cfg = CfgNode::new().with("SEED", 0);
/// cfg.set_diagnostic_sink(sink.clone());
/// cfg.register_deprecated_key("OLD_SEED").unwrap();
///
/// cfg.merge_from_list(&["OLD_SEED", "1"]).unwrap();
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: RwLock<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the number of events received so far.
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    /// Returns `true` if no event has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards all received events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(mut events) = self.events.write() {
            events.push(diagnostic.clone());
        }
    }
}
