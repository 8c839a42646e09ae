//! Warning queue for collecting, deduplicating, and sorting generation
//! warnings.
//!
//! Rendering may run on several threads, each producing its own warnings.
//! The queue makes the final report independent of that: `flush` returns
//! warnings sorted by origin, so two runs over the same graph report the
//! same list in the same order.

use crate::GenerationWarning;

/// Queue of generation warnings.
///
/// # Example
///
/// ```text
/// let mut queue = WarningQueue::new();
/// queue.push(GenerationWarning::omitted(&err));
/// let sorted = queue.flush();
/// ```
#[derive(Debug, Default)]
pub struct WarningQueue {
    warnings: Vec<GenerationWarning>,
}

impl WarningQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
        self.warnings.extend(warnings);
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Take every queued warning, sorted, with exact duplicates dropped.
    pub fn flush(&mut self) -> Vec<GenerationWarning> {
        let mut warnings = std::mem::take(&mut self.warnings);
        warnings.sort();
        warnings.dedup();
        warnings
    }
}
