//! # Entities

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Key rows inspected.
    pub keys_scanned: usize,
    /// Key rows deleted because their owner is missing or not committed.
    pub orphan_keys_removed: usize,
    /// Index entries deleted because they point at nothing.
    pub dangling_indexes_removed: usize,
}

impl ReconcileReport {
    /// True when the pass changed nothing.
    pub fn is_clean(&self) -> bool {
        self.orphan_keys_removed == 0 && self.dangling_indexes_removed == 0
    }
}
