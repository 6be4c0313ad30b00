//! Run statistics.

/// Counters for one collection run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectStats {
    /// Files discovered under the walked student folders.
    pub found: u64,
    /// Files copied into the output folder.
    pub copied: u64,
}

impl CollectStats {
    /// Increment found count.
    pub fn increment_found(&mut self) {
        self.found += 1;
    }

    /// Increment copied count.
    pub fn increment_copied(&mut self) {
        self.copied += 1;
    }

    /// Add the counters of a single student.
    pub fn add(&mut self, other: &CollectStats) {
        self.found += other.found;
        self.copied += other.copied;
    }
}
