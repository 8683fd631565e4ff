//! Ordering of poll responses
//!
//! By default responses apply in the order they resolve, so a slow response
//! may land after a newer one. With strict ordering each fetch carries its
//! issue sequence and anything not newer than the last applied is dropped.

/// Filters out-of-order poll responses when enabled
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    strict: bool,
    last_applied: u64,
}

impl SequenceGate {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            last_applied: 0,
        }
    }

    /// Should a response issued as `seq` be applied? Records it if so.
    pub fn admit(&mut self, seq: u64) -> bool {
        if self.strict && seq <= self.last_applied {
            return false;
        }
        self.last_applied = self.last_applied.max(seq);
        true
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }
}
