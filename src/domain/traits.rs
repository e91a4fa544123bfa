// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// concrete data readers in Layer 4 can be swapped, and so the
// use cases can be exercised against in-memory stand-ins.
//
// Implementations:
//   - AseDatabase    → counts rows of an ASE SQLite database
//   - FixedCount     → a known count, used in tests

use crate::errors::WorkflowError;

// ─── ConfigurationSource ──────────────────────────────────────────────────────
/// Anything that knows how many trajectory configurations it holds.
pub trait ConfigurationSource {
    /// Total number of configurations available for splitting.
    fn configuration_count(&self) -> Result<usize, WorkflowError>;
}

/// A source with a count fixed up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedCount(pub usize);

impl ConfigurationSource for FixedCount {
    fn configuration_count(&self) -> Result<usize, WorkflowError> {
        Ok(self.0)
    }
}
