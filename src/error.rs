//! Error handling

use thiserror::Error;

/// The closed set of ways a table operation or a simplifier run can fail.
///
/// Every fallible entry point in this crate returns `Result<_, TskitError>`.
/// None of these are recovered internally: the caller owns recovery, and
/// partial mutation of output tables on failure is permitted (callers
/// should `reset` or `free` before reuse).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TskitError {
    /// Allocation failure while growing a table's row or payload capacity,
    /// an arena's chunk storage, or an ordered map's node storage.
    #[error("allocation failure")]
    NoMemory,
    /// Bad input was encountered: a null/missing required column, a zero
    /// growth increment, or a parameter violating a documented precondition
    /// (e.g. `num_samples < 2`, empty input tables).
    #[error("bad parameter: {reason}")]
    BadParam {
        /// Human-readable description of what was wrong.
        reason: &'static str,
    },
    /// An id (node, site, or parent) fell outside the valid range for the
    /// table it indexes into.
    #[error("id out of bounds: {reason}")]
    OutOfBounds {
        /// Human-readable description of which id/table was involved.
        reason: &'static str,
    },
    /// The sample list passed to [`crate::simplify::simplify`] contained the
    /// same node id more than once.
    #[error("duplicate sample id")]
    DuplicateSample,
    /// A node listed as a sample did not have
    /// [`crate::NodeFlags::IS_SAMPLE`] set.
    #[error("sample id lacks the IS_SAMPLE flag")]
    BadSamples,
    /// Edgesets were not encountered in non-decreasing parent-time order
    /// while streaming the main simplification loop. The table sorter
    /// should have prevented this; seeing it means the input violated the
    /// sorter's postcondition or was never sorted.
    #[error("edgesets are not sorted by parent time")]
    RecordsNotTimeSorted,
    /// Catch-all for invariant violations not covered by the other
    /// variants.
    #[error("{0}")]
    Generic(&'static str),
}

pub type TskResult<T> = Result<T, TskitError>;
