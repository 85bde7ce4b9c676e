//! The framework's small, fatal error taxonomy.
//!
//! Every variant here corresponds to a spec-contract violation or a
//! resource exhaustion, never a recoverable runtime condition; specs
//! that need to express "no valid continuation" do so by returning
//! the false terminal from `get_root`/`get_child`, not by propagating
//! an error. `Display`/`Error` are implemented by hand, matching this
//! codebase's own low-level crates, to keep the dependency footprint
//! the same shape as the rest of the corpus.
use std::fmt;

/// A fatal condition raised while building, subsetting, reducing, or
/// sweeping a diagram.
#[derive(Debug)]
pub enum DdError {
    /// A `PodArrayDdSpec` was consulted before its array size was set.
    ArraySizeNotSet,
    /// An internal row index exceeded the packed `NodeId` row width.
    RowOverflow { row: u64, max: u32 },
    /// `get_child` returned a level that did not strictly decrease.
    ChildLevelMonotonicity { level: u32, returned: i64 },
    /// An arena pool could not grow.
    AllocationFailure { requested: usize },
}

impl fmt::Display for DdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DdError::ArraySizeNotSet => {
                write!(f, "array-typed spec consulted before set_array_size")
            }
            DdError::RowOverflow { row, max } => {
                write!(f, "row {row} exceeds the maximum representable row {max}")
            }
            DdError::ChildLevelMonotonicity { level, returned } => write!(
                f,
                "get_child at level {level} returned non-decreasing level {returned}"
            ),
            DdError::AllocationFailure { requested } => {
                write!(f, "arena allocation of {requested} bytes failed")
            }
        }
    }
}

impl std::error::Error for DdError {}

/// Convenience alias used throughout the crate's fallible entry points.
pub type Result<T> = std::result::Result<T, DdError>;
