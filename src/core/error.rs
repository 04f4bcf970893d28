//! Error types for FastRangeSet
//!
//! The engines themselves never fail; errors only arise when building
//! ranges and groupings ([`RangeError`]) or when reading/writing BED files
//! ([`RangeSetError`]).

use crate::formats::bed::BedParseError;
use thiserror::Error;

/// Main error type for FastRangeSet operations
#[derive(Debug, Error)]
pub enum RangeSetError {
    /// BED parsing errors
    #[error("BED parse error: {0}")]
    BedParse(#[from] BedParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while constructing ranges and groups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Start lies after end
    #[error("Invalid coordinate range: start ({start}) > end ({end})")]
    InvalidRange { start: u64, end: u64 },

    /// Coordinate too large for signed overlap arithmetic
    #[error("Coordinate {value} exceeds the maximum of {max}")]
    CoordinateOverflow { value: u64, max: u64 },

    /// A range was added to a group with a different group id
    #[error("Range belongs to group '{found}', cannot be added to group '{expected}'")]
    GroupMismatch { expected: String, found: String },
}

/// Result type alias for FastRangeSet operations
pub type Result<T> = std::result::Result<T, RangeSetError>;

/// Result type alias for range construction
pub type RangeResult<T> = std::result::Result<T, RangeError>;
