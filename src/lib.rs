//! FastRangeSet - genomic interval set algebra
//!
//! Merge, intersect and subtract chromosome-grouped coordinate ranges with
//! configurable overlap thresholds and optional provenance tracking.
//!
//! # Features
//!
//! - Immutable ranges; every operation allocates a fresh grouping
//! - Per-chromosome sweeps run in parallel with rayon
//! - Interval lookups backed by rust-lapper
//! - BED input (plain, gzip, bzip2) and output
//!
//! # Example
//!
//! ```
//! use fast_rangeset::{intersect, IntersectMode, Range, RangeGrouping};
//!
//! let reference = RangeGrouping::from_ranges(vec![Range::new("chr1", 10, 20)?]);
//! let query = RangeGrouping::from_ranges(vec![Range::new("chr1", 15, 25)?]);
//!
//! let overlap = intersect(&reference, &query, 1, IntersectMode::Pieces, true);
//! let piece = &overlap.group("chr1").unwrap().ranges()[0];
//! assert_eq!((piece.start(), piece.end()), (15, 20));
//! assert_eq!(piece.parents().len(), 2);
//! # Ok::<(), fast_rangeset::RangeError>(())
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    intersect, merge, merge_pair, subtract, IntersectMode, Range, RangeError, RangeGroup,
    RangeGrouping, RangeMeta, RangeSetError, Strand, SubtractMode,
};
pub use formats::bed;
