//! Core range set algebra
//!
//! This module contains the range entities, the per-group overlap index
//! and the merge, intersect and subtract engines.

mod error;
mod grouping;
mod index;
mod intersect;
pub mod io;
mod merge;
mod range;
mod subtract;

pub use error::{RangeError, RangeResult, RangeSetError, Result};
pub use grouping::{RangeGroup, RangeGrouping};
pub use index::{GroupIndex, OverlapIndex, RangeInterval};
pub use intersect::{intersect, IntersectMode};
pub use merge::{merge, merge_pair};
pub use range::{overlap_len, Range, RangeMeta, Strand, MAX_COORD};
pub use subtract::{subtract, SubtractMode};
