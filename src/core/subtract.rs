//! Subtract engine
//!
//! Removes query coverage from reference ranges. A query range qualifies
//! against a reference range when their signed overlap is at least
//! `min_overlap`; with a non-positive threshold, touching ranges and ranges
//! within `|min_overlap|` bases qualify too, but only shared bases are ever
//! cut out of a reference range.

use crate::core::grouping::{sorted_ranges, RangeGroup, RangeGrouping};
use crate::core::index::GroupIndex;
use crate::core::range::Range;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::Arc;

/// Output granularity of [`subtract`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtractMode {
    /// Keep only reference ranges with no qualifying overlap
    #[default]
    DropOverlapping,
    /// Keep the parts of each reference range not covered by qualifying queries
    Pieces,
}

/// Subtract `query` from `reference`
///
/// Reference groups absent from `query` pass through unchanged. With
/// `track_parents`, every output range lists its reference range followed by
/// the qualifying query ranges.
///
/// # Examples
/// ```
/// use fast_rangeset::core::{subtract, SubtractMode, Range, RangeGrouping};
/// let reference = RangeGrouping::from_ranges(vec![Range::new("chr1", 10, 20).unwrap()]);
/// let query = RangeGrouping::from_ranges(vec![Range::new("chr1", 15, 25).unwrap()]);
/// let result = subtract(&reference, &query, 1, SubtractMode::Pieces, false);
/// let piece = &result.group("chr1").unwrap().ranges()[0];
/// assert_eq!((piece.start(), piece.end()), (10, 15));
/// ```
pub fn subtract(
    reference: &RangeGrouping,
    query: &RangeGrouping,
    min_overlap: i64,
    mode: SubtractMode,
    track_parents: bool,
) -> RangeGrouping {
    debug!(
        "subtract: {} reference ranges, {} query ranges, min_overlap={}, mode={:?}, track_parents={}",
        reference.range_count(),
        query.range_count(),
        min_overlap,
        mode,
        track_parents
    );

    let groups: Vec<&RangeGroup> = reference.groups().collect();
    groups
        .par_iter()
        .map(|r| {
            let index = query.group(r.group_id()).map(|q| GroupIndex::new(q.iter().cloned()));
            subtract_group(r, index.as_ref(), min_overlap, mode, track_parents)
        })
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn subtract_group(
    reference: &RangeGroup,
    index: Option<&GroupIndex>,
    min_overlap: i64,
    mode: SubtractMode,
    track_parents: bool,
) -> RangeGroup {
    let group_id = reference.group_id();
    let mut out: Vec<Arc<Range>> = Vec::new();

    for r in reference.sorted() {
        let hits = index
            .map(|idx| idx.qualifying(&r, min_overlap))
            .unwrap_or_default();

        let parents: Vec<Arc<Range>> = if track_parents {
            std::iter::once(Arc::clone(&r))
                .chain(hits.iter().map(|&q| Arc::clone(q)))
                .collect()
        } else {
            Vec::new()
        };

        let pieces = if hits.is_empty() {
            vec![(r.start(), r.end())]
        } else {
            match mode {
                SubtractMode::DropOverlapping => Vec::new(),
                SubtractMode::Pieces => remaining_pieces(&r, &hits),
            }
        };

        for (start, end) in pieces {
            out.push(Arc::new(Range::derived(
                group_id,
                start,
                end,
                r.meta().clone(),
                parents.clone(),
            )));
        }
    }

    trace!("subtract {}: {} -> {} ranges", group_id, reference.len(), out.len());
    RangeGroup::from_shared(group_id, sorted_ranges(out))
}

/// Maximal sub-ranges of `range` not covered by any of `cuts`
///
/// `cuts` must be sorted by start. Only cuts sharing bases with `range` move
/// the cursor, so touching, zero-length and near-miss cuts leave it whole.
/// A zero-length range is never split.
fn remaining_pieces(range: &Range, cuts: &[&Arc<Range>]) -> Vec<(u64, u64)> {
    if range.is_empty() {
        return vec![(range.start(), range.end())];
    }

    let mut pieces = Vec::new();
    let mut cursor = range.start();

    for cut in cuts {
        let Some((stop, resume)) = range.intersection(cut) else {
            continue;
        };
        if stop > cursor {
            pieces.push((cursor, stop));
        }
        cursor = cursor.max(resume);
    }

    if cursor < range.end() {
        pieces.push((cursor, range.end()));
    }
    pieces
}
