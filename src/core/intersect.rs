//! Intersect engine
//!
//! Reports where reference ranges overlap query ranges, either as the exact
//! shared pieces or as whole reference ranges. Only positive overlaps count;
//! `min_overlap` raises that bar further.

use crate::core::grouping::{sorted_ranges, RangeGroup, RangeGrouping};
use crate::core::index::GroupIndex;
use crate::core::range::Range;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::Arc;

/// Output granularity of [`intersect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectMode {
    /// One range per qualifying (reference, query) pair covering the shared bases
    #[default]
    Pieces,
    /// Each reference range with at least one qualifying overlap, once
    WholeIntervals,
}

/// Intersect `reference` with `query`
///
/// Groups missing from either side produce nothing. With `track_parents`,
/// a piece's parents are its reference and query range; a whole interval's
/// parents are the reference range followed by every qualifying query range.
///
/// # Examples
/// ```
/// use fast_rangeset::core::{intersect, IntersectMode, Range, RangeGrouping};
/// let reference = RangeGrouping::from_ranges(vec![Range::new("chr1", 10, 20).unwrap()]);
/// let query = RangeGrouping::from_ranges(vec![Range::new("chr1", 15, 25).unwrap()]);
/// let result = intersect(&reference, &query, 1, IntersectMode::Pieces, false);
/// let piece = &result.group("chr1").unwrap().ranges()[0];
/// assert_eq!((piece.start(), piece.end()), (15, 20));
/// ```
pub fn intersect(
    reference: &RangeGrouping,
    query: &RangeGrouping,
    min_overlap: i64,
    mode: IntersectMode,
    track_parents: bool,
) -> RangeGrouping {
    debug!(
        "intersect: {} reference ranges, {} query ranges, min_overlap={}, mode={:?}, track_parents={}",
        reference.range_count(),
        query.range_count(),
        min_overlap,
        mode,
        track_parents
    );

    // Zero-length or touching pairs never intersect
    let threshold = min_overlap.max(1);

    let shared: Vec<(&RangeGroup, &RangeGroup)> = reference
        .groups()
        .filter_map(|r| query.group(r.group_id()).map(|q| (r, q)))
        .collect();

    shared
        .par_iter()
        .map(|&(r, q)| intersect_group(r, q, threshold, mode, track_parents))
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn intersect_group(
    reference: &RangeGroup,
    query: &RangeGroup,
    threshold: i64,
    mode: IntersectMode,
    track_parents: bool,
) -> RangeGroup {
    let group_id = reference.group_id();
    let index = GroupIndex::new(query.iter().cloned());
    let mut out: Vec<Arc<Range>> = Vec::new();

    for r in reference.sorted() {
        let hits = index.qualifying(&r, threshold);
        if hits.is_empty() {
            continue;
        }

        match mode {
            IntersectMode::Pieces => {
                for q in hits {
                    let Some((start, end)) = r.intersection(q) else {
                        continue;
                    };
                    let parents = if track_parents {
                        vec![Arc::clone(&r), Arc::clone(q)]
                    } else {
                        Vec::new()
                    };
                    out.push(Arc::new(Range::derived(
                        group_id,
                        start,
                        end,
                        r.meta().clone(),
                        parents,
                    )));
                }
            }
            IntersectMode::WholeIntervals => {
                let parents = if track_parents {
                    std::iter::once(Arc::clone(&r))
                        .chain(hits.into_iter().cloned())
                        .collect()
                } else {
                    Vec::new()
                };
                out.push(Arc::new(Range::derived(
                    group_id,
                    r.start(),
                    r.end(),
                    r.meta().clone(),
                    parents,
                )));
            }
        }
    }

    trace!(
        "intersect {}: {} x {} -> {} ranges",
        group_id,
        reference.len(),
        query.len(),
        out.len()
    );
    RangeGroup::from_shared(group_id, sorted_ranges(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouping(ranges: &[(&str, u64, u64)]) -> RangeGrouping {
        RangeGrouping::from_ranges(
            ranges
                .iter()
                .map(|&(chrom, start, end)| Range::new(chrom, start, end).unwrap()),
        )
    }

    fn coords(grouping: &RangeGrouping, group_id: &str) -> Vec<(u64, u64)> {
        grouping
            .group(group_id)
            .map(|g| g.iter().map(|r| (r.start(), r.end())).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_intersect_pieces_basic() {
        let reference = grouping(&[("chr1", 10, 20)]);
        let query = grouping(&[("chr1", 15, 25)]);
        let result = intersect(&reference, &query, 1, IntersectMode::Pieces, false);
        assert_eq!(coords(&result, "chr1"), vec![(15, 20)]);
    }

    #[test]
    fn test_intersect_pieces_multiple_queries() {
        let reference = grouping(&[("chr1", 0, 100)]);
        let query = grouping(&[("chr1", 80, 120), ("chr1", 10, 20), ("chr1", 15, 30)]);
        let result = intersect(&reference, &query, 1, IntersectMode::Pieces, false);
        assert_eq!(coords(&result, "chr1"), vec![(10, 20), (15, 30), (80, 100)]);
    }

    #[test]
    fn test_intersect_whole_intervals_dedup() {
        let reference = grouping(&[("chr1", 0, 100), ("chr1", 200, 300)]);
        let query = grouping(&[("chr1", 10, 20), ("chr1", 50, 60)]);
        let result = intersect(&reference, &query, 1, IntersectMode::WholeIntervals, false);
        assert_eq!(coords(&result, "chr1"), vec![(0, 100)]);
    }

    #[test]
    fn test_intersect_touching_never_counts() {
        let reference = grouping(&[("chr1", 0, 10)]);
        let query = grouping(&[("chr1", 10, 20)]);
        for min_overlap in [-5, 0, 1] {
            let result = intersect(&reference, &query, min_overlap, IntersectMode::Pieces, false);
            assert!(result.is_empty(), "min_overlap={}", min_overlap);
        }
    }

    #[test]
    fn test_intersect_min_overlap_threshold() {
        let reference = grouping(&[("chr1", 0, 10), ("chr1", 20, 30)]);
        let query = grouping(&[("chr1", 7, 23)]);
        // 3 bases with the first reference range, 3 with the second
        let at3 = intersect(&reference, &query, 3, IntersectMode::WholeIntervals, false);
        let at4 = intersect(&reference, &query, 4, IntersectMode::WholeIntervals, false);
        assert_eq!(coords(&at3, "chr1"), vec![(0, 10), (20, 30)]);
        assert!(at4.is_empty());
    }

    #[test]
    fn test_intersect_unshared_groups_dropped() {
        let reference = grouping(&[("chr1", 0, 10), ("chr2", 0, 10)]);
        let query = grouping(&[("chr2", 5, 15), ("chr3", 0, 10)]);
        let result = intersect(&reference, &query, 1, IntersectMode::Pieces, false);
        let ids: Vec<&str> = result.group_ids().collect();
        assert_eq!(ids, vec!["chr2"]);
        assert_eq!(coords(&result, "chr2"), vec![(5, 10)]);
    }

    #[test]
    fn test_intersect_piece_parents() {
        let reference = grouping(&[("chr1", 10, 20)]);
        let query = grouping(&[("chr1", 15, 25)]);
        let result = intersect(&reference, &query, 1, IntersectMode::Pieces, true);
        let piece = &result.group("chr1").unwrap().ranges()[0];
        assert_eq!(piece.parents().len(), 2);
        assert!(Arc::ptr_eq(&piece.parents()[0], &reference.group("chr1").unwrap().ranges()[0]));
        assert!(Arc::ptr_eq(&piece.parents()[1], &query.group("chr1").unwrap().ranges()[0]));
    }

    #[test]
    fn test_intersect_whole_interval_parents() {
        let reference = grouping(&[("chr1", 0, 100)]);
        let query = grouping(&[("chr1", 50, 60), ("chr1", 10, 20), ("chr1", 200, 210)]);
        let result = intersect(&reference, &query, 1, IntersectMode::WholeIntervals, true);
        let whole = &result.group("chr1").unwrap().ranges()[0];
        let parents: Vec<(u64, u64)> = whole.parents().iter().map(|p| (p.start(), p.end())).collect();
        assert_eq!(parents, vec![(0, 100), (10, 20), (50, 60)]);
    }

    #[test]
    fn test_intersect_keeps_reference_metadata() {
        let reference = RangeGrouping::from_ranges(vec![Range::new("chr1", 0, 10).unwrap().with_name("exon1")]);
        let query = grouping(&[("chr1", 5, 15)]);
        let result = intersect(&reference, &query, 1, IntersectMode::Pieces, false);
        let piece = &result.group("chr1").unwrap().ranges()[0];
        assert_eq!(piece.name(), Some("exon1"));
        assert!(piece.parents().is_empty());
    }
}
