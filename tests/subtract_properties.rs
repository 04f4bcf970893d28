//! Property-based tests for the subtract engine
//!
//! The central check is that subtract pieces and intersect pieces of the
//! same reference range tile it exactly.

use fast_rangeset::{intersect, subtract, IntersectMode, Range, RangeGrouping, SubtractMode};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn arb_chrom() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("chr1".to_string()),
        Just("chr2".to_string()),
        Just("chr3".to_string()),
    ]
}

fn arb_grouping() -> impl Strategy<Value = RangeGrouping> {
    prop::collection::vec((arb_chrom(), 0u64..300, 0u64..50), 0..25).prop_map(|specs| {
        RangeGrouping::from_ranges(
            specs
                .into_iter()
                .map(|(chrom, start, len)| Range::new(chrom, start, start + len).unwrap()),
        )
    })
}

/// Bases covered by output ranges derived from `source`
fn bases_from(result: &RangeGrouping, source: &Arc<Range>) -> Vec<u64> {
    result
        .group(source.group_id())
        .map(|g| {
            g.iter()
                .filter(|piece| Arc::ptr_eq(&piece.parents()[0], source))
                .flat_map(|piece| piece.start()..piece.end())
                .collect()
        })
        .unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Subtract pieces and intersect pieces partition every reference range
    #[test]
    fn prop_subtract_intersect_complement(reference in arb_grouping(), query in arb_grouping()) {
        let removed = intersect(&reference, &query, 0, IntersectMode::Pieces, true);
        let kept = subtract(&reference, &query, 0, SubtractMode::Pieces, true);

        for r in reference.flatten() {
            let kept_bases = bases_from(&kept, &r);
            let kept_set: BTreeSet<u64> = kept_bases.iter().copied().collect();
            prop_assert_eq!(kept_set.len(), kept_bases.len(), "subtract pieces overlap");

            let removed_set: BTreeSet<u64> = bases_from(&removed, &r).into_iter().collect();
            prop_assert!(kept_set.is_disjoint(&removed_set));

            let union: BTreeSet<u64> = kept_set.union(&removed_set).copied().collect();
            let expected: BTreeSet<u64> = (r.start()..r.end()).collect();
            prop_assert_eq!(union, expected, "reference {} not reconstructed", r);
        }
    }

    /// Pieces of one reference range are maximal: neighbours never touch
    #[test]
    fn prop_subtract_pieces_maximal(
        reference in arb_grouping(),
        query in arb_grouping(),
        min_overlap in -5i64..5,
    ) {
        let kept = subtract(&reference, &query, min_overlap, SubtractMode::Pieces, true);
        for r in reference.flatten() {
            let pieces: Vec<(u64, u64)> = kept
                .group(r.group_id())
                .map(|g| {
                    g.iter()
                        .filter(|piece| Arc::ptr_eq(&piece.parents()[0], &r))
                        .map(|piece| (piece.start(), piece.end()))
                        .collect()
                })
                .unwrap_or_default();
            for pair in pieces.windows(2) {
                prop_assert!(
                    pair[0].1 < pair[1].0,
                    "pieces {:?} and {:?} of {} should be one range",
                    pair[0], pair[1], r
                );
            }
        }
    }

    /// Drop mode keeps exactly the references without a qualifying overlap
    #[test]
    fn prop_drop_matches_brute_force(
        reference in arb_grouping(),
        query in arb_grouping(),
        min_overlap in -5i64..10,
    ) {
        let result = subtract(&reference, &query, min_overlap, SubtractMode::DropOverlapping, true);
        let mut expected: Vec<(String, u64, u64)> = reference
            .flatten()
            .iter()
            .filter(|r| {
                !query
                    .group(r.group_id())
                    .map(|g| g.iter().any(|q| r.overlap_len(q) >= min_overlap))
                    .unwrap_or(false)
            })
            .map(|r| (r.group_id().to_string(), r.start(), r.end()))
            .collect();

        let mut actual: Vec<(String, u64, u64)> = result
            .flatten()
            .iter()
            .map(|r| (r.group_id().to_string(), r.start(), r.end()))
            .collect();
        actual.sort();
        expected.sort();
        prop_assert_eq!(actual, expected);

        for out in result.flatten() {
            prop_assert_eq!(out.parents().len(), 1);
        }
    }

    /// Pieces stay inside their reference and never overlap a qualifying query
    #[test]
    fn prop_pieces_avoid_queries(
        reference in arb_grouping(),
        query in arb_grouping(),
        min_overlap in 1i64..10,
    ) {
        let result = subtract(&reference, &query, min_overlap, SubtractMode::Pieces, true);
        for piece in result.flatten() {
            let source = &piece.parents()[0];
            prop_assert!(source.start() <= piece.start() && piece.end() <= source.end());
            for q in &piece.parents()[1..] {
                prop_assert!(source.overlap_len(q) >= min_overlap);
                prop_assert!(piece.overlap_len(q) <= 0, "{} still overlaps {}", piece, q);
            }
        }
    }

    /// Without tracking, parents stay empty
    #[test]
    fn prop_untracked_has_no_parents(reference in arb_grouping(), query in arb_grouping()) {
        for mode in [SubtractMode::DropOverlapping, SubtractMode::Pieces] {
            let result = subtract(&reference, &query, 1, mode, false);
            prop_assert!(result.flatten().iter().all(|r| r.parents().is_empty()));
        }
    }
}

#[test]
fn test_subtract_example() {
    let reference = RangeGrouping::from_ranges(vec![Range::new("chr1", 10, 20).unwrap()]);
    let query = RangeGrouping::from_ranges(vec![Range::new("chr1", 15, 25).unwrap()]);
    let result = subtract(&reference, &query, 1, SubtractMode::Pieces, false);
    let piece = &result.group("chr1").unwrap().ranges()[0];
    assert_eq!((piece.start(), piece.end()), (10, 15));
    assert_eq!(result.range_count(), 1);
}

#[test]
fn test_subtract_empty_query_keeps_everything() {
    let reference = RangeGrouping::from_ranges(vec![
        Range::new("chr1", 0, 10).unwrap(),
        Range::new("chr2", 3, 4).unwrap(),
    ]);
    let result = subtract(&reference, &RangeGrouping::new(), 1, SubtractMode::DropOverlapping, false);
    assert_eq!(result.range_count(), 2);
    let ids: Vec<&str> = result.group_ids().collect();
    assert_eq!(ids, vec!["chr1", "chr2"]);
}
