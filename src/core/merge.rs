//! Merge engine
//!
//! Collapses overlapping or nearby ranges group by group. The `distance`
//! threshold decides when the next range joins the current run:
//!
//! - `distance == 0`: touching or overlapping ranges merge
//! - `distance > 0`: gaps of up to `distance` bases are bridged
//! - `distance < 0`: at least `|distance|` shared bases are required
//!
//! Each group is swept independently on the rayon pool.

use crate::core::grouping::{sorted_ranges, RangeGroup, RangeGrouping};
use crate::core::range::{Range, RangeMeta};
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::Arc;

/// Merge overlapping ranges within one grouping
///
/// # Examples
/// ```
/// use fast_rangeset::core::{merge, Range, RangeGrouping};
/// let grouping = RangeGrouping::from_ranges(vec![
///     Range::new("chr1", 0, 10).unwrap(),
///     Range::new("chr1", 11, 20).unwrap(),
/// ]);
/// assert_eq!(merge(&grouping, 0, false).range_count(), 2);
/// assert_eq!(merge(&grouping, 2, false).range_count(), 1);
/// ```
pub fn merge(grouping: &RangeGrouping, distance: i64, track_parents: bool) -> RangeGrouping {
    debug!(
        "merge: {} groups, {} ranges, distance={}, track_parents={}",
        grouping.len(),
        grouping.range_count(),
        distance,
        track_parents
    );

    let groups: Vec<&RangeGroup> = grouping.groups().collect();
    groups
        .par_iter()
        .map(|g| merge_group(g.group_id(), g.iter().cloned(), distance, track_parents))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Merge two groupings as if they were one multiset per group id
///
/// Groups present in only one input are merged against themselves. Output
/// group order is `a`'s ids followed by ids only found in `b`.
pub fn merge_pair(
    a: &RangeGrouping,
    b: &RangeGrouping,
    distance: i64,
    track_parents: bool,
) -> RangeGrouping {
    debug!(
        "merge_pair: {}+{} ranges, distance={}, track_parents={}",
        a.range_count(),
        b.range_count(),
        distance,
        track_parents
    );

    let mut ids: Vec<&str> = a.group_ids().collect();
    ids.extend(b.group_ids().filter(|id| !a.contains_group(id)));

    ids.par_iter()
        .map(|&id| {
            let from_a = a.group(id).into_iter().flat_map(|g| g.iter().cloned());
            let from_b = b.group(id).into_iter().flat_map(|g| g.iter().cloned());
            merge_group(id, from_a.chain(from_b), distance, track_parents)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Running accumulator of the sweep
struct Run {
    start: u64,
    end: u64,
    members: Vec<Arc<Range>>,
}

impl Run {
    fn open(first: Arc<Range>) -> Self {
        Self {
            start: first.start(),
            end: first.end(),
            members: vec![first],
        }
    }

    fn absorb(&mut self, range: Arc<Range>) {
        self.end = self.end.max(range.end());
        self.members.push(range);
    }

    /// Signed gap from the run's end to `range`; negative means overlap.
    /// Both coordinates are at most `MAX_COORD`.
    fn gap_to(&self, range: &Range) -> i64 {
        range.start() as i64 - self.end as i64
    }

    fn close(self, group_id: &str, track_parents: bool) -> Arc<Range> {
        // A run of one keeps its range's descriptive fields
        let meta = match self.members.as_slice() {
            [only] => only.meta().clone(),
            _ => RangeMeta::default(),
        };
        let parents = if track_parents { self.members } else { Vec::new() };
        Arc::new(Range::derived(group_id, self.start, self.end, meta, parents))
    }
}

fn merge_group(
    group_id: &str,
    ranges: impl IntoIterator<Item = Arc<Range>>,
    distance: i64,
    track_parents: bool,
) -> RangeGroup {
    let sorted = sorted_ranges(ranges);
    let input_len = sorted.len();
    let mut merged = Vec::new();
    let mut iter = sorted.into_iter();

    if let Some(first) = iter.next() {
        let mut run = Run::open(first);
        for range in iter {
            if run.gap_to(&range) <= distance {
                run.absorb(range);
            } else {
                let next = Run::open(range);
                merged.push(std::mem::replace(&mut run, next).close(group_id, track_parents));
            }
        }
        merged.push(run.close(group_id, track_parents));
    }

    trace!("merge {}: {} -> {} ranges", group_id, input_len, merged.len());
    RangeGroup::from_shared(group_id, merged)
}
