//! Interval index for overlap queries
//!
//! Uses rust-lapper for O(log n + k) interval queries, one tree per group id.
//! Queries take a minimum overlap that may be zero or negative, in which case
//! touching ranges and ranges separated by a small gap are reported too.

use crate::core::grouping::{sorted_ranges, RangeGrouping};
use crate::core::range::Range;
use rust_lapper::{Interval, Lapper};
use std::collections::HashMap;
use std::sync::Arc;

/// Lapper cannot report an interval whose stop is 0 when the search window
/// also starts at 0, so coordinates are stored shifted by this amount.
const COORD_SHIFT: u64 = 1;

/// Interval value: position of the range in [`GroupIndex::ranges`]
pub type RangeInterval = Interval<u64, usize>;

/// Overlap index over the ranges of one group
pub struct GroupIndex {
    /// Ranges sorted by (start, end, input order)
    ranges: Vec<Arc<Range>>,
    lapper: Lapper<u64, usize>,
}

impl GroupIndex {
    pub fn new(ranges: impl IntoIterator<Item = Arc<Range>>) -> Self {
        let ranges = sorted_ranges(ranges);
        let intervals: Vec<RangeInterval> = ranges
            .iter()
            .enumerate()
            .map(|(pos, r)| Interval {
                start: r.start().saturating_add(COORD_SHIFT),
                stop: r.end().saturating_add(COORD_SHIFT),
                val: pos,
            })
            .collect();

        Self {
            ranges,
            lapper: Lapper::new(intervals),
        }
    }

    /// Indexed ranges in sweep order
    pub fn ranges(&self) -> &[Arc<Range>] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges whose signed overlap with `range` is at least `min_overlap`
    ///
    /// Results come back in sweep order (start, end, input order).
    pub fn qualifying(&self, range: &Range, min_overlap: i64) -> Vec<&Arc<Range>> {
        // A gap of g bases has overlap -g, so the window must reach
        // 1 - min_overlap bases past each end to see every candidate.
        let slack = 1i64.saturating_sub(min_overlap).max(0) as u64;
        let lo = range
            .start()
            .saturating_add(COORD_SHIFT)
            .saturating_sub(slack);
        let hi = range
            .end()
            .saturating_add(COORD_SHIFT)
            .saturating_add(slack);

        let mut hits: Vec<usize> = self
            .lapper
            .find(lo, hi)
            .map(|iv| iv.val)
            .filter(|&pos| range.overlap_len(&self.ranges[pos]) >= min_overlap)
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|pos| &self.ranges[pos]).collect()
    }
}

/// Overlap index organized by group id
pub struct OverlapIndex {
    maps: HashMap<String, GroupIndex>,
}

impl OverlapIndex {
    /// Build one interval tree per group of `grouping`
    pub fn from_grouping(grouping: &RangeGrouping) -> Self {
        let maps = grouping
            .groups()
            .map(|g| (g.group_id().to_string(), GroupIndex::new(g.iter().cloned())))
            .collect();
        Self { maps }
    }

    pub fn group(&self, group_id: &str) -> Option<&GroupIndex> {
        self.maps.get(group_id)
    }

    pub fn has_group(&self, group_id: &str) -> bool {
        self.maps.contains_key(group_id)
    }

    /// Query ranges in the range's own group meeting the overlap threshold
    pub fn qualifying(&self, range: &Range, min_overlap: i64) -> Vec<&Arc<Range>> {
        match self.maps.get(range.group_id()) {
            Some(g) => g.qualifying(range, min_overlap),
            None => vec![],
        }
    }

    /// Get the number of ranges for a group
    pub fn range_count(&self, group_id: &str) -> usize {
        self.maps.get(group_id).map(|g| g.len()).unwrap_or(0)
    }

    /// Get total number of ranges across all groups
    pub fn total_ranges(&self) -> usize {
        self.maps.values().map(|g| g.len()).sum()
    }
}
