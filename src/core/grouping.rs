//! Range groups and groupings
//!
//! A [`RangeGroup`] holds the ranges of one group id; a [`RangeGrouping`]
//! maps group ids to groups and is what every engine consumes and returns.
//! Group iteration order is the order in which ids were first seen.

use crate::core::error::{RangeError, RangeResult};
use crate::core::intersect::{intersect, IntersectMode};
use crate::core::merge::{merge, merge_pair};
use crate::core::range::Range;
use crate::core::subtract::{subtract, SubtractMode};
use std::collections::HashMap;
use std::sync::Arc;

/// Ranges sharing a single group id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeGroup {
    group_id: String,
    ranges: Vec<Arc<Range>>,
}

impl RangeGroup {
    /// Build a group, checking that every range carries `group_id`
    pub fn new(group_id: impl Into<String>, ranges: Vec<Range>) -> RangeResult<Self> {
        let group_id = group_id.into();
        if let Some(bad) = ranges.iter().find(|r| r.group_id() != group_id) {
            return Err(RangeError::GroupMismatch {
                expected: group_id,
                found: bad.group_id().to_string(),
            });
        }
        Ok(Self {
            group_id,
            ranges: ranges.into_iter().map(Arc::new).collect(),
        })
    }

    /// Engine-side constructor; ranges are already known to match
    pub(crate) fn from_shared(group_id: &str, ranges: Vec<Arc<Range>>) -> Self {
        Self {
            group_id: group_id.to_string(),
            ranges,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn ranges(&self) -> &[Arc<Range>] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Range>> {
        self.ranges.iter()
    }

    /// Ranges ordered by start, then end, then input order
    pub fn sorted(&self) -> Vec<Arc<Range>> {
        sorted_ranges(self.ranges.iter().cloned())
    }
}

/// Stable sort by (start, end); equal keys keep their input order
pub(crate) fn sorted_ranges(ranges: impl IntoIterator<Item = Arc<Range>>) -> Vec<Arc<Range>> {
    let mut ranges: Vec<Arc<Range>> = ranges.into_iter().collect();
    ranges.sort_by_key(|r| r.sort_key());
    ranges
}

/// Group id -> group mapping, iterated in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeGrouping {
    groups: Vec<RangeGroup>,
    /// Group id -> position in `groups`
    index: HashMap<String, usize>,
}

impl RangeGrouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect ranges into groups keyed by their group id
    ///
    /// # Examples
    /// ```
    /// use fast_rangeset::core::{Range, RangeGrouping};
    /// let grouping = RangeGrouping::from_ranges(vec![
    ///     Range::new("chr2", 0, 10).unwrap(),
    ///     Range::new("chr1", 5, 15).unwrap(),
    ///     Range::new("chr2", 20, 30).unwrap(),
    /// ]);
    /// let ids: Vec<&str> = grouping.group_ids().collect();
    /// assert_eq!(ids, vec!["chr2", "chr1"]);
    /// assert_eq!(grouping.range_count(), 3);
    /// ```
    pub fn from_ranges(ranges: impl IntoIterator<Item = Range>) -> Self {
        let mut grouping = Self::new();
        for range in ranges {
            grouping.push(range);
        }
        grouping
    }

    /// Append a range to the group named by its group id
    pub fn push(&mut self, range: Range) {
        self.push_shared(Arc::new(range));
    }

    /// Append an already shared range
    pub fn push_shared(&mut self, range: Arc<Range>) {
        match self.index.get(range.group_id()) {
            Some(&pos) => self.groups[pos].ranges.push(range),
            None => {
                let group_id = range.group_id().to_string();
                self.index.insert(group_id.clone(), self.groups.len());
                self.groups.push(RangeGroup {
                    group_id,
                    ranges: vec![range],
                });
            }
        }
    }

    /// Add a whole group; an existing group with the same id is extended
    pub fn insert_group(&mut self, group: RangeGroup) {
        match self.index.get(&group.group_id) {
            Some(&pos) => self.groups[pos].ranges.extend(group.ranges),
            None => {
                self.index.insert(group.group_id.clone(), self.groups.len());
                self.groups.push(group);
            }
        }
    }

    pub fn group(&self, group_id: &str) -> Option<&RangeGroup> {
        self.index.get(group_id).map(|&pos| &self.groups[pos])
    }

    pub fn contains_group(&self, group_id: &str) -> bool {
        self.index.contains_key(group_id)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.group_id.as_str())
    }

    pub fn groups(&self) -> impl Iterator<Item = &RangeGroup> {
        self.groups.iter()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of ranges across all groups
    pub fn range_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// All ranges, group by group
    pub fn flatten(&self) -> Vec<Arc<Range>> {
        self.groups
            .iter()
            .flat_map(|g| g.ranges.iter().cloned())
            .collect()
    }

    /// See [`merge`]
    pub fn merge_overlaps(&self, distance: i64, track_parents: bool) -> RangeGrouping {
        merge(self, distance, track_parents)
    }

    /// See [`merge_pair`]
    pub fn merge_with(&self, other: &RangeGrouping, distance: i64, track_parents: bool) -> RangeGrouping {
        merge_pair(self, other, distance, track_parents)
    }

    /// See [`intersect`]
    pub fn intersect(
        &self,
        query: &RangeGrouping,
        min_overlap: i64,
        mode: IntersectMode,
        track_parents: bool,
    ) -> RangeGrouping {
        intersect(self, query, min_overlap, mode, track_parents)
    }

    /// See [`subtract`]
    pub fn subtract(
        &self,
        query: &RangeGrouping,
        min_overlap: i64,
        mode: SubtractMode,
        track_parents: bool,
    ) -> RangeGrouping {
        subtract(self, query, min_overlap, mode, track_parents)
    }
}

impl FromIterator<Range> for RangeGrouping {
    fn from_iter<T: IntoIterator<Item = Range>>(iter: T) -> Self {
        Self::from_ranges(iter)
    }
}

impl FromIterator<RangeGroup> for RangeGrouping {
    fn from_iter<T: IntoIterator<Item = RangeGroup>>(iter: T) -> Self {
        let mut grouping = Self::new();
        for group in iter {
            grouping.insert_group(group);
        }
        grouping
    }
}
