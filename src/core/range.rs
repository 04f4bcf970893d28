//! Range entity
//!
//! A [`Range`] is an immutable, 0-based half-open coordinate span on one
//! group (usually a chromosome). Ranges produced by the set-algebra engines
//! remember which input ranges they were derived from.

use crate::core::error::{RangeError, RangeResult};
use std::fmt;
use std::sync::Arc;

/// Largest accepted coordinate; overlap and gap lengths are signed `i64`
pub const MAX_COORD: u64 = i64::MAX as u64;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use fast_rangeset::core::Strand;
    /// assert_eq!(Strand::from_char('+'), Some(Strand::Plus));
    /// assert_eq!(Strand::from_char('-'), Some(Strand::Minus));
    /// assert_eq!(Strand::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

/// Optional descriptive fields carried alongside the coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RangeMeta {
    pub name: Option<String>,
    /// Score is kept verbatim; BED files use both integers and floats here
    pub score: Option<String>,
    pub strand: Option<Strand>,
}

impl RangeMeta {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.score.is_none() && self.strand.is_none()
    }
}

/// A coordinate span with provenance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    group_id: String,
    start: u64,
    end: u64,
    meta: RangeMeta,
    parents: Vec<Arc<Range>>,
}

impl Range {
    /// Create an input range
    ///
    /// Fails with [`RangeError::InvalidRange`] when `start > end` and with
    /// [`RangeError::CoordinateOverflow`] when `end` exceeds [`MAX_COORD`].
    ///
    /// # Examples
    /// ```
    /// use fast_rangeset::core::Range;
    /// let r = Range::new("chr1", 10, 20).unwrap();
    /// assert_eq!(r.len(), 10);
    /// assert!(Range::new("chr1", 20, 10).is_err());
    /// ```
    pub fn new(group_id: impl Into<String>, start: u64, end: u64) -> RangeResult<Self> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        if end > MAX_COORD {
            return Err(RangeError::CoordinateOverflow {
                value: end,
                max: MAX_COORD,
            });
        }
        Ok(Self {
            group_id: group_id.into(),
            start,
            end,
            meta: RangeMeta::default(),
            parents: Vec::new(),
        })
    }

    /// Build an engine output range. Callers guarantee `start <= end`.
    pub(crate) fn derived(
        group_id: &str,
        start: u64,
        end: u64,
        meta: RangeMeta,
        parents: Vec<Arc<Range>>,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            group_id: group_id.to_string(),
            start,
            end,
            meta,
            parents,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.meta.score = Some(score.into());
        self
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.meta.strand = Some(strand);
        self
    }

    pub fn with_meta(mut self, meta: RangeMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn meta(&self) -> &RangeMeta {
        &self.meta
    }

    pub fn name(&self) -> Option<&str> {
        self.meta.name.as_deref()
    }

    pub fn score(&self) -> Option<&str> {
        self.meta.score.as_deref()
    }

    pub fn strand(&self) -> Option<Strand> {
        self.meta.strand
    }

    /// Input ranges this range was computed from; empty for original input
    pub fn parents(&self) -> &[Arc<Range>] {
        &self.parents
    }

    /// Signed overlap length with another range
    ///
    /// Positive values are shared bases, zero means the ranges touch and a
    /// negative value is the size of the gap between them.
    ///
    /// # Examples
    /// ```
    /// use fast_rangeset::core::Range;
    /// let a = Range::new("chr1", 10, 20).unwrap();
    /// assert_eq!(a.overlap_len(&Range::new("chr1", 15, 25).unwrap()), 5);
    /// assert_eq!(a.overlap_len(&Range::new("chr1", 20, 25).unwrap()), 0);
    /// assert_eq!(a.overlap_len(&Range::new("chr1", 23, 25).unwrap()), -3);
    /// ```
    pub fn overlap_len(&self, other: &Range) -> i64 {
        overlap_len(self.start, self.end, other.start, other.end)
    }

    /// Intersection of two ranges, `None` when they share no bases
    pub fn intersection(&self, other: &Range) -> Option<(u64, u64)> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some((start, end))
    }

    /// Sort key used by every engine
    pub(crate) fn sort_key(&self) -> (u64, u64) {
        (self.start, self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.group_id, self.start, self.end)
    }
}

/// `min(end1, end2) - max(start1, start2)` as a signed value
///
/// Coordinates must not exceed [`MAX_COORD`].
pub fn overlap_len(start1: u64, end1: u64, start2: u64, end2: u64) -> i64 {
    end1.min(end2) as i64 - start1.max(start2) as i64
}
