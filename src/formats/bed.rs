//! BED reader and writer
//!
//! Turns BED3/BED6 text into a [`RangeGrouping`] and back. Columns beyond
//! the strand are ignored on input. Coordinates are taken as-is (0-based,
//! half-open), so reading and writing round-trips.

use crate::core::io::{create_writer, ByteLineIterator, SmartReader};
use crate::core::{Range, RangeError, RangeGrouping, Strand};
use memchr::memchr;
use std::io::{BufRead, Write};
use std::path::Path;

/// Placeholder for an absent optional column
const MISSING: &str = ".";

/// BED parsing error
#[derive(Debug, thiserror::Error)]
pub enum BedParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),

    #[error("Invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: Box<BedParseError>,
    },

    #[error("Invalid range at line {line}: {source}")]
    InvalidRange {
        line: usize,
        #[source]
        source: RangeError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Zero-copy BED record view for parsing
/// Only parses coordinate fields immediately, other fields are kept as byte slices
pub struct BedRecordView<'a> {
    /// Original line bytes
    line: &'a [u8],
    /// Chromosome name
    pub chrom: &'a str,
    /// Start position (0-based)
    pub start: u64,
    /// End position
    pub end: u64,
    /// Field boundaries (start, end) for lazy access
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> BedRecordView<'a> {
    /// Parse a BED line with minimal allocation
    pub fn parse(line: &'a [u8]) -> Result<Self, BedParseError> {
        if line.is_empty() {
            return Err(BedParseError::EmptyLine);
        }

        let mut field_bounds = Vec::with_capacity(6);
        let mut start_pos = 0;
        while let Some(tab_pos) = memchr(b'\t', &line[start_pos..]) {
            field_bounds.push((start_pos, start_pos + tab_pos));
            start_pos += tab_pos + 1;
        }
        field_bounds.push((start_pos, line.len()));

        if field_bounds.len() < 3 {
            return Err(BedParseError::TooFewFields {
                expected: 3,
                found: field_bounds.len(),
            });
        }

        let chrom = field_str(line, field_bounds[0], "chrom")?;
        let start_str = field_str(line, field_bounds[1], "start")?;
        let start: u64 = start_str
            .parse()
            .map_err(|_| BedParseError::InvalidNumber("start", start_str.to_string()))?;
        let end_str = field_str(line, field_bounds[2], "end")?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| BedParseError::InvalidNumber("end", end_str.to_string()))?;

        Ok(Self {
            line,
            chrom,
            start,
            end,
            field_bounds,
        })
    }

    /// Get the number of fields
    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    /// Get field as string slice (lazy access)
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.field_bounds
            .get(index)
            .and_then(|(start, end)| std::str::from_utf8(&self.line[*start..*end]).ok())
    }

    /// Get name field (field 3) if present; `.` means no name
    pub fn name(&self) -> Option<&'a str> {
        self.field(3).filter(|s| *s != MISSING)
    }

    /// Get score field (field 4) if present; `.` means no score
    pub fn score(&self) -> Option<&'a str> {
        self.field(4).filter(|s| *s != MISSING)
    }

    /// Get strand field (field 5) if present; `.` means unknown
    pub fn strand(&self) -> Option<Strand> {
        self.field(5)
            .and_then(|s| s.chars().next())
            .and_then(Strand::from_char)
    }

    /// Convert into an input [`Range`]
    pub fn to_range(&self) -> Result<Range, RangeError> {
        let mut range = Range::new(self.chrom, self.start, self.end)?;
        if let Some(name) = self.name() {
            range = range.with_name(name);
        }
        if let Some(score) = self.score() {
            range = range.with_score(score);
        }
        if let Some(strand) = self.strand() {
            range = range.with_strand(strand);
        }
        Ok(range)
    }
}

fn field_str<'a>(line: &'a [u8], (start, end): (usize, usize), what: &'static str) -> Result<&'a str, BedParseError> {
    std::str::from_utf8(&line[start..end]).map_err(|_| BedParseError::InvalidUtf8(what))
}

/// Header and comment lines carry no ranges
fn is_header_line(line: &[u8]) -> bool {
    line.starts_with(b"#") || line.starts_with(b"track") || line.starts_with(b"browser")
}

/// Read BED records from any buffered reader into a grouping
pub fn read_grouping_from<R: BufRead>(reader: R) -> Result<RangeGrouping, BedParseError> {
    let mut lines = ByteLineIterator::new(reader);
    let mut grouping = RangeGrouping::new();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;

        if line.iter().all(|b| b.is_ascii_whitespace()) || is_header_line(line) {
            continue;
        }

        let view = BedRecordView::parse(line).map_err(|e| BedParseError::InvalidRecord {
            line: line_no,
            source: Box::new(e),
        })?;
        let range = view.to_range().map_err(|source| BedParseError::InvalidRange {
            line: line_no,
            source,
        })?;
        grouping.push(range);
    }

    log::debug!(
        "read {} ranges in {} groups from {} lines",
        grouping.range_count(),
        grouping.len(),
        line_no
    );
    Ok(grouping)
}

/// Read a BED file (plain, gzip or bzip2) into a grouping
pub fn read_grouping<P: AsRef<Path>>(path: P) -> crate::core::Result<RangeGrouping> {
    let reader = SmartReader::open_auto(path.as_ref())?;
    Ok(read_grouping_from(reader)?)
}

/// Format one range as a BED line (without newline)
///
/// Optional columns are written up to the last one present; gaps before it
/// are filled with `.`, which the reader takes as absent.
///
/// # Examples
/// ```
/// use fast_rangeset::core::{Range, Strand};
/// use fast_rangeset::formats::bed::format_range;
/// let r = Range::new("chr1", 10, 20).unwrap();
/// assert_eq!(format_range(&r), "chr1\t10\t20");
/// let r = r.with_strand(Strand::Minus);
/// assert_eq!(format_range(&r), "chr1\t10\t20\t.\t.\t-");
/// ```
pub fn format_range(range: &Range) -> String {
    let mut output = String::with_capacity(64);
    output.push_str(range.group_id());
    output.push('\t');
    output.push_str(&range.start().to_string());
    output.push('\t');
    output.push_str(&range.end().to_string());

    let columns = if range.strand().is_some() {
        3
    } else if range.score().is_some() {
        2
    } else if range.name().is_some() {
        1
    } else {
        0
    };

    if columns >= 1 {
        output.push('\t');
        output.push_str(range.name().unwrap_or(MISSING));
    }
    if columns >= 2 {
        output.push('\t');
        output.push_str(range.score().unwrap_or(MISSING));
    }
    if columns >= 3 {
        output.push('\t');
        output.push(range.strand().map(Strand::to_char).unwrap_or('.'));
    }

    output
}

/// Write every range of a grouping, group by group, one BED line each
pub fn write_grouping<W: Write>(grouping: &RangeGrouping, mut writer: W) -> std::io::Result<usize> {
    let mut written = 0;
    for range in grouping.groups().flat_map(|g| g.iter()) {
        writeln!(writer, "{}", format_range(range))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Write a grouping as BED to `path`, or to stdout when `path` is `None`
pub fn write_grouping_to(grouping: &RangeGrouping, path: Option<&Path>) -> crate::core::Result<usize> {
    let writer = create_writer(path)?;
    Ok(write_grouping(grouping, writer)?)
}
