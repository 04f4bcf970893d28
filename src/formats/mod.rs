//! Range file formats
//!
//! BED is the only text layout the toolkit reads and writes.

pub mod bed;

pub use bed::{format_range, read_grouping, read_grouping_from, write_grouping, write_grouping_to, BedParseError, BedRecordView};
