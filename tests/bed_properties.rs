//! Property-based tests for BED reading and writing

use fast_rangeset::bed::{read_grouping, read_grouping_from, write_grouping, write_grouping_to};
use fast_rangeset::{Range, RangeGrouping, Strand};
use flate2::write::GzEncoder;
use flate2::Compression;
use proptest::prelude::*;
use std::io::{BufReader, Write};
use tempfile::NamedTempFile;

fn arb_strand() -> impl Strategy<Value = Strand> {
    prop_oneof![Just(Strand::Plus), Just(Strand::Minus)]
}

/// Ranges with each descriptive column present or absent independently
fn arb_range() -> impl Strategy<Value = Range> {
    (
        prop_oneof![Just("chr1"), Just("chr2"), Just("chrX")],
        0u64..1_000_000,
        0u64..10_000,
        prop::option::of("[a-z][a-z0-9_]{0,7}"),
        prop::option::of(0u32..1000),
        prop::option::of(arb_strand()),
    )
        .prop_map(|(chrom, start, len, name, score, strand)| {
            let mut range = Range::new(chrom, start, start + len).unwrap();
            if let Some(name) = name {
                range = range.with_name(name);
            }
            if let Some(score) = score {
                range = range.with_score(score.to_string());
            }
            if let Some(strand) = strand {
                range = range.with_strand(strand);
            }
            range
        })
}

fn arb_grouping() -> impl Strategy<Value = RangeGrouping> {
    prop::collection::vec(arb_range(), 0..40).prop_map(RangeGrouping::from_ranges)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Writing then reading a grouping gives it back
    #[test]
    fn prop_bed_round_trip(grouping in arb_grouping()) {
        let mut buffer = Vec::new();
        let written = write_grouping(&grouping, &mut buffer).unwrap();
        prop_assert_eq!(written, grouping.range_count());

        let back = read_grouping_from(BufReader::new(buffer.as_slice())).unwrap();
        prop_assert_eq!(back, grouping);
    }

    /// Gzip input decodes to the same ranges as plain input
    #[test]
    fn prop_gzip_matches_plain(grouping in arb_grouping()) {
        let mut plain = Vec::new();
        write_grouping(&grouping, &mut plain).unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&plain).unwrap();
        let mut temp = tempfile::Builder::new().suffix(".bed.gz").tempfile().unwrap();
        temp.write_all(&encoder.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        let back = read_grouping(temp.path()).unwrap();
        prop_assert_eq!(back, grouping);
    }
}

#[test]
fn test_write_to_file_and_read_back() {
    let grouping = RangeGrouping::from_ranges(vec![
        Range::new("chr1", 10, 20).unwrap().with_name("a"),
        Range::new("chr2", 0, 5).unwrap(),
        Range::new("chr1", 30, 40).unwrap(),
    ]);
    let temp = NamedTempFile::new().unwrap();
    let written = write_grouping_to(&grouping, Some(temp.path())).unwrap();
    assert_eq!(written, 3);

    let text = std::fs::read_to_string(temp.path()).unwrap();
    assert_eq!(text, "chr1\t10\t20\ta\nchr1\t30\t40\nchr2\t0\t5\n");
    assert_eq!(read_grouping(temp.path()).unwrap(), grouping);
}

#[test]
fn test_headers_and_blank_lines_skipped() {
    let data = "track name=test\n#comment\nbrowser position chr1\n\nchr1\t1\t2\n  \nchr1\t3\t4\n";
    let grouping = read_grouping_from(BufReader::new(data.as_bytes())).unwrap();
    assert_eq!(grouping.range_count(), 2);
}

#[test]
fn test_bad_record_reports_line() {
    let data = "chr1\t1\t2\nchr1\t9\t3\n";
    let err = read_grouping_from(BufReader::new(data.as_bytes())).unwrap_err();
    assert!(err.to_string().contains('2'), "{}", err);
}
