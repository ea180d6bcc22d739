use ndarray::Array2;

use covarrect::reads::{Read, RefOp};
use covarrect::stats::{max_read_length, ColumnStats};

fn read(start: i64, ops: &[RefOp], seq: &[u8]) -> Read {
    Read::new(start, ops.to_vec(), seq.to_vec())
}

#[test]
fn single_read_consensus_matches_bases() {
    let r = read(0, &[RefOp::Match(4)], b"ACGT");
    let max_len = max_read_length(std::slice::from_ref(&r));
    assert_eq!(max_len, 4);

    let span = r.as_span();
    let matrix = covarrect::matrix::WindowMaterializer::materialize(0, 4, &[span]);
    let mut counts = Array2::<u32>::zeros((4, 5));
    ColumnStats::accumulate(&mut counts, 0, &matrix);
    let stats = ColumnStats::from_counts(0, counts);

    assert_eq!(stats.consensus_at(0), 'A');
    assert_eq!(stats.consensus_at(1), 'C');
    assert_eq!(stats.consensus_at(2), 'G');
    assert_eq!(stats.consensus_at(3), 'T');
    assert!(!stats.is_interesting(0));
}

#[test]
fn interesting_requires_at_most_one_zero_base() {
    // {A:10,C:0,G:0,T:0,-:5} -> three zeros, not interesting.
    let mut counts = Array2::<u32>::zeros((1, 5));
    counts[[0, 0]] = 10;
    counts[[0, 4]] = 5;
    let stats = ColumnStats::from_counts(0, counts);
    assert!(!stats.is_interesting(0));

    // {A:10,C:1,G:1,T:0,-:0} -> one zero, interesting.
    let mut counts = Array2::<u32>::zeros((1, 5));
    counts[[0, 0]] = 10;
    counts[[0, 1]] = 1;
    counts[[0, 2]] = 1;
    let stats = ColumnStats::from_counts(0, counts);
    assert!(stats.is_interesting(0));
}

#[test]
fn consensus_falls_back_to_gap_when_gap_not_beaten() {
    let mut counts = Array2::<u32>::zeros((1, 5));
    counts[[0, 0]] = 3;
    counts[[0, 4]] = 5;
    let stats = ColumnStats::from_counts(0, counts);
    assert_eq!(stats.consensus_at(0), '-');
}

#[test]
fn consensus_ties_resolve_by_acgt_order() {
    let mut counts = Array2::<u32>::zeros((1, 5));
    counts[[0, 0]] = 4;
    counts[[0, 1]] = 4;
    let stats = ColumnStats::from_counts(0, counts);
    assert_eq!(stats.consensus_at(0), 'A');
}

#[test]
fn accumulate_projection_skips_trimmed_leading_deletion() {
    // RefOp::Del(2), Match(3) at read_start 0 -> C1 trims the leading
    // deletion, so positions starts at 2, not 0; position 0 and 1
    // should receive no count at all, not a counted gap.
    let r = read(0, &[RefOp::Del(2), RefOp::Match(3)], b"ACG");
    let (seq, positions) = r.project();
    let mut counts = Array2::<u32>::zeros((5, 5));
    ColumnStats::accumulate_projection(&mut counts, 0, &seq, &positions);
    assert_eq!(counts.row(0).sum(), 0);
    assert_eq!(counts.row(1).sum(), 0);
    assert_eq!(counts[[2, 0]], 1); // 'A' at ref pos 2
}
