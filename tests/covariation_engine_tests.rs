use std::collections::BTreeSet;

use ndarray::Array2;
use rust_htslib::bam::record::{Cigar, CigarString, Record};

use covarrect::correct::ReadCorrector;
use covarrect::matrix::WindowMaterializer;
use covarrect::reads::{RefOp, Read};
use covarrect::stats::{benjamini_hochberg, enumerate_pairs, ColumnStats, CovariationResult};

fn build_record(qname: &[u8], pos: i64, ops: &[Cigar], seq: &[u8]) -> Record {
    let mut record = Record::new();
    let cigar = CigarString(ops.to_vec());
    let qual = vec![30u8; seq.len()];
    record.set(qname, Some(&cigar), seq, &qual);
    record.set_pos(pos);
    record.set_tid(0);
    record.set_mapq(60);
    record.set_flags(0); // clear the unmapped flag Record::new() defaults to
    record
}

/// E1 — single read, no indels: consensus equals the read, no column is
/// interesting, no pair is enumerated, and correction is a no-op.
#[test]
fn e1_single_read_no_indels() {
    let record = build_record(b"r1", 0, &[Cigar::Match(4)], b"ACGT");
    let read = Read::from_record(&record).unwrap();
    assert_eq!(read.reference_footprint_length(), 4);

    let (sequence, positions) = read.project();
    assert_eq!(sequence, vec!['A', 'C', 'G', 'T']);

    let mut counts = Array2::<u32>::zeros((4, 5));
    ColumnStats::accumulate_projection(&mut counts, 0, &sequence, &positions);
    let stats = ColumnStats::from_counts(0, counts);

    assert_eq!(stats.consensus_at(0), 'A');
    assert_eq!(stats.consensus_at(1), 'C');
    assert_eq!(stats.consensus_at(2), 'G');
    assert_eq!(stats.consensus_at(3), 'T');
    for c in 0..4 {
        assert!(!stats.is_interesting(c));
    }

    let pairs: Vec<(i64, i64)> = enumerate_pairs(&stats, 10).collect();
    assert!(pairs.is_empty());

    let covarying_sites = BTreeSet::new();
    let corrector = ReadCorrector::new(&stats, &covarying_sites);
    let corrected = corrector.correct(&record).unwrap().unwrap();
    assert_eq!(corrected.seq().as_bytes(), b"ACGT");
}

/// E3 — interesting flag per spec §3/§8: at most one of A/C/G/T may be
/// zero for a column to count as interesting.
#[test]
fn e3_interesting_flag_threshold() {
    let mut not_interesting = Array2::<u32>::zeros((1, 5));
    not_interesting[[0, 0]] = 10;
    not_interesting[[0, 4]] = 5;
    let stats = ColumnStats::from_counts(0, not_interesting);
    assert!(!stats.is_interesting(0));

    let mut interesting = Array2::<u32>::zeros((1, 5));
    interesting[[0, 0]] = 10;
    interesting[[0, 1]] = 1;
    interesting[[0, 2]] = 1;
    let stats = ColumnStats::from_counts(0, interesting);
    assert!(stats.is_interesting(0));
}

/// E5 — a pair of columns with perfect linkage is rejected by BH and its
/// sites are preserved verbatim by the corrector; everything else
/// flattens to consensus.
#[test]
fn e5_linked_pair_preserved_through_correction() {
    // Ten reads carrying A at both columns 0 and 4, ten carrying C at
    // both -- a perfectly linked pair -- plus uninformative noise so the
    // linked pair is the only significant result.
    let mut reads = Vec::new();
    for _ in 0..10 {
        reads.push(Read::new(0, vec![RefOp::Match(5)], b"AAAAA".to_vec()));
    }
    for _ in 0..10 {
        reads.push(Read::new(0, vec![RefOp::Match(5)], b"CCCCC".to_vec()));
    }

    let mut counts = Array2::<u32>::zeros((5, 5));
    for r in &reads {
        let (sequence, positions) = r.project();
        ColumnStats::accumulate_projection(&mut counts, 0, &sequence, &positions);
    }
    let stats = ColumnStats::from_counts(0, counts);

    let spans: Vec<_> = reads.iter().map(Read::as_span).collect();
    let matrix = WindowMaterializer::materialize(0, 5, &spans);

    let col0 = matrix.column_for(0).unwrap();
    let col4 = matrix.column_for(4).unwrap();
    let mut x11 = 0u64;
    let mut x22 = 0u64;
    for r in 0..matrix.n_reads() {
        let a = matrix.cells[[r, col0]];
        let b = matrix.cells[[r, col4]];
        if a == 'A' && b == 'A' {
            x11 += 1;
        } else if a == 'C' && b == 'C' {
            x22 += 1;
        }
    }
    assert_eq!(x11, 10);
    assert_eq!(x22, 10);

    let linked = CovariationResult {
        col_i: 0,
        col_j: 4,
        char_i: 'A',
        char_j: 'A',
        p_value: 1e-9,
    };
    let noise = CovariationResult {
        col_i: 1,
        col_j: 2,
        char_i: 'A',
        char_j: 'C',
        p_value: 0.95,
    };
    let results = vec![linked, noise];
    let covarying_sites = benjamini_hochberg(&results, 0.05);
    assert!(covarying_sites.contains(&0));
    assert!(covarying_sites.contains(&4));
    assert!(!covarying_sites.contains(&1));

    // A read carrying 'C' at every column corrects to all-consensus ('A')
    // everywhere except the two preserved covarying sites.
    let record = build_record(b"r2", 0, &[Cigar::Match(5)], b"CCCCC");
    let corrector = ReadCorrector::new(&stats, &covarying_sites);
    let corrected = corrector.correct(&record).unwrap().unwrap();
    let seq = corrected.seq().as_bytes();
    assert_eq!(seq[0], b'C'); // covarying site: original base preserved
    assert_eq!(seq[4], b'C'); // covarying site: original base preserved
    assert_eq!(seq[1], b'A'); // flattened to consensus
    assert_eq!(seq[2], b'A');
    assert_eq!(seq[3], b'A');
}

/// E6 — insertion handling: a read with an embedded insertion and
/// internal deletion projects the insertion out entirely and the
/// deletion as a gap.
#[test]
fn e6_insertion_and_deletion_projection() {
    let record = build_record(
        b"r3",
        0,
        &[
            Cigar::Match(1),
            Cigar::Ins(1),
            Cigar::Del(1),
            Cigar::Match(5),
            Cigar::Del(1),
            Cigar::Match(3),
        ],
        b"ACTCCTCGAA",
    );
    let read = Read::from_record(&record).unwrap();
    let (sequence, _) = read.project();
    let s: String = sequence.into_iter().collect();
    assert_eq!(s, "A-TCCTC-GAA");
}

/// Universal invariant #1: projection length equals the sum of MATCH and
/// DELETE strides (leading/trailing deletions excluded by C1 trimming).
#[test]
fn invariant_projection_length_matches_match_and_delete_strides() {
    let record = build_record(
        b"r4",
        5,
        &[Cigar::Match(3), Cigar::Ins(2), Cigar::Match(2), Cigar::Del(1), Cigar::Match(4)],
        b"ACGTTAAAA",
    );
    let read = Read::from_record(&record).unwrap();
    let (sequence, positions) = read.project();
    assert_eq!(sequence.len(), 3 + 2 + 1 + 4);
    assert_eq!(positions.len(), sequence.len());
    assert_eq!(positions[0], 5);
}

/// Universal invariant #2: for any reference column, the sum of
/// `{A,C,G,T,-}` counts equals the number of reads actually covering it
/// (non-`~` in the projected matrix).
#[test]
fn invariant_column_totals_match_covering_read_count() {
    let early_exit = Read::new(0, vec![RefOp::Match(2)], b"AC".to_vec());
    let full_span = Read::new(0, vec![RefOp::Match(4)], b"AGGT".to_vec());
    let late_entry = Read::new(2, vec![RefOp::Match(2)], b"GT".to_vec());
    let reads = vec![early_exit, full_span, late_entry];

    let spans: Vec<_> = reads.iter().map(Read::as_span).collect();
    let matrix = WindowMaterializer::materialize(0, 4, &spans);

    let mut counts = Array2::<u32>::zeros((4, 5));
    ColumnStats::accumulate(&mut counts, 0, &matrix);

    // column 0: all three reads cover it.
    assert_eq!(counts.row(0).sum(), 3);
    // column 1: all three reads still cover it (early_exit ends at ref 2).
    assert_eq!(counts.row(1).sum(), 3);
    // column 2: only full_span and late_entry cover it.
    assert_eq!(counts.row(2).sum(), 2);
    // column 3: only full_span covers it.
    assert_eq!(counts.row(3).sum(), 1);
}

/// Universal invariant #7/#8: re-running correction on an already
/// flattened read is idempotent, and every non-covarying, non-gap column
/// equals the stored consensus.
#[test]
fn invariant_correction_is_idempotent() {
    let mut counts = Array2::<u32>::zeros((4, 5));
    counts[[0, 0]] = 5; // A
    counts[[1, 1]] = 5; // C
    counts[[2, 2]] = 5; // G
    counts[[3, 3]] = 5; // T
    let stats = ColumnStats::from_counts(0, counts);
    let covarying_sites = BTreeSet::new();
    let corrector = ReadCorrector::new(&stats, &covarying_sites);

    let original = build_record(b"r5", 0, &[Cigar::Match(4)], b"TGCA");
    let once = corrector.correct(&original).unwrap().unwrap();
    assert_eq!(once.seq().as_bytes(), b"ACGT");

    let twice = corrector.correct(&once).unwrap().unwrap();
    assert_eq!(twice.seq().as_bytes(), once.seq().as_bytes());
}
