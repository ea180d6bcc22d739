use ndarray::Array2;

use crate::alphabet::{base_index, BASES, GAP};
use crate::matrix::ProjectedMatrix;
use crate::reads::Read;

/// Per-reference-column base counts, consensus, and "interesting" flag.
///
/// Built from one pass over every read's single-read projection: counts
/// accumulate over `{A,C,G,T,-}` only, the out-of-footprint sentinel `~`
/// contributes nothing. `counts` is `reference_length x 5`, column order
/// `A,C,G,T,-` matching [`crate::alphabet::BASES`] plus gap.
pub struct ColumnStats {
    pub reference_start: i64,
    pub counts: Array2<u32>,
    consensus: Vec<char>,
    interesting: Vec<bool>,
}

const GAP_COL: usize = 4;

impl ColumnStats {
    /// Accumulates counts for one read's single-read projection into an
    /// existing `reference_length x 5` matrix. This is the canonical
    /// accumulation path: unlike a windowed multi-read matrix, a single-read
    /// projection never counts a leading/trailing deletion as a gap, since
    /// those positions are trimmed out of `positions` entirely.
    pub fn accumulate_projection(
        counts: &mut Array2<u32>,
        counts_start: i64,
        sequence: &[char],
        positions: &[i64],
    ) {
        for (&c, &ref_pos) in sequence.iter().zip(positions.iter()) {
            if ref_pos < counts_start {
                continue;
            }
            let row_idx = (ref_pos - counts_start) as usize;
            if row_idx >= counts.nrows() {
                continue;
            }
            if c == GAP {
                counts[[row_idx, GAP_COL]] += 1;
            } else if let Some(b) = base_index(c) {
                counts[[row_idx, b]] += 1;
            }
        }
    }

    /// Accumulates counts for a single materialized multi-read window into
    /// an existing `reference_length x 5` matrix at the appropriate offset.
    /// Provided for callers that already have a window materialized for
    /// another purpose (e.g. reusing a block's matrix); prefer
    /// [`ColumnStats::accumulate_projection`] when only single-read
    /// projections are available, since the two differ at leading/trailing
    /// deletions (see DESIGN.md).
    pub fn accumulate(counts: &mut Array2<u32>, counts_start: i64, matrix: &ProjectedMatrix) {
        for (ref_pos, col) in matrix.reference_columns() {
            let row_idx = (ref_pos - counts_start) as usize;
            if ref_pos < counts_start || row_idx >= counts.nrows() {
                continue;
            }
            for r in 0..matrix.n_reads() {
                let c = matrix.cells[[r, col]];
                if c == GAP {
                    counts[[row_idx, GAP_COL]] += 1;
                } else if let Some(b) = base_index(c) {
                    counts[[row_idx, b]] += 1;
                }
            }
        }
    }

    /// Builds column statistics from a completed `reference_length x 5`
    /// count matrix.
    pub fn from_counts(reference_start: i64, counts: Array2<u32>) -> Self {
        let n = counts.nrows();
        let mut consensus = Vec::with_capacity(n);
        let mut interesting = Vec::with_capacity(n);

        for row_idx in 0..n {
            let row = counts.row(row_idx);
            let gap_count = row[GAP_COL];

            let mut best_base = BASES[0];
            let mut best_count = row[0];
            for (i, &b) in BASES.iter().enumerate().skip(1) {
                if row[i] > best_count {
                    best_count = row[i];
                    best_base = b;
                }
            }

            consensus.push(if best_count > gap_count {
                best_base
            } else {
                GAP
            });

            let zero_bases = (0..4).filter(|&i| row[i] == 0).count();
            interesting.push(zero_bases <= 1);
        }

        ColumnStats {
            reference_start,
            counts,
            consensus,
            interesting,
        }
    }

    pub fn reference_length(&self) -> usize {
        self.counts.nrows()
    }

    pub fn consensus_at(&self, ref_pos: i64) -> char {
        self.consensus[(ref_pos - self.reference_start) as usize]
    }

    pub fn is_interesting(&self, ref_pos: i64) -> bool {
        self.interesting[(ref_pos - self.reference_start) as usize]
    }

    pub fn interesting_columns(&self) -> impl Iterator<Item = i64> + '_ {
        self.interesting
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(move |(i, _)| self.reference_start + i as i64)
    }
}

/// The largest projected length (reference footprint plus within-read
/// insertions) across all reads, used to bound pair enumeration.
pub fn max_read_length(reads: &[Read]) -> u32 {
    reads.iter().map(Read::projected_length).max().unwrap_or(0)
}
