use std::collections::BTreeSet;

use crate::alphabet::OUTSIDE;
use crate::matrix::WindowMaterializer;
use crate::reads::Read;
use crate::stats::fisher::{fisher_exact_two_sided, ContingencyTable};

/// One row of the statistical universe: `(col_i, col_j, char_i, char_j,
/// p_value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovariationResult {
    pub col_i: i64,
    pub col_j: i64,
    pub char_i: char,
    pub char_j: char,
    pub p_value: f64,
}

/// C5 — tests one block of candidate pairs for covariation.
pub struct CovariationTester;

impl CovariationTester {
    /// Tests every pair in `block` against the reads that overlap the
    /// block's enclosing window. `reads` need not be pre-filtered to the
    /// window; only those overlapping `[w_min, w_max + 1)` are materialized.
    pub fn test_block(reads: &[Read], block: &[(i64, i64)]) -> Vec<CovariationResult> {
        let mut results = Vec::new();
        if block.is_empty() {
            return results;
        }

        let w_min = block.iter().map(|&(i, j)| i.min(j)).min().unwrap();
        let w_max = block.iter().map(|&(i, j)| i.max(j)).max().unwrap();
        let win_end = w_max + 1;

        let overlapping: Vec<&Read> = reads
            .iter()
            .filter(|r| r.overlaps(w_min, win_end))
            .collect();
        let spans: Vec<_> = overlapping.iter().map(|r| r.as_span()).collect();
        let matrix = WindowMaterializer::materialize(w_min, win_end, &spans);

        for &(i, j) in block {
            let (i_local, j_local) = match (matrix.column_for(i), matrix.column_for(j)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };

            let mut valid_rows = Vec::new();
            for r in 0..matrix.n_reads() {
                let ci = matrix.cells[[r, i_local]];
                let cj = matrix.cells[[r, j_local]];
                if ci != OUTSIDE && cj != OUTSIDE {
                    valid_rows.push((ci, cj));
                }
            }

            if valid_rows.is_empty() {
                continue;
            }

            let chars_i: BTreeSet<char> = valid_rows.iter().map(|&(a, _)| a).collect();
            let chars_j: BTreeSet<char> = valid_rows.iter().map(|&(_, b)| b).collect();

            for &a in &chars_i {
                for &b in &chars_j {
                    let mut x11 = 0u64;
                    let mut x12 = 0u64;
                    let mut x21 = 0u64;
                    let mut x22 = 0u64;
                    for &(ci, cj) in &valid_rows {
                        match (ci == a, cj == b) {
                            (true, true) => x11 += 1,
                            (true, false) => x12 += 1,
                            (false, true) => x21 += 1,
                            (false, false) => x22 += 1,
                        }
                    }
                    let table = ContingencyTable::new(x11, x12, x21, x22);
                    let p_value = fisher_exact_two_sided(&table);
                    results.push(CovariationResult {
                        col_i: i,
                        col_j: j,
                        char_i: a,
                        char_j: b,
                        p_value,
                    });
                }
            }
        }

        results
    }
}
