use crate::alphabet::GAP;
use crate::reads::alignment_record::RefOp;

/// C1 — walks one read's reduced CIGAR program and projects it into a
/// reference-column-indexed character vector.
///
/// Mirrors `ErrorCorrection.read_count_data` in the source, with one
/// reconciliation: the source's loop only ever suppresses a *leading*
/// deletion (it checks `len(segments) > 0` before emitting gap columns),
/// while `SAMFASTAConverter.single_aligned_segment_to_fasta` trims *both*
/// ends of the same kind of naive projection via a leading/trailing
/// gap-character scan. Because every gap character in a single-read
/// projection originates from a `Del` op (insertions emit nothing), trimming
/// leading and trailing gap runs from the finished character vector is
/// exactly equivalent to, and subsumes, the leading-only suppression — so
/// this is the one naive-build-then-trim implementation used everywhere.
pub struct CigarProjector;

impl CigarProjector {
    /// Projects `ops` over `aligned_seq` into `(sequence, positions)`.
    /// `read_start` is the reference coordinate of the read's first
    /// (post-trim) projected base.
    pub fn project(ops: &[RefOp], aligned_seq: &[u8], read_start: i64) -> (Vec<char>, Vec<i64>) {
        let mut raw = Vec::new();
        let mut q = 0usize;

        for op in ops {
            match *op {
                RefOp::Match(n) => {
                    let n = n as usize;
                    for &b in &aligned_seq[q..q + n] {
                        raw.push(b as char);
                    }
                    q += n;
                }
                RefOp::Ins(n) => {
                    q += n as usize;
                }
                RefOp::Del(n) => {
                    raw.extend(std::iter::repeat(GAP).take(n as usize));
                }
            }
        }

        let start = raw.iter().position(|&c| c != GAP).unwrap_or(raw.len());
        let end = raw.len()
            - raw
                .iter()
                .rev()
                .position(|&c| c != GAP)
                .unwrap_or(raw.len());
        let sequence: Vec<char> = if end > start {
            raw[start..end].to_vec()
        } else {
            Vec::new()
        };

        let positions: Vec<i64> = (read_start..read_start + sequence.len() as i64).collect();
        (sequence, positions)
    }
}
