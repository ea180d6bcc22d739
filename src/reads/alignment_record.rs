use rust_htslib::bam::record::{Cigar, Record};

use crate::alphabet::GAP;
use crate::error::{CorrectionError, Result};
use crate::matrix::ReadSpan;

/// A CIGAR operation reduced to the three kinds the covariation engine
/// understands. Soft and hard clips are consumed while splitting the read
/// (see [`Read::from_record`]) and never appear here; anything else
/// (`RefSkip`/`Pad`/`=`/`X`) is a programming error this pipeline does not
/// support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOp {
    Match(u32),
    Ins(u32),
    Del(u32),
}

impl RefOp {
    pub fn len(&self) -> u32 {
        match self {
            RefOp::Match(n) | RefOp::Ins(n) | RefOp::Del(n) => *n,
        }
    }
}

/// The boundary view of one alignment record: its reference start, its
/// reduced CIGAR program, and its aligned (soft-clip-stripped) query bases.
/// Everything downstream of C0 (the CLI/config layer) operates on this
/// rather than on `rust_htslib::bam::Record` directly, so the projector,
/// window materializer, and column statistics pass can all be exercised
/// without constructing real BAM records.
#[derive(Debug, Clone)]
pub struct Read {
    pub read_start: i64,
    pub ops: Vec<RefOp>,
    pub aligned_seq: Vec<u8>,
}

impl Read {
    pub fn new(read_start: i64, ops: Vec<RefOp>, aligned_seq: Vec<u8>) -> Self {
        Read {
            read_start,
            ops,
            aligned_seq,
        }
    }

    /// Splits a `rust_htslib` record into a [`Read`], mirroring how the
    /// source's `read.query_alignment_sequence` / `read.cigartuples` pair
    /// presents an already soft-clipped view to `ErrorCorrection.read_count_data`.
    pub fn from_record(record: &Record) -> Result<Self> {
        let raw_seq = record.seq().as_bytes();
        let mut aligned_seq = Vec::with_capacity(raw_seq.len());
        let mut ops = Vec::with_capacity(record.cigar().len());
        let mut q = 0usize;

        for c in record.cigar().iter() {
            match *c {
                Cigar::Match(n) | Cigar::Equal(n) | Cigar::Diff(n) => {
                    let n = n as usize;
                    aligned_seq.extend_from_slice(&raw_seq[q..q + n]);
                    ops.push(RefOp::Match(n as u32));
                    q += n;
                }
                Cigar::Ins(n) => {
                    let n = n as usize;
                    aligned_seq.extend_from_slice(&raw_seq[q..q + n]);
                    ops.push(RefOp::Ins(n as u32));
                    q += n;
                }
                Cigar::Del(n) => {
                    ops.push(RefOp::Del(n));
                }
                Cigar::SoftClip(n) => {
                    q += n as usize;
                }
                Cigar::HardClip(_) => {}
                other => {
                    return Err(CorrectionError::UnsupportedCigarOp {
                        qname: String::from_utf8_lossy(record.qname()).into_owned(),
                        op: format!("{:?}", other),
                    })
                }
            }
        }

        Ok(Read::new(record.pos(), ops, aligned_seq))
    }

    /// Reference footprint length, i.e. `sum(Match) + sum(Del)`. Never
    /// includes `Ins` bases since insertions do not occupy reference
    /// columns.
    pub fn reference_footprint_length(&self) -> u32 {
        reference_footprint_length(&self.ops)
    }

    /// Reference coordinate one past the read's last covered column.
    pub fn reference_end(&self) -> i64 {
        self.read_start + self.reference_footprint_length() as i64
    }

    /// Total within-read insertion length, used for `max_read_length`: a
    /// read's footprint in the windowed matrix grows by one column per
    /// inserted base, so the reference footprint alone is not a safe upper
    /// bound on pair spacing.
    pub fn inserted_bases(&self) -> u32 {
        inserted_bases(&self.ops)
    }

    /// Projected length used as `max_read_length`: the reference footprint
    /// plus any bases inserted within it.
    pub fn projected_length(&self) -> u32 {
        self.reference_footprint_length() + self.inserted_bases()
    }

    /// Projects this read alone into `(sequence, positions)`.
    pub fn project(&self) -> (Vec<char>, Vec<i64>) {
        crate::reads::cigar_utils::CigarProjector::project(
            &self.ops,
            &self.aligned_seq,
            self.read_start,
        )
    }

    /// Borrows this read as a [`ReadSpan`] for the window materializer.
    pub fn as_span(&self) -> ReadSpan<'_> {
        ReadSpan {
            ops: &self.ops,
            aligned_seq: &self.aligned_seq,
            read_start: self.read_start,
        }
    }

    pub fn overlaps(&self, win_start: i64, win_end: i64) -> bool {
        self.read_start < win_end && self.reference_end() > win_start
    }
}

pub fn reference_footprint_length(ops: &[RefOp]) -> u32 {
    ops.iter()
        .map(|op| match op {
            RefOp::Match(n) | RefOp::Del(n) => *n,
            RefOp::Ins(_) => 0,
        })
        .sum()
}

pub fn inserted_bases(ops: &[RefOp]) -> u32 {
    ops.iter()
        .map(|op| match op {
            RefOp::Ins(n) => *n,
            _ => 0,
        })
        .sum()
}

/// `true` for every character the covariation test considers an observation
/// (anything but the out-of-footprint sentinel); gap is a legitimate,
/// countable observation.
pub fn is_observed(c: char) -> bool {
    c != crate::alphabet::OUTSIDE
}

/// `true` for a real alignment gap, as distinct from "outside footprint".
pub fn is_gap(c: char) -> bool {
    c == GAP
}
