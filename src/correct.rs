use std::collections::BTreeSet;

use rust_htslib::bam::record::{Cigar, CigarString, Record};
use rust_htslib::bam::{self, Read as _};

use crate::error::Result;
use crate::reads::Read as ProjectedRead;
use crate::stats::ColumnStats;

/// Fixed per-base quality score stamped onto every corrected record,
/// mirroring the source's fixed `'<'` FASTQ quality character (ASCII 60,
/// Phred score `60 - 33`). Quality recalculation is out of scope here.
const SYNTHETIC_QUAL: u8 = 60 - 33;

/// Stamps consensus onto every non-covarying position of every read and
/// emits a new record. Consumes the consensus table and the covarying-site
/// set; performs a single pass over the input.
pub struct ReadCorrector<'a> {
    stats: &'a ColumnStats,
    covarying_sites: &'a BTreeSet<i64>,
}

impl<'a> ReadCorrector<'a> {
    pub fn new(stats: &'a ColumnStats, covarying_sites: &'a BTreeSet<i64>) -> Self {
        ReadCorrector {
            stats,
            covarying_sites,
        }
    }

    /// Corrects a single record, returning `None` if it is unmapped (no
    /// projection is possible) or its projection is empty (an
    /// insertion-only read).
    pub fn correct(&self, original: &Record) -> Result<Option<Record>> {
        if original.is_unmapped() {
            return Ok(None);
        }

        let projected = ProjectedRead::from_record(original)?;
        let (mut sequence, positions) = projected.project();
        if sequence.is_empty() {
            return Ok(None);
        }

        for (base, &ref_pos) in sequence.iter_mut().zip(positions.iter()) {
            if !self.covarying_sites.contains(&ref_pos) {
                *base = self.stats.consensus_at(ref_pos);
            }
        }

        let seq_bytes: Vec<u8> = sequence.iter().map(|&c| c as u8).collect();
        let qual = vec![SYNTHETIC_QUAL; seq_bytes.len()];
        let cigar = CigarString(vec![Cigar::Match(seq_bytes.len() as u32)]);

        let mut corrected = Record::new();
        corrected.set(original.qname(), Some(&cigar), &seq_bytes, &qual);
        corrected.set_tid(0);
        corrected.set_pos(positions[0]);
        corrected.set_mapq(original.mapq());
        corrected.set_flags(original.flags());
        corrected.set_mtid(original.mtid());
        corrected.set_mpos(original.mpos());
        corrected.set_insert_size(original.insert_size());
        for tag in original.aux_iter() {
            let (name, value) = tag?;
            corrected.push_aux(name, value)?;
        }

        Ok(Some(corrected))
    }

    /// Runs the corrector over an entire indexed input, writing every
    /// corrected record to `writer` in input order.
    pub fn correct_all(&self, reader: &mut bam::Reader, writer: &mut bam::Writer) -> Result<()> {
        for record in reader.records() {
            let record = record?;
            if let Some(corrected) = self.correct(&record)? {
                writer.write(&corrected)?;
            }
        }
        Ok(())
    }
}
