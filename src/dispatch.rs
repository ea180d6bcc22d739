use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rust_htslib::bam::{self, Read as _};

use crate::error::{CorrectionError, Result};
use crate::reads::Read;
use crate::stats::{enumerate_pairs, ColumnStats, CovariationResult, CovariationTester};

/// Splits the pair stream into fixed-size blocks and tests each
/// concurrently, one `IndexedReader` handle per worker. No inter-worker
/// communication; any worker failure is fatal and aborts the run with no
/// partial output.
///
/// `ncpu` is realized as a scoped `rayon::ThreadPool` owned by this struct
/// rather than the process-global pool: a `Dispatcher` is a library entry
/// point, and mutating `rayon`'s global pool would make a second
/// `Dispatcher::new` call in the same process silently inherit the first
/// one's thread count (`build_global()` only succeeds once per process).
pub struct Dispatcher {
    pub bam_path: String,
    pub block_size: usize,
    pool: ThreadPool,
}

impl Dispatcher {
    pub fn new(bam_path: impl Into<String>, block_size: usize, ncpu: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(ncpu)
            .build()
            .map_err(|e| CorrectionError::ThreadPoolInit(e.to_string()))?;
        Ok(Dispatcher {
            bam_path: bam_path.into(),
            block_size,
            pool,
        })
    }

    /// Runs the full dispatch: enumerates pairs from `stats`, blocks them,
    /// tests each block concurrently on this dispatcher's own scoped pool,
    /// and returns the merged results sorted by `p_value` ascending (ties
    /// broken on `(col_i, col_j, char_i, char_j)` for determinism).
    pub fn run(&self, stats: &ColumnStats, max_read_length: u32) -> Result<Vec<CovariationResult>> {
        let pairs: Vec<(i64, i64)> = enumerate_pairs(stats, max_read_length).collect();
        if pairs.is_empty() {
            info!("no interesting-column pairs to test, skipping covariation testing entirely");
            return Ok(Vec::new());
        }

        let blocks: Vec<&[(i64, i64)]> = pairs.chunks(self.block_size.max(1)).collect();
        debug!(
            "dispatching {} pairs across {} blocks of up to {} pairs each on {} threads",
            pairs.len(),
            blocks.len(),
            self.block_size,
            self.pool.current_num_threads()
        );

        let mut results: Vec<CovariationResult> = self
            .pool
            .install(|| {
                blocks
                    .par_iter()
                    .map(|block| self.run_block(block))
                    .collect::<Result<Vec<Vec<CovariationResult>>>>()
            })?
            .into_iter()
            .flatten()
            .collect();

        results.sort_by(|a, b| {
            a.p_value
                .partial_cmp(&b.p_value)
                .unwrap()
                .then_with(|| a.col_i.cmp(&b.col_i))
                .then_with(|| a.col_j.cmp(&b.col_j))
                .then_with(|| a.char_i.cmp(&b.char_i))
                .then_with(|| a.char_j.cmp(&b.char_j))
        });

        info!("covariation testing produced {} results", results.len());
        Ok(results)
    }

    fn run_block(&self, block: &[(i64, i64)]) -> Result<Vec<CovariationResult>> {
        if block.is_empty() {
            return Ok(Vec::new());
        }

        let w_min = block.iter().map(|&(i, j)| i.min(j)).min().unwrap();
        let w_max = block.iter().map(|&(i, j)| i.max(j)).max().unwrap();

        let mut reader = bam::IndexedReader::from_path(&self.bam_path)
            .map_err(|e| CorrectionError::WorkerFailed(e.to_string()))?;
        reader
            .fetch((0, w_min, w_max + 1))
            .map_err(|e| CorrectionError::WorkerFailed(e.to_string()))?;

        let mut reads = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CorrectionError::WorkerFailed(e.to_string()))?;
            if record.is_unmapped() {
                continue;
            }
            let read = Read::from_record(&record).map_err(|e| CorrectionError::WorkerFailed(e.to_string()))?;
            reads.push(read);
        }

        Ok(CovariationTester::test_block(&reads, block))
    }
}
