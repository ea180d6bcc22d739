use thiserror::Error;

/// Error conditions that abort a correction run before or during execution.
///
/// Degenerate-but-expected conditions (a zero-margin contingency table, an
/// empty FDR rejection set, an empty block) are *not* represented here —
/// they are valid `Ok` values with documented semantics, per the error
/// handling design: only malformed input and worker failure are fatal.
#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("alignment file {path} has no companion index (.bai/.csi)")]
    MissingIndex { path: String },

    #[error("alignment header declares {n} reference sequences; exactly one is supported")]
    MultiReferenceHeader { n: usize },

    #[error("alignment file {path} does not appear to be coordinate-sorted")]
    UnsortedAlignment { path: String },

    #[error("covariation worker failed, aborting run with no partial output: {0}")]
    WorkerFailed(String),

    #[error("failed to build scoped thread pool: {0}")]
    ThreadPoolInit(String),

    #[error("invalid value for --{flag}: {value:?}")]
    InvalidConfig { flag: &'static str, value: String },

    #[error("precomputed statistics row is malformed: {0}")]
    MalformedStatsRow(String),

    #[error("read {qname} has unsupported CIGAR operation {op}; only M/I/D are handled")]
    UnsupportedCigarOp { qname: String, op: String },

    #[error(transparent)]
    Htslib(#[from] rust_htslib::errors::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CorrectionError>;
