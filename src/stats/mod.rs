pub mod column_stats;
pub mod covariation;
pub mod fdr;
pub mod fisher;
pub mod pairs;

pub use column_stats::{max_read_length, ColumnStats};
pub use covariation::{CovariationResult, CovariationTester};
pub use fdr::benjamini_hochberg;
pub use fisher::{fisher_exact_two_sided, ContingencyTable};
pub use pairs::enumerate_pairs;
