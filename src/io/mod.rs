pub mod alignment_io;
pub mod results_io;

pub use alignment_io::{check_coordinate_sorted, open_indexed, reference_length, validate_header};
pub use results_io::{read_precomputed_stats, write_results, StatsRow};
