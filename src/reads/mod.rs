pub mod alignment_record;
pub mod cigar_utils;

pub use alignment_record::{
    inserted_bases, is_gap, is_observed, reference_footprint_length, RefOp, Read,
};
pub use cigar_utils::CigarProjector;
