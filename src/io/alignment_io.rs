use std::path::Path;

use rust_htslib::bam::{self, Read as _};

use crate::error::{CorrectionError, Result};

/// Opens `path` as an indexed BAM reader after checking for a companion
/// `.bai`/`.csi` index file next to it, so that a missing index is
/// reported as [`CorrectionError::MissingIndex`] rather than an opaque
/// htslib error.
pub fn open_indexed(path: &str) -> Result<bam::IndexedReader> {
    let bai = format!("{path}.bai");
    let csi = format!("{path}.csi");
    if !Path::new(&bai).exists() && !Path::new(&csi).exists() {
        return Err(CorrectionError::MissingIndex {
            path: path.to_string(),
        });
    }

    debug!("opening indexed alignment {}", path);
    Ok(bam::IndexedReader::from_path(path)?)
}

/// Validates the header carries exactly one reference sequence and returns
/// its length.
pub fn validate_header(header: &bam::HeaderView) -> Result<u32> {
    let n = header.target_count() as usize;
    if n != 1 {
        return Err(CorrectionError::MultiReferenceHeader { n });
    }
    Ok(header.target_len(0).unwrap_or(0) as u32)
}

pub fn reference_length(header: &bam::HeaderView) -> u32 {
    header.target_len(0).unwrap_or(0) as u32
}

/// Checks the `@HD SO:coordinate` tag in the header text. The source
/// assumes a coordinate-sorted input but never checks it explicitly; this
/// makes that assumption an explicit, fatal precondition instead.
pub fn check_coordinate_sorted(path: &str, header: &bam::HeaderView) -> Result<()> {
    let text = String::from_utf8_lossy(header.as_bytes());
    let sorted = text
        .lines()
        .find(|line| line.starts_with("@HD"))
        .map(|line| line.contains("SO:coordinate"))
        .unwrap_or(false);

    if !sorted {
        return Err(CorrectionError::UnsortedAlignment {
            path: path.to_string(),
        });
    }
    Ok(())
}
