use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, Result};
use crate::stats::CovariationResult;

/// One row of the `col_i,col_j,i_char,j_char,p_value` table: the
/// precomputed-statistics short-circuit input and the dispatcher's natural
/// output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRow {
    pub col_i: i64,
    pub col_j: i64,
    pub i_char: char,
    pub j_char: char,
    pub p_value: f64,
}

impl From<&CovariationResult> for StatsRow {
    fn from(r: &CovariationResult) -> Self {
        StatsRow {
            col_i: r.col_i,
            col_j: r.col_j,
            i_char: r.char_i,
            j_char: r.char_j,
            p_value: r.p_value,
        }
    }
}

impl From<StatsRow> for CovariationResult {
    fn from(r: StatsRow) -> Self {
        CovariationResult {
            col_i: r.col_i,
            col_j: r.col_j,
            char_i: r.i_char,
            char_j: r.j_char,
            p_value: r.p_value,
        }
    }
}

/// Reads a precomputed statistics table, short-circuiting the covariation
/// test and dispatcher via the `all_fe_tests` input path. Each row is
/// validated before being accepted as a drop-in replacement for C5/C6's
/// output: `col_i < col_j` (the invariant C4 guarantees for freshly
/// computed pairs) and a finite, non-NaN `p_value`.
pub fn read_precomputed_stats(path: &Path) -> Result<Vec<CovariationResult>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut results = Vec::new();
    for record in reader.deserialize() {
        let row: StatsRow = record.map_err(CorrectionError::Csv)?;
        if row.col_i >= row.col_j {
            return Err(CorrectionError::MalformedStatsRow(format!(
                "col_i ({}) must be less than col_j ({})",
                row.col_i, row.col_j
            )));
        }
        if row.p_value.is_nan() {
            return Err(CorrectionError::MalformedStatsRow(format!(
                "p_value for ({}, {}) is NaN",
                row.col_i, row.col_j
            )));
        }
        results.push(row.into());
    }
    Ok(results)
}

/// Writes the full statistical universe (every tested pair/character
/// combination, not only the rejected set) to `path` as CSV, so that a
/// subsequent run can skip C5/C6 entirely via [`read_precomputed_stats`].
pub fn write_results(path: &Path, results: &[CovariationResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for r in results {
        writer.serialize(StatsRow::from(r))?;
    }
    writer.flush()?;
    Ok(())
}
