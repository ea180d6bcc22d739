use std::collections::BTreeSet;

use crate::stats::covariation::CovariationResult;

/// Benjamini-Hochberg at target FDR `q`.
///
/// `results` need not be pre-sorted; this sorts by `p_value` ascending
/// itself. Finds the largest 1-based index `k` with `p_k <= q * k / m` —
/// the standard BH definition, not the source's first-failing-index
/// shortcut (see DESIGN.md). Returns the sorted, deduplicated set of
/// reference columns named by any rejected row.
pub fn benjamini_hochberg(results: &[CovariationResult], q: f64) -> BTreeSet<i64> {
    let mut sorted: Vec<&CovariationResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.p_value.partial_cmp(&b.p_value).unwrap());

    let m = sorted.len() as f64;
    if sorted.is_empty() {
        return BTreeSet::new();
    }

    let mut reject_count = 0usize;
    for (idx, r) in sorted.iter().enumerate() {
        let k = (idx + 1) as f64;
        if r.p_value <= q * k / m {
            reject_count = idx + 1;
        }
    }

    let mut sites = BTreeSet::new();
    for r in &sorted[..reject_count] {
        sites.insert(r.col_i);
        sites.insert(r.col_j);
    }
    sites
}
