use crate::stats::column_stats::ColumnStats;

/// C4 — enumerates all `(i, j)` pairs, `i < j`, drawn from the interesting
/// column set, filtered by `j - i <= max_read_length`, in lexicographic
/// order. Finite and deterministic given `stats` and `max_read_length`, but
/// expressed as a lazy iterator so the dispatcher (C6) can block it up
/// without materializing the full pair list up front.
pub fn enumerate_pairs(
    stats: &ColumnStats,
    max_read_length: u32,
) -> impl Iterator<Item = (i64, i64)> + '_ {
    let columns: Vec<i64> = stats.interesting_columns().collect();
    let span = max_read_length as i64;

    columns
        .clone()
        .into_iter()
        .enumerate()
        .flat_map(move |(idx, i)| {
            columns[idx + 1..]
                .iter()
                .take_while(move |&&j| j - i <= span)
                .map(move |&j| (i, j))
        })
}
