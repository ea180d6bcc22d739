use statrs::distribution::{Discrete, Hypergeometric};

/// A 2x2 contingency table: `x11 = |i=a ∧ j=b|`, `x12 = |i=a ∧ j≠b|`,
/// `x21 = |i≠a ∧ j=b|`, `x22 = |i≠a ∧ j≠b|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    pub x11: u64,
    pub x12: u64,
    pub x21: u64,
    pub x22: u64,
}

impl ContingencyTable {
    pub fn new(x11: u64, x12: u64, x21: u64, x22: u64) -> Self {
        ContingencyTable { x11, x12, x21, x22 }
    }

    pub fn total(&self) -> u64 {
        self.x11 + self.x12 + self.x21 + self.x22
    }

    fn row1(&self) -> u64 {
        self.x11 + self.x12
    }

    fn row2(&self) -> u64 {
        self.x21 + self.x22
    }

    fn col1(&self) -> u64 {
        self.x11 + self.x21
    }

    fn col2(&self) -> u64 {
        self.x12 + self.x22
    }

    /// `true` if any margin is zero, the degenerate case callers short-circuit
    /// to `p = 1.0` for.
    pub fn has_zero_margin(&self) -> bool {
        self.row1() == 0 || self.row2() == 0 || self.col1() == 0 || self.col2() == 0
    }
}

/// Two-sided Fisher's exact test p-value, computed exactly from the
/// hypergeometric distribution fixed by the table's margins: the sum of
/// probabilities of every table sharing those margins whose probability
/// does not exceed the observed table's probability.
///
/// Degenerate margins (any row or column totaling zero) return `1.0`
/// without constructing a distribution, since every such table is certain
/// under its own margins.
pub fn fisher_exact_two_sided(table: &ContingencyTable) -> f64 {
    if table.has_zero_margin() {
        return 1.0;
    }

    let population = table.total();
    let successes = table.col1();
    let draws = table.row1();

    let dist = match Hypergeometric::new(population, successes, draws) {
        Ok(d) => d,
        Err(_) => return 1.0,
    };

    let low = draws.saturating_sub(population - successes);
    let high = draws.min(successes);

    let observed = dist.pmf(table.x11);
    // Exact probabilities can differ by floating point noise at the
    // observed table itself; widen the inclusion threshold slightly so it
    // is never excluded by its own rounding error.
    let epsilon = observed * 1e-7;
    let threshold = observed + epsilon;

    let mut p = 0.0;
    for k in low..=high {
        let pk = dist.pmf(k);
        if pk <= threshold {
            p += pk;
        }
    }

    p.min(1.0)
}
