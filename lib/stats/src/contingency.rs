//! Contingency tables of paired categorical observations

use ahash::AHashMap;
use std::hash::Hash;

/// Dense codes for labels, assigned in first-seen order
pub fn encode_labels<'a, T, I>(labels: I) -> (Vec<usize>, usize)
where
    T: Hash + Eq + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut codes: AHashMap<&'a T, usize> = AHashMap::new();
    let encoded = labels
        .into_iter()
        .map(|label| {
            let next = codes.len();
            *codes.entry(label).or_insert(next)
        })
        .collect();
    (encoded, codes.len())
}

/// Co-occurrence counts between the categories of two paired samples
#[derive(Debug, Clone)]
pub struct ContingencyTable {
    rows: usize,
    cols: usize,
    counts: Vec<u64>,
    row_sums: Vec<u64>,
    col_sums: Vec<u64>,
    total: u64,
}

impl ContingencyTable {
    /// Build from dense codes; `row_codes[i] < rows`, `col_codes[i] < cols`
    pub fn from_codes(row_codes: &[usize], rows: usize, col_codes: &[usize], cols: usize) -> Self {
        let mut table = Self {
            rows,
            cols,
            counts: vec![0; rows * cols],
            row_sums: vec![0; rows],
            col_sums: vec![0; cols],
            total: 0,
        };
        for (&r, &c) in row_codes.iter().zip(col_codes.iter()) {
            table.counts[r * cols + c] += 1;
            table.row_sums[r] += 1;
            table.col_sums[c] += 1;
            table.total += 1;
        }
        table
    }

    pub fn from_labels<T: Hash + Eq>(a: &[T], b: &[T]) -> Self {
        let (row_codes, rows) = encode_labels(a);
        let (col_codes, cols) = encode_labels(b);
        Self::from_codes(&row_codes, rows, &col_codes, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.cols + col]
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn row_sums(&self) -> &[u64] {
        &self.row_sums
    }

    pub fn col_sums(&self) -> &[u64] {
        &self.col_sums
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.rows.saturating_sub(1) * self.cols.saturating_sub(1)
    }

    /// Pearson's chi-square statistic
    pub fn chi_square(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let n = self.total as f64;
        let mut chi = 0.0;
        for r in 0..self.rows {
            for c in 0..self.cols {
                let expected = self.row_sums[r] as f64 * self.col_sums[c] as f64 / n;
                if expected > 0.0 {
                    let diff = self.count(r, c) as f64 - expected;
                    chi += diff * diff / expected;
                }
            }
        }
        chi
    }

    /// Cramér's V for a given chi-square statistic, in [0, 1]
    pub fn cramers_v(&self, chi_square: f64) -> f64 {
        let k = self.rows.min(self.cols);
        if k < 2 || self.total == 0 {
            return 0.0;
        }
        (chi_square / (self.total as f64 * (k - 1) as f64)).sqrt().min(1.0)
    }
}
