//! Adjusted Rand Index between two paired categorical labelings

use crate::measure::{Compute, MeasureInput};
use crate::permutation::label_permutation_significance;
use simx_core::value::paired;
use simx_core::{Error, MeasureResult, Result};
use simx_stats::{BinomialCache, ContingencyTable};

/// Pair-counting model of a contingency table with fixed margins
///
/// Shuffling either labeling leaves the margins unchanged, so the expected
/// and maximum index are computed once and only the cell term varies.
struct RandModel<'a> {
    binomial: &'a BinomialCache,
    expected: f64,
    max: f64,
}

impl<'a> RandModel<'a> {
    fn new(table: &ContingencyTable, binomial: &'a BinomialCache) -> Self {
        let rows: f64 = table.row_sums().iter().map(|&n| binomial.choose(n, 2)).sum();
        let cols: f64 = table.col_sums().iter().map(|&n| binomial.choose(n, 2)).sum();
        let pairs = binomial.choose(table.total(), 2);
        Self {
            binomial,
            expected: if pairs > 0.0 { rows * cols / pairs } else { 0.0 },
            max: (rows + cols) / 2.0,
        }
    }

    fn index(&self, counts: &[u64]) -> f64 {
        counts.iter().map(|&n| self.binomial.choose(n, 2)).sum()
    }

    fn adjusted(&self, counts: &[u64]) -> f64 {
        if self.max == self.expected {
            return 0.0;
        }
        (self.index(counts) - self.expected) / (self.max - self.expected)
    }
}

pub fn adjusted_rand(input: &MeasureInput, compute: &Compute<'_>) -> Result<MeasureResult> {
    if input.set_a.len() != input.set_b.len() {
        return Err(Error::MismatchedLength {
            left: input.set_a.len(),
            right: input.set_b.len(),
        });
    }

    let pairs = paired(&input.set_a, &input.set_b);
    let n = pairs.len();
    if n == 0 {
        return Ok(MeasureResult::not_applicable(0.0, 0, 0));
    }

    let (a, b): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
    let (row_codes, n_rows) = simx_stats::encode_labels(a.iter().copied());
    let (col_codes, n_cols) = simx_stats::encode_labels(b.iter().copied());

    if n_rows == 1 && n_cols == 1 {
        return Ok(MeasureResult::new(1.0, 0.0, n, n));
    }

    let table = ContingencyTable::from_codes(&row_codes, n_rows, &col_codes, n_cols);
    let model = RandModel::new(&table, &compute.context.binomial);
    let observed = model.adjusted(table.counts());

    let p_value = if observed == 0.0 {
        1.0
    } else if observed >= 1.0 {
        0.0
    } else {
        label_permutation_significance(
            observed,
            &row_codes,
            n_rows,
            &col_codes,
            n_cols,
            |counts| model.adjusted(counts),
            compute.config,
            compute.token,
        )?
    };

    Ok(MeasureResult::new(observed, p_value, n, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::PermutationConfig;
    use crate::testing::{compute_with, strings};
    use simx_core::Value;

    fn run(a: Vec<Value>, b: Vec<Value>) -> Result<MeasureResult> {
        let input = MeasureInput::new(a, b);
        compute_with(&PermutationConfig::seeded(9), |compute| adjusted_rand(&input, compute))
    }

    #[test]
    fn test_perfect_single_category() {
        let r = run(strings(&["a", "a", "a", "a"]), strings(&["a", "a", "a", "a"])).unwrap();
        assert_eq!(r.score_value, 1.0);
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn test_label_invariance() {
        let r1 = run(strings(&["a", "a", "a", "b"]), strings(&["a", "a", "a", "b"])).unwrap();
        let r2 = run(strings(&["a", "a", "a", "b"]), strings(&["e", "e", "e", "f"])).unwrap();
        assert_eq!(r1.score_value, r2.score_value);
        assert!((r1.score_value - 1.0).abs() < 1e-12);
        assert_eq!(r1.p_value, 0.0);
    }

    #[test]
    fn test_known_value() {
        let r = run(strings(&["a", "a", "b", "c"]), strings(&["a", "a", "b", "b"])).unwrap();
        assert!((r.score_value - 0.571_428_571_428_571_5).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&r.p_value));

        // same partition structure under renamed rows and columns
        let r = run(strings(&["q", "q", "r", "s"]), strings(&["z", "z", "y", "y"])).unwrap();
        assert!((r.score_value - 4.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = run(strings(&["a", "a", "b"]), strings(&["a", "b", "b", "c"])).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { left: 3, right: 4 }));
    }

    #[test]
    fn test_degenerate_one_side() {
        // a constant labeling agrees with nothing beyond chance
        let r = run(strings(&["a", "a", "a"]), strings(&["x", "y", "z"])).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_missing_pairs_removed() {
        let a = vec![Value::from("a"), Value::from("a"), Value::Missing, Value::from("b"), Value::from("b")];
        let b = strings(&["x", "x", "y", "NA", "y"]);
        let r = run(a, b).unwrap();
        assert_eq!(r.set_size_a, 3);
        assert_eq!(r.score_value, 1.0);
    }

    #[test]
    fn test_deterministic_score() {
        let a = strings(&["a", "b", "a", "c", "b", "a"]);
        let b = strings(&["x", "y", "x", "x", "y", "z"]);
        let r1 = run(a.clone(), b.clone()).unwrap();
        let r2 = run(a, b).unwrap();
        assert_eq!(r1.score_value.to_bits(), r2.score_value.to_bits());
    }
}
