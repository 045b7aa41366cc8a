//! Chi-square association between categorical samples
//!
//! Both measures report Cramér's V as the score and the classical
//! chi-square tail probability as the p-value.

use crate::measure::{Compute, MeasureInput};
use serde_json::json;
use simx_core::value::{paired, present};
use simx_core::{Error, MeasureResult, Result};
use simx_stats::distribution::chi_square_sf;
use simx_stats::{encode_labels, ContingencyTable};

fn association(table: &ContingencyTable, size_a: usize, size_b: usize) -> MeasureResult {
    let chi = table.chi_square();
    let df = table.degrees_of_freedom();
    MeasureResult::new(table.cramers_v(chi), chi_square_sf(chi, df as f64), size_a, size_b)
        .with_additional_data(json!({ "chiSquare": chi, "df": df }))
}

/// Independence of two paired categorical attributes
pub fn independence(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    if input.set_a.len() != input.set_b.len() {
        return Err(Error::MismatchedLength {
            left: input.set_a.len(),
            right: input.set_b.len(),
        });
    }

    let (a, b): (Vec<_>, Vec<_>) = paired(&input.set_a, &input.set_b).into_iter().unzip();
    let n = a.len();
    let table = ContingencyTable::from_labels(&a, &b);
    if table.rows() < 2 || table.cols() < 2 {
        return Ok(MeasureResult::new(0.0, 1.0, n, n));
    }
    Ok(association(&table, n, n))
}

/// Whether two row groups share one category distribution
///
/// Builds the 2 x k table of group against category, so the expected counts
/// come from the pooled distribution of both groups.
pub fn goodness_of_fit(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    let a = present(&input.set_a);
    let b = present(&input.set_b);

    let (categories, n_categories) = encode_labels(a.iter().chain(b.iter()).copied());
    if n_categories < 2 {
        return Ok(MeasureResult::new(0.0, 1.0, a.len(), b.len()));
    }

    let groups: Vec<usize> = std::iter::repeat(0)
        .take(a.len())
        .chain(std::iter::repeat(1).take(b.len()))
        .collect();
    let table = ContingencyTable::from_codes(&groups, 2, &categories, n_categories);
    Ok(association(&table, a.len(), b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::PermutationConfig;
    use crate::testing::{compute_with, strings};

    fn run(
        kernel: fn(&MeasureInput, &Compute<'_>) -> Result<MeasureResult>,
        a: &[&str],
        b: &[&str],
    ) -> Result<MeasureResult> {
        let input = MeasureInput::new(strings(a), strings(b));
        compute_with(&PermutationConfig::default(), |compute| kernel(&input, compute))
    }

    #[test]
    fn test_independence_reference_values() {
        let a = ["x", "x", "y", "y", "y", "z", "z", "x", "y", "z", "x", "x"];
        let b = ["p", "q", "p", "p", "q", "q", "q", "p", "p", "q", "p", "p"];
        let r = run(independence, &a, &b).unwrap();
        assert!((r.score_value - 0.684_522_774_326_339_4).abs() < 1e-9);
        assert!((r.p_value - 0.060_119_046_664_806_46).abs() < 1e-9);
        assert_eq!(r.additional_data.unwrap()["df"], 2);
    }

    #[test]
    fn test_independence_single_category() {
        let r = run(independence, &["a", "a", "a"], &["x", "y", "z"]).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, 1.0);
        let r = run(independence, &["a", "b", "c"], &["x", "x", "x"]).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_independence_mismatched_lengths() {
        let err = run(independence, &["a", "b"], &["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { .. }));
    }

    #[test]
    fn test_goodness_of_fit() {
        let r = run(goodness_of_fit, &["a", "a", "a", "b"], &["a", "b", "b", "b"]).unwrap();
        assert!((r.score_value - 0.5).abs() < 1e-12);
        assert!((r.p_value - 0.157_299_207_050_285_13).abs() < 1e-9);
    }

    #[test]
    fn test_goodness_of_fit_identical_distributions() {
        let r = run(goodness_of_fit, &["a", "b", "a"], &["b", "a", "a"]).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_goodness_of_fit_single_category() {
        let r = run(goodness_of_fit, &["a", "a"], &["a", "NA", "a"]).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert_eq!(r.set_size_b, 2);
    }
}
