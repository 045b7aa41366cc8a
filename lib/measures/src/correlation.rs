//! Spearman and Pearson correlation of paired numeric attributes

use crate::measure::{Compute, MeasureInput};
use simx_core::value::paired_numbers;
use simx_core::{Error, MeasureResult, Result};
use simx_stats::descriptive::pearson_r;
use simx_stats::distribution::student_t_two_tailed;
use simx_stats::midranks;

/// Score and p-value for a correlation over `n` pairs
fn correlation_result(r: Option<f64>, n: usize) -> MeasureResult {
    let Some(r) = r else {
        return MeasureResult::not_applicable(0.0, n, n);
    };
    if n < 3 {
        return MeasureResult::not_applicable(r, n, n);
    }
    if r.abs() >= 1.0 {
        return MeasureResult::new(r, 0.0, n, n);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    MeasureResult::new(r, student_t_two_tailed(t, df), n, n)
}

fn paired_samples(input: &MeasureInput) -> Result<(Vec<f64>, Vec<f64>)> {
    if input.set_a.len() != input.set_b.len() {
        return Err(Error::MismatchedLength {
            left: input.set_a.len(),
            right: input.set_b.len(),
        });
    }
    Ok(paired_numbers(&input.set_a, &input.set_b))
}

pub fn spearman(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    let (x, y) = paired_samples(input)?;
    Ok(correlation_result(pearson_r(&midranks(&x), &midranks(&y)), x.len()))
}

pub fn pearson(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    let (x, y) = paired_samples(input)?;
    Ok(correlation_result(pearson_r(&x, &y), x.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::PermutationConfig;
    use crate::testing::{compute_with, floats};
    use simx_core::{Value, NOT_APPLICABLE};

    const X: [f64; 12] = [2.1, 3.4, 1.9, 5.6, 4.4, 3.4, 6.1, 2.8, 4.9, 5.2, 3.0, 4.4];
    const Y: [f64; 12] = [1.2, 2.8, 1.1, 4.9, 3.3, 2.5, 5.8, 2.2, 3.9, 4.1, 3.6, 2.0];

    fn run(
        kernel: fn(&MeasureInput, &Compute<'_>) -> Result<MeasureResult>,
        a: Vec<Value>,
        b: Vec<Value>,
    ) -> Result<MeasureResult> {
        let input = MeasureInput::new(a, b);
        compute_with(&PermutationConfig::default(), |compute| kernel(&input, compute))
    }

    #[test]
    fn test_spearman_reference_values() {
        let r = run(spearman, floats(&X), floats(&Y)).unwrap();
        assert!((r.score_value - 0.866_672_001_690_792_3).abs() < 1e-6);
        assert!((r.p_value - 0.000_264_135_432_719_459_09).abs() < 1e-6);
    }

    #[test]
    fn test_pearson_reference_values() {
        let r = run(pearson, floats(&X), floats(&Y)).unwrap();
        assert!((r.score_value - 0.882_858_103_029_734_4).abs() < 1e-6);
        assert!((r.p_value - 0.000_142_259_039_200_099_46).abs() < 1e-6);
    }

    #[test]
    fn test_spearman_monotonic() {
        let r = run(spearman, floats(&[1.0, 2.0, 3.0, 4.0]), floats(&[1.0, 4.0, 9.0, 16.0])).unwrap();
        assert_eq!(r.score_value, 1.0);
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn test_paired_removal() {
        let mut a = floats(&X);
        let mut b = floats(&Y);
        a.push(Value::Missing);
        b.push(Value::from(100.0));
        a.push(Value::from(-50.0));
        b.push(Value::from("NA"));
        let r = run(spearman, a, b).unwrap();
        assert_eq!(r.set_size_a, 12);
        assert!((r.score_value - 0.866_672_001_690_792_3).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs() {
        let r = run(pearson, floats(&[1.0, 1.0, 1.0]), floats(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, NOT_APPLICABLE);

        let r = run(spearman, floats(&[1.0, 2.0]), floats(&[2.0, 1.0])).unwrap();
        assert_eq!(r.score_value, -1.0);
        assert_eq!(r.p_value, NOT_APPLICABLE);
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = run(pearson, floats(&[1.0, 2.0, 3.0]), floats(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { left: 3, right: 2 }));
    }

    #[test]
    fn test_deterministic() {
        let r1 = run(spearman, floats(&X), floats(&Y)).unwrap();
        let r2 = run(spearman, floats(&X), floats(&Y)).unwrap();
        assert_eq!(r1.score_value.to_bits(), r2.score_value.to_bits());
        assert_eq!(r1.p_value.to_bits(), r2.p_value.to_bits());
    }
}
