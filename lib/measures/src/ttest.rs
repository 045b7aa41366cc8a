//! Two-sample t-tests

use crate::measure::{Compute, MeasureInput};
use serde_json::json;
use simx_core::value::numbers;
use simx_core::{MeasureResult, Result};
use simx_stats::descriptive::{mean, same_multiset, variance};
use simx_stats::distribution::student_t_two_tailed;

/// Stand-in for a zero or undefined statistic
pub const T_EPSILON: f64 = 1e-6;

/// Replaces a zero or non-finite statistic with [`T_EPSILON`]
///
/// This includes the infinite t of two constant samples with different
/// means, which therefore reports p close to 1 rather than 0.
fn nudge(t: f64) -> f64 {
    if t == 0.0 || !t.is_finite() {
        T_EPSILON
    } else {
        t
    }
}

/// Samples of a two-sample test, or the early result for degenerate input
fn samples(input: &MeasureInput) -> std::result::Result<(Vec<f64>, Vec<f64>), MeasureResult> {
    let a = numbers(&input.set_a);
    let b = numbers(&input.set_b);
    if a.len() < 2 || b.len() < 2 {
        return Err(MeasureResult::not_applicable(0.0, a.len(), b.len()));
    }
    if same_multiset(&a, &b) {
        return Err(MeasureResult::not_applicable(T_EPSILON, a.len(), b.len()));
    }
    Ok((a, b))
}

fn t_result(t: f64, df: f64, size_a: usize, size_b: usize) -> MeasureResult {
    let t = nudge(t);
    MeasureResult::new(t, student_t_two_tailed(t, df), size_a, size_b).with_additional_data(json!({ "df": df }))
}

/// Student's t-test assuming equal variances
pub fn student(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    let (a, b) = match samples(input) {
        Ok(samples) => samples,
        Err(result) => return Ok(result),
    };
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let df = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * variance(&a) + (n2 - 1.0) * variance(&b)) / df;
    let t = (mean(&a) - mean(&b)) / (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    Ok(t_result(t, df, a.len(), b.len()))
}

/// Welch's unequal-variance t-test
///
/// Degrees of freedom follow Welch-Satterthwaite; when both samples are
/// constant the pooled `n1 + n2 - 2` is used instead.
pub fn welch(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    let (a, b) = match samples(input) {
        Ok(samples) => samples,
        Err(result) => return Ok(result),
    };
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let se_a = variance(&a) / n1;
    let se_b = variance(&b) / n2;
    let se = se_a + se_b;
    let t = (mean(&a) - mean(&b)) / se.sqrt();

    let df = se * se / (se_a * se_a / (n1 - 1.0) + se_b * se_b / (n2 - 1.0));
    let df = if df.is_finite() { df } else { n1 + n2 - 2.0 };
    Ok(t_result(t, df, a.len(), b.len()))
}
