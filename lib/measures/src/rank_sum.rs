//! Wilcoxon rank-sum test (Mann-Whitney U)
//!
//! Uses the normal approximation without a continuity correction.

use crate::measure::{Compute, MeasureInput};
use crate::ttest::T_EPSILON;
use serde_json::json;
use simx_core::value::numbers;
use simx_core::{MeasureResult, Result};
use simx_stats::descriptive::same_multiset;
use simx_stats::distribution::normal_two_tailed;
use simx_stats::pooled_midranks;

pub fn rank_sum(input: &MeasureInput, _compute: &Compute<'_>) -> Result<MeasureResult> {
    let a = numbers(&input.set_a);
    let b = numbers(&input.set_b);
    if a.is_empty() || b.is_empty() {
        return Ok(MeasureResult::not_applicable(0.0, a.len(), b.len()));
    }

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (ranks_a, _) = pooled_midranks(&a, &b);
    let u1 = ranks_a.iter().sum::<f64>() - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u = u1.min(u2);

    if same_multiset(&a, &b) {
        return Ok(MeasureResult::not_applicable(u, a.len(), b.len()));
    }

    let sigma = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    let z = (u - n1 * n2 / 2.0) / sigma;
    let z = if z == 0.0 { T_EPSILON } else { z };

    Ok(MeasureResult::new(u, normal_two_tailed(z), a.len(), b.len())
        .with_additional_data(json!({ "z": z, "u1": u1, "u2": u2 })))
}
