//! Randomization estimators
//!
//! Each estimator turns an observed statistic into a p-value by recomputing
//! the statistic on randomized copies of the input. They own their copies,
//! share nothing mutable and poll the cancel token once per iteration, so any
//! of them can run on any worker and be abandoned mid-way.
//!
//! Every p-value is the fraction of randomized statistics strictly greater
//! than the observed one.

use crate::enrichment::running_extremes;
use crate::measure::PermutationConfig;
use rand::seq::{index, SliceRandom};
use simx_core::{CancelToken, Result, Value};
use simx_stats::encode_labels;

/// Sizes entering a set-similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOverlap {
    pub intersection: usize,
    pub size_a: usize,
    pub size_b: usize,
}

/// Monte-Carlo significance of a set similarity
///
/// Draws `sample_size` values without replacement from `reference`, scores
/// each draw against `fixed` with multiset intersection, and counts draws
/// scoring above `observed`.
pub fn resampled_set_significance(
    observed: f64,
    reference: &[&Value],
    sample_size: usize,
    fixed: &[&Value],
    score: fn(SetOverlap) -> f64,
    config: &PermutationConfig,
    token: &CancelToken,
) -> Result<f64> {
    let iterations = config.iterations.max(1);
    let draw_size = sample_size.min(reference.len());

    // shared code space: reference values first, then values only in `fixed`
    let (codes, n_codes) = encode_labels(reference.iter().copied().chain(fixed.iter().copied()));
    let (reference_codes, fixed_codes) = codes.split_at(reference.len());

    let mut available = vec![0usize; n_codes];
    for &code in fixed_codes {
        available[code] += 1;
    }

    let mut used = vec![0usize; n_codes];
    let mut touched = Vec::with_capacity(draw_size);
    let mut rng = config.rng();
    let mut greater = 0usize;

    for _ in 0..iterations {
        token.check()?;

        let mut intersection = 0;
        for i in index::sample(&mut rng, reference_codes.len(), draw_size).iter() {
            let code = reference_codes[i];
            if used[code] < available[code] {
                used[code] += 1;
                intersection += 1;
                touched.push(code);
            }
        }
        for code in touched.drain(..) {
            used[code] = 0;
        }

        let null = score(SetOverlap {
            intersection,
            size_a: draw_size,
            size_b: fixed.len(),
        });
        if null > observed {
            greater += 1;
        }
    }

    Ok(greater as f64 / iterations as f64)
}

/// Permutation significance for a statistic of a contingency table
///
/// Each iteration shuffles one label array (alternating between the two),
/// rebuilds the co-occurrence counts and evaluates `statistic` on them.
#[allow(clippy::too_many_arguments)]
pub fn label_permutation_significance<F>(
    observed: f64,
    rows: &[usize],
    n_rows: usize,
    cols: &[usize],
    n_cols: usize,
    statistic: F,
    config: &PermutationConfig,
    token: &CancelToken,
) -> Result<f64>
where
    F: Fn(&[u64]) -> f64,
{
    let iterations = config.iterations.max(1);
    let mut rows = rows.to_vec();
    let mut cols = cols.to_vec();
    let mut counts = vec![0u64; n_rows * n_cols];
    let mut rng = config.rng();
    let mut greater = 0usize;

    for iteration in 0..iterations {
        token.check()?;

        if iteration % 2 == 0 {
            rows.shuffle(&mut rng);
        } else {
            cols.shuffle(&mut rng);
        }

        counts.iter_mut().for_each(|c| *c = 0);
        for (&r, &c) in rows.iter().zip(cols.iter()) {
            counts[r * n_cols + c] += 1;
        }

        if statistic(&counts) > observed {
            greater += 1;
        }
    }

    Ok(greater as f64 / iterations as f64)
}

/// Per-category permutation p-values for running-sum enrichment scores
///
/// `labels` are category codes in ranked order, `sizes` the category counts,
/// `observed` the observed extreme per category.
pub fn enrichment_significance(
    labels: &[usize],
    sizes: &[usize],
    observed: &[f64],
    config: &PermutationConfig,
    token: &CancelToken,
) -> Result<Vec<f64>> {
    let iterations = config.iterations.max(1);
    let mut labels = labels.to_vec();
    let mut rng = config.rng();
    let mut greater = vec![0usize; sizes.len()];

    for _ in 0..iterations {
        token.check()?;

        labels.shuffle(&mut rng);
        let permuted = running_extremes(&labels, sizes);
        for (count, (null, obs)) in greater.iter_mut().zip(permuted.iter().zip(observed.iter())) {
            if null.abs() > obs.abs() {
                *count += 1;
            }
        }
    }

    Ok(greater
        .into_iter()
        .map(|count| count as f64 / iterations as f64)
        .collect())
}
