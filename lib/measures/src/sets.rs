//! Set similarity: Jaccard index and overlap coefficient
//!
//! Both compare the value multisets of two row groups. Matching consumes
//! elements pairwise: an `a` in the first group matches at most one `a` in
//! the second.

use crate::measure::{Compute, MeasureInput};
use crate::permutation::{resampled_set_significance, SetOverlap};
use ahash::AHashMap;
use simx_core::value::present;
use simx_core::{MeasureResult, Result, Value, NOT_APPLICABLE};

/// Size of the multiset intersection of `a` and `b`
pub fn multiset_intersection(a: &[&Value], b: &[&Value]) -> usize {
    let mut remaining: AHashMap<&Value, usize> = AHashMap::new();
    for v in b {
        *remaining.entry(*v).or_insert(0) += 1;
    }
    a.iter()
        .filter(|v| match remaining.get_mut(**v) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        })
        .count()
}

/// |A ∩ B| / |A ∪ B|; 0 for two empty sets
pub fn jaccard_score(overlap: SetOverlap) -> f64 {
    let union = overlap.size_a + overlap.size_b - overlap.intersection;
    if union == 0 {
        0.0
    } else {
        overlap.intersection as f64 / union as f64
    }
}

/// |A ∩ B| / min(|A|, |B|); 0 when either set is empty
pub fn overlap_score(overlap: SetOverlap) -> f64 {
    let denominator = overlap.size_a.min(overlap.size_b);
    if denominator == 0 {
        0.0
    } else {
        overlap.intersection as f64 / denominator as f64
    }
}

fn set_similarity(input: &MeasureInput, compute: &Compute<'_>, score: fn(SetOverlap) -> f64) -> Result<MeasureResult> {
    let a = present(&input.set_a);
    let b = present(&input.set_b);
    let overlap = SetOverlap {
        intersection: multiset_intersection(&a, &b),
        size_a: a.len(),
        size_b: b.len(),
    };
    let observed = score(overlap);

    let p_value = if observed >= 1.0 {
        0.0
    } else if observed <= 0.0 {
        1.0
    } else {
        match input.all_data.as_deref().map(present) {
            Some(reference) if !reference.is_empty() => resampled_set_significance(
                observed,
                &reference,
                a.len(),
                &b,
                score,
                compute.config,
                compute.token,
            )?,
            _ => NOT_APPLICABLE,
        }
    };

    Ok(MeasureResult::new(observed, p_value, a.len(), b.len()))
}

pub fn jaccard(input: &MeasureInput, compute: &Compute<'_>) -> Result<MeasureResult> {
    set_similarity(input, compute, jaccard_score)
}

pub fn overlap(input: &MeasureInput, compute: &Compute<'_>) -> Result<MeasureResult> {
    set_similarity(input, compute, overlap_score)
}
