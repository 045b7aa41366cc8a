//! Running-sum enrichment score
//!
//! Observations are ranked by their numeric value, highest first. Walking
//! down the ranking, each category keeps a running sum that rises when the
//! current observation belongs to it and falls otherwise; the step sizes
//! make every walk end at zero. A category's enrichment score is the walk's
//! extreme of larger magnitude.

use crate::measure::{Compute, MeasureInput};
use crate::permutation::enrichment_significance;
use ahash::AHashSet;
use ordered_float::OrderedFloat;
use serde_json::json;
use simx_core::value::is_numeric;
use simx_core::{AttrType, Error, MeasureResult, Result, Value, NOT_APPLICABLE};
use simx_stats::encode_labels;

/// Enrichment score of every category for a ranked label sequence
///
/// `labels` holds category codes in ranked order and `sizes[c]` the number of
/// occurrences of code `c`. Categories covering none or all of the
/// observations score 0.
pub fn running_extremes(labels: &[usize], sizes: &[usize]) -> Vec<f64> {
    let total = labels.len();
    let steps: Vec<Option<(f64, f64)>> = sizes
        .iter()
        .map(|&n| {
            (n > 0 && n < total).then(|| {
                let hit = ((total - n) as f64 / n as f64).sqrt();
                let miss = (n as f64 / (total - n) as f64).sqrt();
                (hit, miss)
            })
        })
        .collect();

    let mut running = vec![0.0f64; sizes.len()];
    let mut max = vec![0.0f64; sizes.len()];
    let mut min = vec![0.0f64; sizes.len()];

    for &label in labels {
        for (c, step) in steps.iter().enumerate() {
            let Some((hit, miss)) = step else { continue };
            if c == label {
                running[c] += hit;
            } else {
                running[c] -= miss;
            }
            max[c] = max[c].max(running[c]);
            min[c] = min[c].min(running[c]);
        }
    }

    max.into_iter()
        .zip(min)
        .map(|(hi, lo)| if hi >= -lo { hi } else { lo })
        .collect()
}

/// Whether `set_a` holds the ranking values
///
/// Declared types decide. Without them, a side that is not entirely numeric
/// must be the categories; when both sides read as numbers the one with more
/// distinct values is taken as the ranking, since category codes repeat.
fn numeric_side_is_a(input: &MeasureInput) -> bool {
    match input.types {
        Some((AttrType::Numerical, _)) => return true,
        Some((_, AttrType::Numerical)) => return false,
        _ => {}
    }
    match (is_numeric(&input.set_a), is_numeric(&input.set_b)) {
        (true, false) => true,
        (false, true) => false,
        _ => distinct(&input.set_a) >= distinct(&input.set_b),
    }
}

fn distinct(values: &[Value]) -> usize {
    values.iter().filter(|v| !v.is_missing()).collect::<AHashSet<_>>().len()
}

pub fn enrichment_score(input: &MeasureInput, compute: &Compute<'_>) -> Result<MeasureResult> {
    if input.set_a.len() != input.set_b.len() {
        return Err(Error::MismatchedLength {
            left: input.set_a.len(),
            right: input.set_b.len(),
        });
    }

    let (numeric, categorical) = if numeric_side_is_a(input) {
        (&input.set_a, &input.set_b)
    } else {
        (&input.set_b, &input.set_a)
    };

    let mut ranked: Vec<(f64, &Value)> = numeric
        .iter()
        .zip(categorical.iter())
        .filter_map(|(n, c)| Some((n.as_f64()?, c)).filter(|(_, c)| !c.is_missing()))
        .collect();
    ranked.sort_by_key(|(n, _)| std::cmp::Reverse(OrderedFloat(*n)));

    let n = ranked.len();
    let (labels, n_categories) = encode_labels(ranked.iter().map(|(_, c)| *c));
    if n_categories < 2 {
        return Ok(MeasureResult::not_applicable(0.0, n, n));
    }

    let mut sizes = vec![0usize; n_categories];
    let mut names: Vec<Option<&Value>> = vec![None; n_categories];
    for (&code, (_, category)) in labels.iter().zip(ranked.iter()) {
        sizes[code] += 1;
        names[code].get_or_insert(*category);
    }

    let scores = running_extremes(&labels, &sizes);
    let p_values = enrichment_significance(&labels, &sizes, &scores, compute.config, compute.token)?;

    // first category wins ties
    let best = scores
        .iter()
        .enumerate()
        .fold(0, |best, (i, s)| if s.abs() > scores[best].abs() { i } else { best });

    let categories: Vec<_> = (0..n_categories)
        .map(|c| {
            json!({
                "name": names[c].map(|v| v.to_string()).unwrap_or_default(),
                "size": sizes[c],
                "score": scores[c],
                "pValue": p_values[c],
            })
        })
        .collect();

    Ok(MeasureResult::new(scores[best], p_values[best], n, n)
        .with_additional_data(json!({ "categories": categories })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::PermutationConfig;
    use crate::testing::{compute_with, floats, strings};

    fn run(input: MeasureInput) -> Result<MeasureResult> {
        compute_with(&PermutationConfig::seeded(5), |compute| enrichment_score(&input, compute))
    }

    #[test]
    fn test_running_sum_top_category() {
        // three hits then five misses: 3 * sqrt(5/3)
        let es = running_extremes(&[0, 0, 0, 1, 1, 1, 1, 1], &[3, 5]);
        assert!((es[0] - 15f64.sqrt()).abs() < 1e-12);
        assert!((es[1] + 15f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_running_sum_degenerate_category() {
        assert_eq!(running_extremes(&[0, 0, 0], &[3]), vec![0.0]);
    }

    #[test]
    fn test_enrichment_detects_numeric_side() {
        let values = floats(&[9.0, 8.0, 7.0, 3.0, 2.0, 1.0]);
        let labels = strings(&["hi", "hi", "hi", "lo", "lo", "lo"]);

        let forward = run(MeasureInput::new(values.clone(), labels.clone())).unwrap();
        let reverse = run(MeasureInput::new(labels, values)).unwrap();
        assert_eq!(forward.score_value, reverse.score_value);
        assert!((forward.score_value - 3.0).abs() < 1e-12);
        assert_eq!(forward.p_value, 0.0);

        let categories = forward.additional_data.unwrap()["categories"].as_array().unwrap().clone();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["name"], "hi");
        assert_eq!(categories[0]["size"], 3);
    }

    #[test]
    fn test_enrichment_with_numeric_category_codes() {
        let codes = strings(&["1", "1", "1", "2", "2", "2"]);
        let values = floats(&[9.0, 8.0, 7.0, 3.0, 2.0, 1.0]);

        let forward = run(MeasureInput::new(values.clone(), codes.clone())).unwrap();
        let reverse = run(MeasureInput::new(codes.clone(), values.clone())).unwrap();
        assert!((forward.score_value - 3.0).abs() < 1e-12);
        assert_eq!(forward.score_value, reverse.score_value);
        let categories = reverse.additional_data.unwrap()["categories"].as_array().unwrap().len();
        assert_eq!(categories, 2);

        let declared = run(
            MeasureInput::new(codes, values).with_types(AttrType::Categorical, AttrType::Numerical),
        )
        .unwrap();
        assert_eq!(declared.score_value, forward.score_value);
    }

    #[test]
    fn test_declared_types_override_detection() {
        // the categorical side has more distinct codes than the ranking values
        let codes = floats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let values = floats(&[5.0, 5.0, 5.0, 1.0, 1.0, 1.0]);
        let declared = run(
            MeasureInput::new(codes, values).with_types(AttrType::Categorical, AttrType::Numerical),
        )
        .unwrap();
        let categories = declared.additional_data.unwrap()["categories"].as_array().unwrap().len();
        assert_eq!(categories, 6);
    }

    #[test]
    fn test_enrichment_drops_invalid_pairs() {
        let values = vec![Value::from(5.0), Value::Missing, Value::from(1.0), Value::from(3.0)];
        let labels = strings(&["x", "y", "NA", "y"]);
        let r = run(MeasureInput::new(values, labels)).unwrap();
        assert_eq!(r.set_size_a, 2);
    }

    #[test]
    fn test_enrichment_single_category() {
        let r = run(MeasureInput::new(floats(&[1.0, 2.0, 3.0]), strings(&["a", "a", "a"]))).unwrap();
        assert_eq!(r.score_value, 0.0);
        assert_eq!(r.p_value, NOT_APPLICABLE);
    }

    #[test]
    fn test_enrichment_length_mismatch() {
        let err = run(MeasureInput::new(floats(&[1.0, 2.0]), strings(&["a"]))).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { left: 2, right: 1 }));
    }
}
