//! Midranks
//!
//! Tied values share the average of the ranks the whole tied block would
//! occupy. Ranks are 1-based.

use ordered_float::OrderedFloat;

/// Midranks of `values`, in input order
pub fn midranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| OrderedFloat(values[i]));

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // positions start..=end hold ranks start+1 ..= end+1
        let rank = (start + end + 2) as f64 / 2.0;
        for &i in &order[start..=end] {
            ranks[i] = rank;
        }
        start = end + 1;
    }
    ranks
}

/// Midranks of the concatenation of `a` and `b`, split back per sample
pub fn pooled_midranks(a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let mut ranks = midranks(&pooled);
    let ranks_b = ranks.split_off(a.len());
    (ranks, ranks_b)
}
