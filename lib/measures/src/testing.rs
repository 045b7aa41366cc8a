use crate::measure::{Compute, PermutationConfig};
use simx_core::{CancelToken, Value};
use simx_stats::StatsContext;

pub fn strings(items: &[&str]) -> Vec<Value> {
    items.iter().map(|s| Value::from(*s)).collect()
}

pub fn floats(items: &[f64]) -> Vec<Value> {
    items.iter().map(|n| Value::from(*n)).collect()
}

/// Run `f` against a fresh context and an uncancelled token
pub fn compute_with<T>(config: &PermutationConfig, f: impl FnOnce(&Compute<'_>) -> T) -> T {
    let context = StatsContext::new();
    let token = CancelToken::new();
    f(&Compute {
        context: &context,
        token: &token,
        config,
    })
}
