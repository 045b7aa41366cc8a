use crate::binomial::BinomialCache;
use simx_core::ComparisonTable;
use std::sync::{Arc, OnceLock};

/// Process-scoped caches shared by all measures
///
/// Both caches are append-only and safe to populate concurrently. Tests build
/// a fresh context with [`StatsContext::new`]; applications usually share
/// [`StatsContext::shared`].
pub struct StatsContext {
    pub comparisons: Arc<ComparisonTable>,
    pub binomial: BinomialCache,
}

static SHARED_CONTEXT: OnceLock<Arc<StatsContext>> = OnceLock::new();

impl StatsContext {
    pub fn new() -> Self {
        Self {
            comparisons: Arc::new(ComparisonTable::new()),
            binomial: BinomialCache::new(),
        }
    }

    /// Context backed by the process-wide comparison table
    pub fn shared() -> Arc<StatsContext> {
        SHARED_CONTEXT
            .get_or_init(|| {
                Arc::new(StatsContext {
                    comparisons: ComparisonTable::global().clone(),
                    binomial: BinomialCache::new(),
                })
            })
            .clone()
    }
}

impl Default for StatsContext {
    fn default() -> Self {
        Self::new()
    }
}
