//! Comparison sessions
//!
//! A session turns cell requests into measure computations. Requests arrive
//! in batches; starting a batch cancels the previous one, so only the most
//! recent request for a view is ever worked on. Results are cached per
//! session and written into their cell only while their ticket is current.

use crate::cache::{CacheKey, MemoryCache, NoCache, ResultCache};
use crate::config::EngineConfig;
use crate::slots::{CellId, ResultSlots};
use crate::source::ColumnSource;
use futures_util::future::join_all;
use parking_lot::Mutex;
use simx_core::{AttributeDescriptor, CancelToken, Error, MeasureResult, Result, Scope, WorkerPool};
use simx_measures::{MeasureInput, MeasureRuntime, MethodManager, SimilarityMeasure};
use simx_stats::StatsContext;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// One generation of requests sharing a cancel token
#[derive(Debug, Clone)]
pub struct Batch {
    id: u64,
    token: CancelToken,
}

impl Batch {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A single comparison to compute
#[derive(Debug, Clone)]
pub struct CellRequest {
    pub cell: CellId,
    pub measure: SimilarityMeasure,
    pub input: MeasureInput,
    /// Identity of the first input, for cache keys
    pub input_a: String,
    /// Identity of the second input, for cache keys
    pub input_b: String,
    /// Whether missing values were filtered out of the inputs upstream
    pub filtered: bool,
}

impl CellRequest {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.measure.id(), &self.input_a, &self.input_b, self.filtered)
    }
}

pub struct ComparisonSession {
    manager: MethodManager,
    runtime: MeasureRuntime,
    cache: Arc<dyn ResultCache>,
    slots: ResultSlots,
    current: Mutex<Option<CancelToken>>,
    batches: AtomicU64,
}

impl ComparisonSession {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let pool = Arc::new(WorkerPool::new(config.pool_config())?);
        let runtime = MeasureRuntime::new(StatsContext::shared(), pool, config.permutation_config());
        let cache: Arc<dyn ResultCache> = if config.cache {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(NoCache)
        };
        Ok(Self::with_parts(MethodManager::new(), runtime, cache))
    }

    pub fn with_parts(manager: MethodManager, runtime: MeasureRuntime, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            manager,
            runtime,
            cache,
            slots: ResultSlots::new(),
            current: Mutex::new(None),
            batches: AtomicU64::new(0),
        }
    }

    pub fn manager(&self) -> &MethodManager {
        &self.manager
    }

    pub fn runtime(&self) -> &MeasureRuntime {
        &self.runtime
    }

    pub fn slots(&self) -> &ResultSlots {
        &self.slots
    }

    /// Start a new batch, cancelling the previous one
    pub fn begin_batch(&self) -> Batch {
        let token = self.runtime.pool.token();
        let previous = self.current.lock().replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
            self.runtime.pool.reap_cancelled();
        }

        let id = self.batches.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Started comparison batch {}", id);
        Batch { id, token }
    }

    /// Compute one cell within `batch`
    ///
    /// Fails with `Error::Aborted` once the batch has been superseded. The
    /// result is cached, and stored in its cell unless a newer request for the
    /// same cell was issued meanwhile.
    pub async fn compare(&self, batch: &Batch, request: CellRequest) -> Result<MeasureResult> {
        batch.token.check()?;

        let key = request.cache_key();
        let ticket = self.slots.issue(&request.cell);

        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for {} on cell {}", request.measure.id(), request.cell);
            self.slots.store(&request.cell, ticket, hit.clone());
            return Ok(hit);
        }

        let outcome = request
            .measure
            .calc_with_token(request.input, &self.runtime, batch.token.child())
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                if e.is_aborted() {
                    warn!("Comparison {} on cell {} aborted", request.measure.id(), request.cell);
                }
                return Err(e);
            }
        };

        self.cache.put(key, result.clone());
        if batch.is_cancelled() {
            return Err(Error::Aborted);
        }
        self.slots.store(&request.cell, ticket, result.clone());
        Ok(result)
    }

    /// Compute several cells of one batch concurrently, in request order
    pub async fn compare_all(&self, batch: &Batch, requests: Vec<CellRequest>) -> Vec<Result<MeasureResult>> {
        join_all(requests.into_iter().map(|request| self.compare(batch, request))).await
    }

    /// Compare two attributes of `source` with the default measure for their
    /// types
    pub async fn compare_attributes(
        &self,
        batch: &Batch,
        source: &dyn ColumnSource,
        a: &AttributeDescriptor,
        b: &AttributeDescriptor,
        scope: Scope,
    ) -> Result<MeasureResult> {
        let measure = self
            .manager
            .default_measure(a.attr_type, b.attr_type, scope)
            .ok_or_else(|| Error::NoMeasure(format!("{} vs {} ({})", a.attr_type, b.attr_type, scope)))?;

        let request = CellRequest {
            cell: CellId::new(format!("{}/{}/{}", a.column, b.column, measure.id())),
            input: MeasureInput::new(source.attribute_data(&a.column)?, source.attribute_data(&b.column)?)
                .with_types(a.attr_type, b.attr_type),
            measure,
            input_a: a.column.clone(),
            input_b: b.column.clone(),
            filtered: false,
        };
        self.compare(batch, request).await
    }

    /// Cancel the current batch and every job still queued or running
    pub fn abort_all(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
        self.runtime.pool.abort_all();
        debug!("Aborted all comparisons");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryTable;
    use simx_core::{ComparisonTable, PoolConfig, Value};
    use simx_measures::PermutationConfig;

    fn session(cache: Arc<dyn ResultCache>) -> ComparisonSession {
        let pool = WorkerPool::new(PoolConfig {
            workers: 2,
            ..PoolConfig::default()
        })
        .unwrap();
        let runtime = MeasureRuntime::new(
            Arc::new(StatsContext::new()),
            Arc::new(pool),
            PermutationConfig::seeded(23),
        );
        ComparisonSession::with_parts(MethodManager::with_table(Arc::new(ComparisonTable::new())), runtime, cache)
    }

    fn table() -> InMemoryTable {
        let numbers = |xs: &[f64]| xs.iter().map(|x| Value::from(*x)).collect::<Vec<_>>();
        let labels = |xs: &[&str]| xs.iter().map(|x| Value::from(*x)).collect::<Vec<_>>();
        InMemoryTable::new()
            .with_column("x", numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .with_column("y", numbers(&[2.0, 4.0, 5.0, 4.0, 5.0]))
            .with_column("kind", labels(&["a", "a", "b", "b", "b"]))
            .with_column("group", labels(&["p", "p", "q", "q", "q"]))
    }

    #[tokio::test]
    async fn test_compare_attributes_default_measure() {
        let session = session(Arc::new(MemoryCache::new()));
        let batch = session.begin_batch();
        let x = AttributeDescriptor::numerical("x");
        let y = AttributeDescriptor::numerical("y");

        let result = session
            .compare_attributes(&batch, &table(), &x, &y, Scope::Attributes)
            .await
            .unwrap();
        assert!(result.score_value > 0.0 && result.score_value <= 1.0);
        assert_eq!(session.slots().get(&CellId::from("x/y/spearman")), Some(result));
    }

    #[tokio::test]
    async fn test_compare_uses_cache() {
        let cache = Arc::new(MemoryCache::new());
        let session = session(cache.clone());
        let batch = session.begin_batch();
        let kind = AttributeDescriptor::categorical("kind", &["a", "b"]);
        let group = AttributeDescriptor::categorical("group", &["p", "q"]);

        let first = session
            .compare_attributes(&batch, &table(), &kind, &group, Scope::Attributes)
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);
        let second = session
            .compare_attributes(&batch, &table(), &kind, &group, Scope::Attributes)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.score_value, 1.0);
    }

    #[tokio::test]
    async fn test_unknown_column() {
        let session = session(Arc::new(NoCache));
        let batch = session.begin_batch();
        let missing = AttributeDescriptor::numerical("missing");
        let x = AttributeDescriptor::numerical("x");
        let err = session
            .compare_attributes(&batch, &table(), &missing, &x, Scope::Attributes)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(_)));
    }

    #[tokio::test]
    async fn test_new_batch_supersedes_old() {
        let session = session(Arc::new(NoCache));
        let first = session.begin_batch();
        let second = session.begin_batch();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(second.id() > first.id());

        let x = AttributeDescriptor::numerical("x");
        let y = AttributeDescriptor::numerical("y");
        let err = session
            .compare_attributes(&first, &table(), &x, &y, Scope::Attributes)
            .await
            .unwrap_err();
        assert!(err.is_aborted());
        assert!(session
            .compare_attributes(&second, &table(), &x, &y, Scope::Attributes)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_abort_all() {
        let session = session(Arc::new(NoCache));
        let batch = session.begin_batch();
        session.abort_all();
        assert!(batch.is_cancelled());
    }
}
