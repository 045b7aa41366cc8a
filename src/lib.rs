//! # SimX
//!
//! Statistical similarity between columns and row groups of a table.
//!
//! SimX picks a measure from the semantic types of the two things being
//! compared (categorical or numerical) and the scope of the comparison
//! (two whole attributes, or two row groups of one attribute), runs it, and
//! reports a score with a p-value. Randomization-based p-values run on a
//! bounded worker pool and can be cancelled as a batch.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! simx measures --scope sets
//! simx compare --a a.json --b b.json --type-a categorical --type-b categorical --scope sets
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use simx::prelude::*;
//!
//! # async fn run() -> simx::Result<()> {
//! let session = ComparisonSession::new(&EngineConfig::default())?;
//! let table = InMemoryTable::from_path("table.json")?;
//!
//! let batch = session.begin_batch();
//! let result = session
//!     .compare_attributes(
//!         &batch,
//!         &table,
//!         &AttributeDescriptor::numerical("age"),
//!         &AttributeDescriptor::numerical("income"),
//!         Scope::Attributes,
//!     )
//!     .await?;
//! println!("score {} p {}", result.score_value, result.p_value);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`simx-core`](https://docs.rs/simx-core) - types, comparisons, values, results, cancellation, worker pool
//! - [`simx-stats`](https://docs.rs/simx-stats) - distributions, ranks, contingency tables, binomial cache
//! - [`simx-measures`](https://docs.rs/simx-measures) - measures, permutation estimators, registry, dispatcher
//! - [`simx-engine`](https://docs.rs/simx-engine) - sessions, batches, result cache, column sources

// Re-export core types
pub use simx_core::{
    AttrType, Comparison, ComparisonTable, Scope,
    Value, AttributeDescriptor, Category,
    MeasureResult, NOT_APPLICABLE,
    CancelToken, WorkerPool, PoolConfig,
    Error, Result,
};

// Re-export measures
pub use simx_measures::{
    MeasureInput, MeasureRegistry, MeasureRuntime, MethodManager,
    PermutationConfig, SimilarityMeasure,
};

// Re-export engine
pub use simx_engine::{
    Batch, CellId, CellRequest, ComparisonSession, EngineConfig,
    InMemoryTable, ColumnSource, MemoryCache, ResultCache,
};

pub use simx_stats::StatsContext;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttrType, Comparison, Scope, Value,
        AttributeDescriptor, MeasureResult, NOT_APPLICABLE,
        MeasureInput, MethodManager, PermutationConfig, SimilarityMeasure,
        ComparisonSession, EngineConfig, InMemoryTable, ColumnSource,
        Error, Result,
    };
}
