//! # SimX Engine
//!
//! Orchestration around the measures: batches with last-request-wins
//! cancellation, per-cell stale-result guards, a session result cache and
//! column sources.

pub mod cache;
pub mod config;
pub mod session;
pub mod slots;
pub mod source;

pub use cache::{CacheKey, MemoryCache, NoCache, ResultCache};
pub use config::EngineConfig;
pub use session::{Batch, CellRequest, ComparisonSession};
pub use slots::{CellId, ResultSlots, Ticket};
pub use source::{ColumnSource, InMemoryTable};
