//! # SimX Core
//!
//! Core library for the SimX statistical comparison engine.
//!
//! This crate provides the fundamental data model and runtime plumbing:
//!
//! - [`AttrType`], [`Comparison`], [`Scope`] - the keys measures are selected by
//! - [`Value`] - raw cell values with missing-value filtering
//! - [`AttributeDescriptor`] - column descriptions supplied by the table adapter
//! - [`MeasureResult`] - the outcome of a measure computation
//! - [`WorkerPool`] - bounded pool running cancellable permutation jobs
//!
//! ## Example
//!
//! ```rust
//! use simx_core::{AttrType, Comparison};
//!
//! let a = Comparison::get(AttrType::Numerical, AttrType::Categorical);
//! let b = Comparison::get(AttrType::Categorical, AttrType::Numerical);
//! assert!(a.same_instance(&b));
//! ```

pub mod types;
pub mod value;
pub mod attribute;
pub mod result;
pub mod error;
pub mod cancel;

/// Bounded worker pool with cooperative cancellation
pub mod pool;

pub use types::{AttrType, Comparison, ComparisonKey, ComparisonTable, Scope};
pub use value::Value;
pub use attribute::{AttributeDescriptor, Category};
pub use result::{MeasureResult, NOT_APPLICABLE};
pub use error::{Error, Result};
pub use cancel::CancelToken;
pub use pool::{JobHandle, JobLabel, PoolConfig, WorkerPool};
