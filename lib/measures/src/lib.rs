//! # SimX Measures
//!
//! Similarity measures between two samples, and the dispatcher that picks
//! them by attribute type.
//!
//! | Comparison                 | Sets                                   | Attributes            |
//! |----------------------------|----------------------------------------|-----------------------|
//! | categorical vs categorical | Jaccard, overlap, chi-square GOF, ARI  | ARI, chi-square       |
//! | categorical vs numerical   | Student's t, Wilcoxon, Mann-Whitney U  | enrichment score      |
//! | numerical vs numerical     | Welch's t                              | Spearman, Pearson     |
//!
//! ## Example
//!
//! ```rust
//! use simx_core::{AttrType, Scope, Value};
//! use simx_measures::{MeasureInput, MethodManager, PermutationConfig};
//!
//! let manager = MethodManager::new();
//! let measure = manager
//!     .default_measure(AttrType::Categorical, AttrType::Categorical, Scope::Sets)
//!     .unwrap();
//!
//! let a: Vec<Value> = vec!["x".into(), "y".into()];
//! let b: Vec<Value> = vec!["x".into(), "y".into()];
//! let result = measure
//!     .compute_detached(&MeasureInput::new(a, b), &PermutationConfig::default())
//!     .unwrap();
//! assert_eq!(result.score_value, 1.0);
//! ```

pub mod measure;
pub mod permutation;
pub mod registry;
pub mod manager;

pub mod sets;
pub mod rand_index;
pub mod chi_square;
pub mod ttest;
pub mod rank_sum;
pub mod correlation;
pub mod enrichment;

#[cfg(test)]
mod testing;

pub use manager::{MeasureMap, MethodManager};
pub use measure::{Compute, Cost, Kernel, MeasureInput, MeasureRuntime, PermutationConfig, SimilarityMeasure, Visualization};
pub use registry::MeasureRegistry;
