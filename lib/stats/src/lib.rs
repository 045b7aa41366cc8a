//! # SimX Stats
//!
//! Numerical building blocks for the SimX measures:
//!
//! - [`distribution`] - normal, Student's t and chi-square tails (`statrs`)
//! - [`rank`] - midranks with tie blocks
//! - [`contingency`] - contingency tables, chi-square, Cramér's V
//! - [`binomial`] - memoized binomial coefficients
//! - [`descriptive`] - mean, variance, product-moment correlation
//!
//! ## Example
//!
//! ```rust
//! use simx_stats::rank::midranks;
//! use simx_stats::distribution::student_t_two_tailed;
//!
//! assert_eq!(midranks(&[10.0, 20.0, 10.0]), vec![1.5, 3.0, 1.5]);
//! let p = student_t_two_tailed(2.228138851986274, 10.0);
//! assert!((p - 0.05).abs() < 1e-9);
//! ```

pub mod distribution;
pub mod rank;
pub mod contingency;
pub mod binomial;
pub mod descriptive;
pub mod context;

pub use binomial::BinomialCache;
pub use contingency::{encode_labels, ContingencyTable};
pub use context::StatsContext;
pub use rank::{midranks, pooled_midranks};
