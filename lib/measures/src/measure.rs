//! Measure descriptors and the calling convention shared by all measures
//!
//! A [`SimilarityMeasure`] is a plain record: identity, display strings, the
//! [`Comparison`] and [`Scope`] it applies to, and a kernel function. Kernels
//! are pure, synchronous and re-entrant; [`SimilarityMeasure::calc`] decides
//! whether a kernel runs inline or on the worker pool.

use futures_util::future::{self, BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use simx_core::{AttrType, CancelToken, Comparison, JobLabel, MeasureResult, Result, Scope, Value, WorkerPool};
use simx_stats::StatsContext;
use std::sync::Arc;

/// Kernel signature every measure implements
pub type Kernel = fn(&MeasureInput, &Compute<'_>) -> Result<MeasureResult>;

/// Preferred visualization for a measure's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visualization {
    BarChart,
    BoxPlot,
    ScatterPlot,
    Mosaic,
    RunningSum,
}

/// Where a kernel runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cost {
    /// Cheap closed-form statistic, computed on the calling thread
    Inline,
    /// Randomization-based, submitted to the worker pool
    Pooled,
}

/// Two samples plus an optional full reference column
#[derive(Debug, Clone)]
pub struct MeasureInput {
    pub set_a: Arc<[Value]>,
    pub set_b: Arc<[Value]>,
    pub all_data: Option<Arc<[Value]>>,
    /// Declared types of `set_a` and `set_b`, when the caller knows them
    pub types: Option<(AttrType, AttrType)>,
}

impl MeasureInput {
    pub fn new(set_a: impl Into<Arc<[Value]>>, set_b: impl Into<Arc<[Value]>>) -> Self {
        Self {
            set_a: set_a.into(),
            set_b: set_b.into(),
            all_data: None,
            types: None,
        }
    }

    pub fn with_types(mut self, type_a: AttrType, type_b: AttrType) -> Self {
        self.types = Some((type_a, type_b));
        self
    }

    pub fn with_reference(mut self, all_data: impl Into<Arc<[Value]>>) -> Self {
        self.all_data = Some(all_data.into());
        self
    }

    /// Short description of the input sizes, for diagnostics
    pub fn shape(&self) -> String {
        format!(
            "a={} b={} reference={}",
            self.set_a.len(),
            self.set_b.len(),
            self.all_data
                .as_ref()
                .map(|all| all.len().to_string())
                .unwrap_or_else(|| "none".to_string())
        )
    }
}

/// Randomization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_iterations() -> usize {
    1000
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            seed: None,
        }
    }
}

impl PermutationConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }
}

/// Everything a kernel may read besides its input
pub struct Compute<'a> {
    pub context: &'a StatsContext,
    pub token: &'a CancelToken,
    pub config: &'a PermutationConfig,
}

/// Shared state needed to run measures asynchronously
#[derive(Clone)]
pub struct MeasureRuntime {
    pub context: Arc<StatsContext>,
    pub pool: Arc<WorkerPool>,
    pub config: PermutationConfig,
}

impl MeasureRuntime {
    pub fn new(context: Arc<StatsContext>, pool: Arc<WorkerPool>, config: PermutationConfig) -> Self {
        Self { context, pool, config }
    }
}

/// A registered measure
#[derive(Clone, Serialize)]
pub struct SimilarityMeasure {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    #[serde(rename = "type")]
    comparison: Comparison,
    scope: Scope,
    visualization: Visualization,
    cost: Cost,
    #[serde(skip)]
    kernel: Kernel,
}

impl std::fmt::Debug for SimilarityMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityMeasure")
            .field("id", &self.id)
            .field("comparison", &self.comparison)
            .field("scope", &self.scope)
            .field("cost", &self.cost)
            .finish()
    }
}

impl SimilarityMeasure {
    pub fn new(
        id: &'static str,
        label: &'static str,
        comparison: Comparison,
        scope: Scope,
        kernel: Kernel,
    ) -> Self {
        Self {
            id,
            label,
            description: "",
            comparison,
            scope,
            visualization: Visualization::BarChart,
            cost: Cost::Inline,
            kernel,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn visualize(mut self, visualization: Visualization) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn pooled(mut self) -> Self {
        self.cost = Cost::Pooled;
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn visualization(&self) -> Visualization {
        self.visualization
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Run the kernel synchronously on the current thread
    pub fn compute(&self, input: &MeasureInput, compute: &Compute<'_>) -> Result<MeasureResult> {
        compute.token.check()?;
        (self.kernel)(input, compute)
    }

    /// Run the kernel against the shared context, without cancellation
    pub fn compute_detached(&self, input: &MeasureInput, config: &PermutationConfig) -> Result<MeasureResult> {
        let context = StatsContext::shared();
        let token = CancelToken::new();
        self.compute(
            input,
            &Compute {
                context: &context,
                token: &token,
                config,
            },
        )
    }

    /// Compute asynchronously under a token from the pool root
    pub fn calc(&self, input: MeasureInput, runtime: &MeasureRuntime) -> BoxFuture<'static, Result<MeasureResult>> {
        self.calc_with_token(input, runtime, runtime.pool.token())
    }

    /// Compute asynchronously; cancelling `token` rejects the future with
    /// `Error::Aborted`
    pub fn calc_with_token(
        &self,
        input: MeasureInput,
        runtime: &MeasureRuntime,
        token: CancelToken,
    ) -> BoxFuture<'static, Result<MeasureResult>> {
        match self.cost {
            Cost::Inline => {
                let compute = Compute {
                    context: &runtime.context,
                    token: &token,
                    config: &runtime.config,
                };
                future::ready(self.compute(&input, &compute)).boxed()
            }
            Cost::Pooled => {
                let kernel = self.kernel;
                let context = runtime.context.clone();
                let config = runtime.config.clone();
                let label = JobLabel::new(self.id, input.shape());
                runtime
                    .pool
                    .submit(label, token, move |token| {
                        let compute = Compute {
                            context: &context,
                            token,
                            config: &config,
                        };
                        kernel(&input, &compute)
                    })
                    .boxed()
            }
        }
    }
}
