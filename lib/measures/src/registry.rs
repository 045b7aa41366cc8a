//! The static measure table
//!
//! Built once, in a fixed order, and never mutated afterwards. Order matters:
//! the first measure registered for a comparison and scope is its default.

use crate::measure::{SimilarityMeasure, Visualization};
use crate::{chi_square, correlation, enrichment, rand_index, rank_sum, sets, ttest};
use simx_core::{AttrType, ComparisonTable, Scope};
use std::sync::{Arc, OnceLock};

use simx_core::AttrType::{Categorical, Numerical};

pub struct MeasureRegistry {
    measures: Vec<SimilarityMeasure>,
}

static GLOBAL_REGISTRY: OnceLock<Arc<MeasureRegistry>> = OnceLock::new();

impl MeasureRegistry {
    /// Registry whose comparisons are interned in `table`
    pub fn new(table: &ComparisonTable) -> Self {
        Self {
            measures: default_measures(table),
        }
    }

    /// Registry over the process-wide comparison table
    pub fn global() -> &'static Arc<MeasureRegistry> {
        GLOBAL_REGISTRY.get_or_init(|| Arc::new(MeasureRegistry::new(ComparisonTable::global())))
    }

    pub fn by_id(&self, id: &str) -> Option<&SimilarityMeasure> {
        self.measures.iter().find(|m| m.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimilarityMeasure> {
        self.measures.iter()
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }
}

pub fn default_measures(table: &ComparisonTable) -> Vec<SimilarityMeasure> {
    let cat_cat = table.get(Categorical, Categorical);
    let cat_num = table.get(Categorical, Numerical);
    let num_num = table.get(Numerical, Numerical);

    vec![
        SimilarityMeasure::new("jaccard", "Jaccard Index", cat_cat.clone(), Scope::Sets, sets::jaccard)
            .describe("Size of the intersection of two sets divided by the size of their union.")
            .visualize(Visualization::BarChart)
            .pooled(),
        SimilarityMeasure::new("overlap", "Overlap Coefficient", cat_cat.clone(), Scope::Sets, sets::overlap)
            .describe("Size of the intersection of two sets divided by the size of the smaller set.")
            .visualize(Visualization::BarChart)
            .pooled(),
        SimilarityMeasure::new(
            "chi_square_gof",
            "Chi-Square Goodness of Fit",
            cat_cat.clone(),
            Scope::Sets,
            chi_square::goodness_of_fit,
        )
        .describe("Tests whether two groups follow the same category distribution.")
        .visualize(Visualization::Mosaic),
        SimilarityMeasure::new(
            "adjusted_rand_sets",
            "Adjusted Rand Index",
            cat_cat.clone(),
            Scope::Sets,
            rand_index::adjusted_rand,
        )
        .describe("Chance-corrected agreement between two paired labelings.")
        .visualize(Visualization::Mosaic)
        .pooled(),
        SimilarityMeasure::new("student_t_test", "Student's t-Test", cat_num.clone(), Scope::Sets, ttest::student)
            .describe("Compares the means of two groups assuming equal variances.")
            .visualize(Visualization::BoxPlot),
        SimilarityMeasure::new(
            "wilcoxon_rank_sum",
            "Wilcoxon Rank-Sum Test",
            cat_num.clone(),
            Scope::Sets,
            rank_sum::rank_sum,
        )
        .describe("Tests whether values of one group tend to rank higher than the other.")
        .visualize(Visualization::BoxPlot),
        SimilarityMeasure::new("mann_whitney_u", "Mann-Whitney U Test", cat_num.clone(), Scope::Sets, rank_sum::rank_sum)
            .describe("Tests whether values of one group tend to rank higher than the other.")
            .visualize(Visualization::BoxPlot),
        SimilarityMeasure::new("welch_t_test", "Welch's t-Test", num_num.clone(), Scope::Sets, ttest::welch)
            .describe("Compares the means of two groups without assuming equal variances.")
            .visualize(Visualization::BoxPlot),
        SimilarityMeasure::new(
            "adjusted_rand",
            "Adjusted Rand Index",
            cat_cat.clone(),
            Scope::Attributes,
            rand_index::adjusted_rand,
        )
        .describe("Chance-corrected agreement between two categorical attributes.")
        .visualize(Visualization::Mosaic)
        .pooled(),
        SimilarityMeasure::new("chi_square", "Chi-Square Test", cat_cat, Scope::Attributes, chi_square::independence)
            .describe("Association between two categorical attributes as Cramér's V.")
            .visualize(Visualization::Mosaic),
        SimilarityMeasure::new(
            "spearman",
            "Spearman's Rank Correlation",
            num_num.clone(),
            Scope::Attributes,
            correlation::spearman,
        )
        .describe("Monotonic association between two numerical attributes.")
        .visualize(Visualization::ScatterPlot),
        SimilarityMeasure::new("pearson", "Pearson Correlation", num_num, Scope::Attributes, correlation::pearson)
            .describe("Linear association between two numerical attributes.")
            .visualize(Visualization::ScatterPlot),
        SimilarityMeasure::new(
            "enrichment_score",
            "Enrichment Score",
            cat_num,
            Scope::Attributes,
            enrichment::enrichment_score,
        )
        .describe("Whether the members of a category cluster at one end of a numerical ranking.")
        .visualize(Visualization::RunningSum)
        .pooled(),
    ]
}
