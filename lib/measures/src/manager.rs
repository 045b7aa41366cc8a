//! Measure dispatch by attribute type and scope

use crate::measure::SimilarityMeasure;
use crate::registry::MeasureRegistry;
use ahash::AHashMap;
use simx_core::{AttrType, AttributeDescriptor, Comparison, ComparisonTable, Error, Result, Scope};
use std::sync::Arc;
use tracing::debug;

/// Applicable measures grouped by comparison
pub type MeasureMap = AHashMap<Comparison, Vec<SimilarityMeasure>>;

/// Answers "which measures apply to these attributes"
///
/// Stateless apart from the registry it reads; cheap to clone and share.
#[derive(Clone)]
pub struct MethodManager {
    registry: Arc<MeasureRegistry>,
    comparisons: Arc<ComparisonTable>,
}

impl Default for MethodManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodManager {
    /// Manager over the process-wide registry
    pub fn new() -> Self {
        Self {
            registry: MeasureRegistry::global().clone(),
            comparisons: ComparisonTable::global().clone(),
        }
    }

    /// Manager with its own registry interned in `comparisons`
    pub fn with_table(comparisons: Arc<ComparisonTable>) -> Self {
        Self {
            registry: Arc::new(MeasureRegistry::new(&comparisons)),
            comparisons,
        }
    }

    pub fn registry(&self) -> &MeasureRegistry {
        &self.registry
    }

    /// Measures for one type pair, in registration order; empty if none apply
    pub fn get_measures_by_type(&self, a: AttrType, b: AttrType, scope: Scope) -> Vec<SimilarityMeasure> {
        self.registry
            .iter()
            .filter(|m| m.scope() == scope && m.comparison().compares(a, b))
            .cloned()
            .collect()
    }

    /// The conventional choice for a type pair: the first registered match
    pub fn default_measure(&self, a: AttrType, b: AttrType, scope: Scope) -> Option<SimilarityMeasure> {
        self.registry
            .iter()
            .find(|m| m.scope() == scope && m.comparison().compares(a, b))
            .cloned()
    }

    /// Measures comparing attributes of `a` against attributes of `b`
    pub fn get_attribute_methods(
        &self,
        a: Option<&[AttributeDescriptor]>,
        b: Option<&[AttributeDescriptor]>,
    ) -> Result<MeasureMap> {
        self.get_methods(a, b, Scope::Attributes)
    }

    /// Measures comparing row groups drawn from attributes of `a` and `b`
    pub fn get_set_methods(
        &self,
        a: Option<&[AttributeDescriptor]>,
        b: Option<&[AttributeDescriptor]>,
    ) -> Result<MeasureMap> {
        self.get_methods(a, b, Scope::Sets)
    }

    fn get_methods(
        &self,
        a: Option<&[AttributeDescriptor]>,
        b: Option<&[AttributeDescriptor]>,
        scope: Scope,
    ) -> Result<MeasureMap> {
        let (Some(a), Some(b)) = (a, b) else {
            return Err(Error::InvalidArgument(
                "both attribute lists must be provided".to_string(),
            ));
        };

        let types_a = distinct_types(a);
        let types_b = distinct_types(b);

        let mut methods = MeasureMap::new();
        for &type_a in &types_a {
            for &type_b in &types_b {
                let comparison = self.comparisons.get(type_a, type_b);
                let measures = self.get_measures_by_type(type_a, type_b, scope);
                // (categorical, numerical) and (numerical, categorical) share a key
                methods.entry(comparison).or_default().extend(measures);
            }
        }

        debug!(
            "Resolved {} comparison(s) for {} x {} attributes ({})",
            methods.len(),
            a.len(),
            b.len(),
            scope
        );
        Ok(methods)
    }
}

/// Attribute types in first-seen order
fn distinct_types(attributes: &[AttributeDescriptor]) -> Vec<AttrType> {
    let mut types = Vec::with_capacity(AttrType::ALL.len());
    for attribute in attributes {
        if !types.contains(&attribute.attr_type) {
            types.push(attribute.attr_type);
        }
    }
    types
}
