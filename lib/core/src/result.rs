use serde::{Deserialize, Serialize};

/// p-value sentinel for "significance not computable"
pub const NOT_APPLICABLE: f64 = -1.0;

/// Outcome of one measure computation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeasureResult {
    pub score_value: f64,
    pub p_value: f64,
    pub set_size_a: usize,
    pub set_size_b: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<serde_json::Value>,
}

impl MeasureResult {
    /// NaN scores become 0 and NaN p-values become [`NOT_APPLICABLE`].
    pub fn new(score_value: f64, p_value: f64, set_size_a: usize, set_size_b: usize) -> Self {
        Self {
            score_value: if score_value.is_nan() { 0.0 } else { score_value },
            p_value: if p_value.is_nan() { NOT_APPLICABLE } else { p_value },
            set_size_a,
            set_size_b,
            additional_data: None,
        }
    }

    pub fn not_applicable(score_value: f64, set_size_a: usize, set_size_b: usize) -> Self {
        Self::new(score_value, NOT_APPLICABLE, set_size_a, set_size_b)
    }

    pub fn with_additional_data(mut self, data: serde_json::Value) -> Self {
        self.additional_data = Some(data);
        self
    }

    pub fn has_p_value(&self) -> bool {
        self.p_value >= 0.0
    }
}
