use crate::types::AttrType;
use serde::{Deserialize, Serialize};

/// A category of a categorical attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: String,
}

/// Attribute (column) description supplied by the table adapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub label: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

impl AttributeDescriptor {
    pub fn numerical(column: &str) -> Self {
        Self {
            label: column.to_string(),
            attr_type: AttrType::Numerical,
            column: column.to_string(),
            categories: None,
        }
    }

    pub fn categorical(column: &str, categories: &[&str]) -> Self {
        Self {
            label: column.to_string(),
            attr_type: AttrType::Categorical,
            column: column.to_string(),
            categories: Some(
                categories
                    .iter()
                    .map(|name| Category {
                        name: name.to_string(),
                        label: name.to_string(),
                        color: String::new(),
                    })
                    .collect(),
            ),
        }
    }
}
