use serde::{Deserialize, Serialize};

/// One concrete value of one breakdown dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionValue {
    /// Dimension identifier (e.g. "product", "section", "month")
    pub id: String,
    pub value: String,
}

impl DimensionValue {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Category a breakdown dimension belongs to, as listed in the breakdown picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownCategory {
    pub id: String,
    pub label: String,
    pub group: String,
}
