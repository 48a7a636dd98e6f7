use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::dimensions::DimensionValue;
use crate::shared::metrics::{MetricDefinition, MetricSelection, VariableMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    #[default]
    Table,
    Chart,
    Metric,
}

/// Widget configuration as persisted by the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub kind: WidgetKind,
    /// Table columns or chart series.
    #[serde(default, alias = "series")]
    pub columns: Vec<MetricDefinition>,
    /// Breakdown dimension ids splitting rows (tables) or the x axis (charts).
    #[serde(default)]
    pub breakdowns: Vec<String>,
}

/// Request handled by the demo binary: build a widget from a selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetRequest {
    #[serde(default)]
    pub kind: WidgetKind,
    pub selection: MetricSelection,
    #[serde(default)]
    pub breakdowns: Vec<String>,
    #[serde(default)]
    pub variables: VariableMap,
}

/// One synthesized data row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockRow {
    pub dimensions: Vec<DimensionValue>,
    /// Values keyed by metric definition id.
    pub values: BTreeMap<String, f64>,
}

/// Synthesized rows for one widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockTable {
    pub total_combinations: u64,
    pub rows: Vec<MockRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetResponse {
    pub config: WidgetConfig,
    pub data: MockTable,
}
