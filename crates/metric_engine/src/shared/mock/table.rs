//! Mock rows for table / chart / metric widgets.

use contracts::shared::dimensions::DimensionValue;
use contracts::shared::metrics::{MetricDefinition, ModifierKind, ResolvedMetricDefinition};
use contracts::shared::widgets::{MockRow, MockTable};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

use super::dimensions::DimensionCombinations;
use super::synthesizer::{draw_base_value, generate_metric_value};
use crate::shared::metrics::VariableResolver;

/// Key grouping columns that share one base value within a row: same
/// indicator and modifiers, any calculation.
fn base_key(resolved: &ResolvedMetricDefinition) -> String {
    let mut key = resolved.indicator.clone().unwrap_or_default();
    for (kind, value) in &resolved.modifiers {
        if *kind == ModifierKind::Calculation {
            continue;
        }
        key.push('|');
        key.push_str(kind.as_str());
        key.push('=');
        key.push_str(&format!("{:?}", value));
    }
    key
}

/// Builds mock data for the columns of one widget.
pub struct MockTableBuilder<'a> {
    columns: Vec<ResolvedMetricDefinition>,
    breakdowns: &'a [String],
    max_combinations: usize,
}

impl<'a> MockTableBuilder<'a> {
    pub fn new(
        columns: &[MetricDefinition],
        breakdowns: &'a [String],
        resolver: &VariableResolver<'_>,
        max_combinations: usize,
    ) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|column| resolver.resolve_definition(column))
                .collect(),
            breakdowns,
            max_combinations,
        }
    }

    /// Columns after variable substitution.
    pub fn columns(&self) -> &[ResolvedMetricDefinition] {
        &self.columns
    }

    fn row<R: Rng>(&self, dimensions: Vec<DimensionValue>, rng: &mut R) -> MockRow {
        let mut bases: HashMap<String, f64> = HashMap::new();
        let mut values = BTreeMap::new();

        for column in &self.columns {
            let indicator = column.indicator.as_deref();
            let base = *bases
                .entry(base_key(column))
                .or_insert_with(|| draw_base_value(indicator, &dimensions, rng));

            let value =
                generate_metric_value(indicator, &dimensions, Some(base), column.calculation(), rng);
            values.insert(column.id.clone(), value);
        }

        MockRow { dimensions, values }
    }

    pub fn build<R: Rng>(&self, rng: &mut R) -> MockTable {
        let combinations = DimensionCombinations::new(self.breakdowns);
        let total_combinations = combinations.len();
        let sampled = combinations.sample(self.max_combinations, rng);

        tracing::debug!(
            "mock table: {} columns, {} of {} combinations",
            self.columns.len(),
            sampled.len(),
            total_combinations
        );

        let rows = sampled
            .into_iter()
            .map(|dimensions| self.row(dimensions, rng))
            .collect();

        MockTable {
            total_combinations,
            rows,
        }
    }
}

/// Mock rows for `columns` split by `breakdowns`, at most `max_combinations` rows.
pub fn build_mock_table<R: Rng>(
    columns: &[MetricDefinition],
    breakdowns: &[String],
    resolver: &VariableResolver<'_>,
    max_combinations: usize,
    rng: &mut R,
) -> MockTable {
    MockTableBuilder::new(columns, breakdowns, resolver, max_combinations).build(rng)
}

/// Single headline value for a metric widget.
pub fn mock_metric_widget_value<R: Rng>(
    definition: &MetricDefinition,
    resolver: &VariableResolver<'_>,
    rng: &mut R,
) -> f64 {
    let resolved = resolver.resolve_definition(definition);
    generate_metric_value(
        resolved.indicator.as_deref(),
        &[],
        None,
        resolved.calculation(),
        rng,
    )
}
