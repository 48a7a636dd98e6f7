//! Expands a UI selection (indicators × modifier values) into metric definitions.

use contracts::shared::metrics::{
    Indicator, MetricDefinition, MetricSelection, ModifierKind, ModifierValue, Modifiers,
    SelectionMode, VariableMap, COMPARISON_A_N_OPTION,
};
use std::collections::HashSet;

use super::identity::{compose_title, generate_metric_id};
use super::resolver::VariableResolver;
use crate::shared::config::GenerationConfig;
use crate::shared::indicators::{MetadataRegistry, METADATA_REGISTRY};
use crate::shared::product::{product_len, CartesianProduct};

/// Expansion of one selection against the registry.
pub struct CombinationExpander<'a> {
    registry: &'a MetadataRegistry,
    selection: &'a MetricSelection,
    resolver: VariableResolver<'a>,
    max_definitions: usize,
}

impl<'a> CombinationExpander<'a> {
    pub fn new(
        selection: &'a MetricSelection,
        variables: &'a VariableMap,
        limits: &GenerationConfig,
    ) -> Self {
        Self {
            registry: &*METADATA_REGISTRY,
            selection,
            resolver: VariableResolver::from_limits(variables, limits),
            max_definitions: limits.max_definitions,
        }
    }

    /// Selected values of `kind`: blanks dropped, "a-n" mapped to its payload,
    /// repeats removed keeping the first occurrence.
    fn selected_values(&self, kind: ModifierKind) -> Vec<ModifierValue> {
        let Some(values) = self.selection.modifiers.get(&kind) else {
            return vec![];
        };
        let mut selected: Vec<ModifierValue> = Vec::with_capacity(values.len());
        for value in values.iter().filter(|value| !value.is_blank()) {
            let value = self.normalize(kind, value);
            if !selected.contains(&value) {
                selected.push(value);
            }
        }
        selected
    }

    fn normalize(&self, kind: ModifierKind, value: &ModifierValue) -> ModifierValue {
        match (kind, value) {
            (ModifierKind::Comparison, ModifierValue::Literal(option))
                if option == COMPARISON_A_N_OPTION =>
            {
                match self.selection.years_ago_payload() {
                    Some(years) => ModifierValue::years_ago(years),
                    None => value.clone(),
                }
            }
            _ => value.clone(),
        }
    }

    fn default_value(&self, kind: ModifierKind) -> Option<ModifierValue> {
        self.registry
            .default_value_of(kind)
            .map(ModifierValue::literal)
    }

    /// Every required kind has a selection or a registry default.
    pub fn meets_requirements(&self, indicator: &Indicator) -> bool {
        self.registry
            .required_modifiers_of(indicator)
            .into_iter()
            .all(|kind| {
                !self.selected_values(kind).is_empty() || self.default_value(kind).is_some()
            })
    }

    fn eligible_indicators(&self) -> Vec<&'a Indicator> {
        let mut seen = HashSet::new();
        self.selection
            .indicators
            .iter()
            .filter(|indicator| !indicator.is_blank())
            .filter(|indicator| seen.insert(*indicator))
            .filter(|indicator| {
                let ok = self.meets_requirements(indicator);
                if !ok {
                    tracing::debug!("indicator {:?} dropped: unmet required modifiers", indicator);
                }
                ok
            })
            .collect()
    }

    fn definition(&self, indicator: &Indicator, modifiers: Modifiers) -> MetricDefinition {
        MetricDefinition {
            id: generate_metric_id(indicator, &modifiers),
            title: compose_title(indicator, &modifiers, &self.resolver),
            indicator: indicator.clone(),
            modifiers,
            display_name: None,
        }
    }

    /// First selected value per compatible kind, then default backfill.
    fn single(&self, indicator: &Indicator) -> MetricDefinition {
        let mut modifiers = Modifiers::new();

        for kind in self.registry.modifier_kinds() {
            if !self.registry.is_compatible(indicator, kind) {
                continue;
            }
            if let Some(first) = self.selected_values(kind).into_iter().next() {
                modifiers.insert(kind, first);
            }
        }

        for kind in self.registry.required_modifiers_of(indicator) {
            if modifiers.contains_key(&kind) || !self.registry.is_compatible(indicator, kind) {
                continue;
            }
            if let Some(default) = self.default_value(kind) {
                modifiers.insert(kind, default);
            }
        }

        self.definition(indicator, modifiers)
    }

    /// Relevant kinds with their candidate values, in registry order.
    fn axes(&self, indicator: &Indicator) -> (Vec<ModifierKind>, Vec<Vec<ModifierValue>>) {
        let required = self.registry.required_modifiers_of(indicator);
        let mut kinds = Vec::new();
        let mut values = Vec::new();

        for kind in self.registry.modifier_kinds() {
            if !self.registry.is_compatible(indicator, kind) {
                continue;
            }
            let selected = self.selected_values(kind);
            let candidates = if !selected.is_empty() {
                selected
            } else if required.contains(&kind) {
                match self.default_value(kind) {
                    Some(default) => vec![default],
                    None => continue,
                }
            } else {
                continue;
            };
            kinds.push(kind);
            values.push(candidates);
        }

        (kinds, values)
    }

    /// Full Cartesian product over the relevant kinds, at most `budget` items.
    fn multiple(&self, indicator: &Indicator, budget: usize) -> Vec<MetricDefinition> {
        let (kinds, axes) = self.axes(indicator);

        let total = product_len(&axes);
        if total > budget as u64 {
            tracing::warn!(
                "indicator {:?}: {} combinations, truncated to {}",
                indicator,
                total,
                budget
            );
        }

        CartesianProduct::new(&axes)
            .take(budget)
            .map(|combo| {
                let modifiers = kinds.iter().copied().zip(combo.into_iter().cloned()).collect();
                self.definition(indicator, modifiers)
            })
            .collect()
    }

    pub fn expand(&self) -> Vec<MetricDefinition> {
        let indicators = self.eligible_indicators();
        let Some(first) = indicators.first() else {
            return vec![];
        };

        let definitions = match self.selection.mode {
            SelectionMode::Single => vec![self.single(first)],
            SelectionMode::Multiple => {
                let mut out = Vec::new();
                for indicator in &indicators {
                    let budget = self.max_definitions.saturating_sub(out.len());
                    if budget == 0 {
                        tracing::warn!(
                            "definition limit {} reached, remaining indicators skipped",
                            self.max_definitions
                        );
                        break;
                    }
                    out.extend(self.multiple(indicator, budget));
                }
                out
            }
        };

        tracing::debug!("generated {} metric definitions", definitions.len());
        definitions
    }
}

/// Expand `selection` into metric definitions with distinct ids.
pub fn generate_metric_definitions(
    selection: &MetricSelection,
    variables: &VariableMap,
    limits: &GenerationConfig,
) -> Vec<MetricDefinition> {
    CombinationExpander::new(selection, variables, limits).expand()
}
