use contracts::shared::metrics::{
    Indicator, MetricDefinition, ModifierValue, ResolvedMetricDefinition, ResolvedModifier,
    VariableMap, VariableValue,
};

use super::identity::compose_title;
use crate::shared::config::GenerationConfig;
use crate::shared::error::ConfigurationError;

pub const DEFAULT_MAX_VARIABLE_DEPTH: usize = 8;

/// Resolves variable references against one snapshot of the variable map.
///
/// A variable may itself be bound to another variable reference; chains are
/// followed up to `max_depth` hops and cycles are reported, never looped.
pub struct VariableResolver<'a> {
    variables: &'a VariableMap,
    max_depth: usize,
}

impl<'a> VariableResolver<'a> {
    pub fn new(variables: &'a VariableMap) -> Self {
        Self {
            variables,
            max_depth: DEFAULT_MAX_VARIABLE_DEPTH,
        }
    }

    /// Resolver honouring the configured `max_variable_depth`.
    pub fn from_limits(variables: &'a VariableMap, limits: &GenerationConfig) -> Self {
        Self::new(variables).with_max_depth(limits.max_variable_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn variables(&self) -> &'a VariableMap {
        self.variables
    }

    /// Follow `key` to its terminal value. `Ok(None)` when a key is unbound.
    pub fn lookup(&self, key: &str) -> Result<Option<&'a VariableValue>, ConfigurationError> {
        let mut chain = vec![key.to_string()];
        let mut current = key;

        loop {
            let Some(value) = self.variables.get(current) else {
                return Ok(None);
            };
            let VariableValue::Reference(next) = value else {
                return Ok(Some(value));
            };
            if chain.iter().any(|seen| seen == &next.key) {
                chain.push(next.key.clone());
                return Err(ConfigurationError::VariableCycle(chain));
            }
            if chain.len() > self.max_depth {
                return Err(ConfigurationError::ResolutionDepthExceeded {
                    key: key.to_string(),
                    max_depth: self.max_depth,
                });
            }
            chain.push(next.key.clone());
            current = &next.key;
        }
    }

    /// Lenient lookup: broken chains degrade to an unbound key.
    pub fn lookup_or_none(&self, key: &str) -> Option<&'a VariableValue> {
        match self.lookup(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("variable '{}' left unresolved: {}", key, e);
                None
            }
        }
    }

    pub fn try_resolve_indicator(
        &self,
        indicator: &Indicator,
    ) -> Result<Option<String>, ConfigurationError> {
        match indicator {
            Indicator::Literal(key) => Ok(Some(key.clone())),
            Indicator::Variable(var) => Ok(self.lookup(&var.key)?.and_then(indicator_from_value)),
        }
    }

    pub fn resolve_indicator(&self, indicator: &Indicator) -> Option<String> {
        match indicator {
            Indicator::Literal(key) => Some(key.clone()),
            Indicator::Variable(var) => self.lookup_or_none(&var.key).and_then(indicator_from_value),
        }
    }

    pub fn try_resolve_modifier(
        &self,
        value: &ModifierValue,
    ) -> Result<Option<ResolvedModifier>, ConfigurationError> {
        match value {
            ModifierValue::Variable(var) => {
                Ok(self.lookup(&var.key)?.and_then(modifier_from_value))
            }
            other => Ok(literal_modifier(other)),
        }
    }

    pub fn resolve_modifier(&self, value: &ModifierValue) -> Option<ResolvedModifier> {
        match value {
            ModifierValue::Variable(var) => {
                self.lookup_or_none(&var.key).and_then(modifier_from_value)
            }
            other => literal_modifier(other),
        }
    }

    /// Strict resolution: cycles and over-deep chains are errors.
    pub fn try_resolve_definition(
        &self,
        definition: &MetricDefinition,
    ) -> Result<ResolvedMetricDefinition, ConfigurationError> {
        let indicator = self.try_resolve_indicator(&definition.indicator)?;
        let modifiers = definition
            .modifiers
            .iter()
            .map(|(kind, value)| Ok((*kind, self.try_resolve_modifier(value)?)))
            .collect::<Result<_, ConfigurationError>>()?;

        Ok(ResolvedMetricDefinition {
            id: definition.id.clone(),
            indicator,
            modifiers,
            title: self.title_of(definition),
        })
    }

    pub fn resolve_definition(&self, definition: &MetricDefinition) -> ResolvedMetricDefinition {
        ResolvedMetricDefinition {
            id: definition.id.clone(),
            indicator: self.resolve_indicator(&definition.indicator),
            modifiers: definition
                .modifiers
                .iter()
                .map(|(kind, value)| (*kind, self.resolve_modifier(value)))
                .collect(),
            title: self.title_of(definition),
        }
    }

    fn title_of(&self, definition: &MetricDefinition) -> String {
        match &definition.display_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => compose_title(&definition.indicator, &definition.modifiers, self),
        }
    }
}

fn literal_modifier(value: &ModifierValue) -> Option<ResolvedModifier> {
    match value {
        ModifierValue::Literal(s) => Some(ResolvedModifier::Literal(s.clone())),
        ModifierValue::YearsAgo(years) => Some(ResolvedModifier::YearsAgo(*years)),
        ModifierValue::Variable(_) => None,
    }
}

fn indicator_from_value(value: &VariableValue) -> Option<String> {
    match value {
        VariableValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn modifier_from_value(value: &VariableValue) -> Option<ResolvedModifier> {
    match value {
        VariableValue::Text(s) if !s.trim().is_empty() => Some(ResolvedModifier::Literal(s.clone())),
        VariableValue::Text(_) => None,
        VariableValue::YearsAgo(years) => Some(ResolvedModifier::YearsAgo(*years)),
        VariableValue::Number(n) if n.is_finite() => Some(ResolvedModifier::Literal(n.to_string())),
        VariableValue::Number(_) => None,
        VariableValue::Reference(_) => None,
    }
}

/// Substitute every variable reference in `definition`; unbound keys become `None`.
///
/// Follows at most [`DEFAULT_MAX_VARIABLE_DEPTH`] hops; use
/// [`VariableResolver::from_limits`] to apply a configured limit.
pub fn resolve_metric_definition(
    definition: &MetricDefinition,
    variables: &VariableMap,
) -> ResolvedMetricDefinition {
    VariableResolver::new(variables).resolve_definition(definition)
}

pub fn try_resolve_metric_definition(
    definition: &MetricDefinition,
    variables: &VariableMap,
    max_depth: usize,
) -> Result<ResolvedMetricDefinition, ConfigurationError> {
    VariableResolver::new(variables)
        .with_max_depth(max_depth)
        .try_resolve_definition(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::metrics::{ModifierKind, Modifiers, VariableRef, YearsAgo};

    fn definition(indicator: Indicator, modifiers: Modifiers) -> MetricDefinition {
        MetricDefinition {
            id: "test".into(),
            indicator,
            modifiers,
            title: String::new(),
            display_name: None,
        }
    }

    #[test]
    fn test_resolves_variables_and_keeps_literals() {
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKind::SaleType, ModifierValue::variable("tipo"));
        modifiers.insert(ModifierKind::Calculation, ModifierValue::literal("valor"));
        modifiers.insert(ModifierKind::Comparison, ModifierValue::variable("base"));
        let def = definition(Indicator::variable("kpi"), modifiers);

        let variables = VariableMap::from([
            ("kpi".to_string(), VariableValue::Text("importe".into())),
            ("tipo".to_string(), VariableValue::Text("bruto".into())),
            ("base".to_string(), VariableValue::YearsAgo(YearsAgo::new(2))),
        ]);

        let resolved = resolve_metric_definition(&def, &variables);
        assert_eq!(resolved.indicator.as_deref(), Some("importe"));
        assert_eq!(resolved.modifier_literal(ModifierKind::SaleType), Some("bruto"));
        assert_eq!(resolved.modifier_literal(ModifierKind::Calculation), Some("valor"));
        assert_eq!(
            resolved.modifiers.get(&ModifierKind::Comparison),
            Some(&Some(ResolvedModifier::YearsAgo(YearsAgo::new(2))))
        );
        // input untouched
        assert_eq!(def.indicator, Indicator::variable("kpi"));
    }

    #[test]
    fn test_missing_binding_resolves_to_none() {
        let def = definition(Indicator::variable("x"), Modifiers::new());
        let resolved = resolve_metric_definition(&def, &VariableMap::new());
        assert_eq!(resolved.indicator, None);
        assert!(resolved.title.contains("Dinámico"));
    }

    #[test]
    fn test_follows_reference_chain() {
        let variables = VariableMap::from([
            ("a".to_string(), VariableValue::Reference(VariableRef::new("b"))),
            ("b".to_string(), VariableValue::Text("unidades".into())),
        ]);
        let resolver = VariableResolver::new(&variables);
        assert_eq!(
            resolver.resolve_indicator(&Indicator::variable("a")).as_deref(),
            Some("unidades")
        );
    }

    #[test]
    fn test_cycle_is_reported_and_degrades() {
        let variables = VariableMap::from([
            ("a".to_string(), VariableValue::Reference(VariableRef::new("b"))),
            ("b".to_string(), VariableValue::Reference(VariableRef::new("a"))),
        ]);
        let def = definition(Indicator::variable("a"), Modifiers::new());

        let err = try_resolve_metric_definition(&def, &variables, 8).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::VariableCycle(vec!["a".into(), "b".into(), "a".into()])
        );

        let resolved = resolve_metric_definition(&def, &variables);
        assert_eq!(resolved.indicator, None);
    }

    #[test]
    fn test_depth_limit() {
        let variables = VariableMap::from([
            ("v0".to_string(), VariableValue::Reference(VariableRef::new("v1"))),
            ("v1".to_string(), VariableValue::Reference(VariableRef::new("v2"))),
            ("v2".to_string(), VariableValue::Reference(VariableRef::new("v3"))),
            ("v3".to_string(), VariableValue::Text("tickets".into())),
        ]);
        let resolver = VariableResolver::new(&variables).with_max_depth(2);
        assert!(matches!(
            resolver.lookup("v0"),
            Err(ConfigurationError::ResolutionDepthExceeded { max_depth: 2, .. })
        ));

        let resolver = VariableResolver::new(&variables).with_max_depth(3);
        assert_eq!(
            resolver.lookup("v0").unwrap(),
            Some(&VariableValue::Text("tickets".into()))
        );
    }

    #[test]
    fn test_configured_depth_applies() {
        let variables = VariableMap::from([
            ("kpi".to_string(), VariableValue::Reference(VariableRef::new("actual"))),
            ("actual".to_string(), VariableValue::Reference(VariableRef::new("base"))),
            ("base".to_string(), VariableValue::Text("margen".into())),
        ]);
        let def = definition(Indicator::variable("kpi"), Modifiers::new());

        let shallow = GenerationConfig {
            max_variable_depth: 1,
            ..GenerationConfig::default()
        };
        let resolved = VariableResolver::from_limits(&variables, &shallow).resolve_definition(&def);
        assert_eq!(resolved.indicator, None);
        assert_eq!(resolved.title, "Dinámico");

        let resolved = VariableResolver::from_limits(&variables, &GenerationConfig::default())
            .resolve_definition(&def);
        assert_eq!(resolved.indicator.as_deref(), Some("margen"));
        assert_eq!(resolved.title, "Margen");
    }

    #[test]
    fn test_display_name_wins_in_resolved_title() {
        let mut def = definition(Indicator::literal("importe"), Modifiers::new());
        def.display_name = Some("Ventas netas".into());
        let resolved = resolve_metric_definition(&def, &VariableMap::new());
        assert_eq!(resolved.title, "Ventas netas");
    }
}
