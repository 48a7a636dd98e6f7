use contracts::shared::metrics::{
    Indicator, MetricDefinition, ModifierKind, ModifierValue, Modifiers, ResolvedModifier,
    VariableMap,
};

use super::resolver::VariableResolver;
use crate::shared::indicators::METADATA_REGISTRY;

/// Placeholder shown for a variable with no bound value.
pub const DYNAMIC_PLACEHOLDER: &str = "Dinámico";

/// Order in which modifier labels appear in a title.
pub const TITLE_PRIORITY: [ModifierKind; 6] = [
    ModifierKind::SaleType,
    ModifierKind::Channel,
    ModifierKind::Scope,
    ModifierKind::Timeframe,
    ModifierKind::Comparison,
    ModifierKind::Calculation,
];

const VARIABLE_PREFIX: &str = "var:";

fn indicator_token(indicator: &Indicator) -> String {
    match indicator {
        Indicator::Literal(key) => key.clone(),
        Indicator::Variable(var) => format!("{VARIABLE_PREFIX}{}", var.key),
    }
}

fn modifier_token(value: &ModifierValue) -> String {
    match value {
        ModifierValue::Literal(v) => v.clone(),
        ModifierValue::Variable(var) => format!("{VARIABLE_PREFIX}{}", var.key),
        ModifierValue::YearsAgo(years) => format!("a-n:{}", years.value),
    }
}

/// Stable key of `(indicator, modifiers)`.
///
/// Kinds are sorted by name so the id does not depend on how the map was
/// built, and variable parts carry a `var:` prefix so `{variable: "x"}` never
/// collides with the literal `"x"`.
pub fn generate_metric_id(indicator: &Indicator, modifiers: &Modifiers) -> String {
    let mut parts: Vec<(&str, String)> = modifiers
        .iter()
        .map(|(kind, value)| (kind.as_str(), modifier_token(value)))
        .collect();
    parts.sort();

    let mut id = indicator_token(indicator);
    for (kind, token) in parts {
        id.push('|');
        id.push_str(kind);
        id.push('=');
        id.push_str(&token);
    }
    id
}

fn years_ago_label(years: u32) -> String {
    if years == 1 {
        "vs hace 1 año".to_string()
    } else {
        format!("vs hace {years} años")
    }
}

fn resolved_modifier_label(kind: ModifierKind, value: &ResolvedModifier) -> String {
    match value {
        ResolvedModifier::Literal(v) => METADATA_REGISTRY
            .option_label(kind, v)
            .map(str::to_string)
            .unwrap_or_else(|| v.clone()),
        ResolvedModifier::YearsAgo(years) => years_ago_label(years.value),
    }
}

/// Title built with an existing resolver (shares its depth limit).
pub fn compose_title(
    indicator: &Indicator,
    modifiers: &Modifiers,
    resolver: &VariableResolver<'_>,
) -> String {
    let indicator_label = match resolver.resolve_indicator(indicator) {
        Some(key) => METADATA_REGISTRY
            .indicator_label(&key)
            .map(str::to_string)
            .unwrap_or(key),
        None => DYNAMIC_PLACEHOLDER.to_string(),
    };

    let mut parts = vec![indicator_label];
    for kind in TITLE_PRIORITY {
        let Some(value) = modifiers.get(&kind) else {
            continue;
        };
        let label = match resolver.resolve_modifier(value) {
            Some(resolved) => resolved_modifier_label(kind, &resolved),
            None => DYNAMIC_PLACEHOLDER.to_string(),
        };
        parts.push(label);
    }

    parts.join(" · ")
}

/// Human-readable title; unbound variables show as "Dinámico".
pub fn generate_metric_title(
    indicator: &Indicator,
    modifiers: &Modifiers,
    variables: &VariableMap,
) -> String {
    compose_title(indicator, modifiers, &VariableResolver::new(variables))
}

/// Regenerate a stored title after the variable map changed. A definition
/// with a display name keeps its title. Returns whether the title changed.
pub fn refresh_title(definition: &mut MetricDefinition, resolver: &VariableResolver<'_>) -> bool {
    if definition
        .display_name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty())
    {
        return false;
    }
    let title = compose_title(&definition.indicator, &definition.modifiers, resolver);
    if title == definition.title {
        return false;
    }
    definition.title = title;
    true
}

/// [`refresh_title`] over a batch; returns how many titles changed.
pub fn refresh_titles(definitions: &mut [MetricDefinition], resolver: &VariableResolver<'_>) -> usize {
    definitions
        .iter_mut()
        .map(|definition| refresh_title(definition, resolver))
        .filter(|changed| *changed)
        .count()
}
