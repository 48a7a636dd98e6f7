//! Metric definitions: indicator + modifiers, as stored in widget configuration.
//!
//! JSON shapes follow what the dashboard UI writes into `config.columns` /
//! `config.series`: indicators and modifier values are either bare strings or
//! small tagged objects (`{"type":"variable","key":..}`, `{"type":"a-n","value":..}`).

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Key in [`MetricSelection::custom_values`] carrying the "N years ago" payload.
pub const COMPARISON_A_N_VALUE_KEY: &str = "comparison_a_n_value";

/// Literal comparison option that turns into [`YearsAgo`] when a payload is present.
pub const COMPARISON_A_N_OPTION: &str = "a-n";

// ---------------------------------------------------------------------------
// Tagged building blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableTag {
    #[serde(rename = "variable")]
    Variable,
}

/// Placeholder resolved against the active variable map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableRef {
    #[serde(rename = "type")]
    pub tag: VariableTag,
    pub key: String,
}

impl VariableRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            tag: VariableTag::Variable,
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearsAgoTag {
    #[serde(rename = "a-n")]
    YearsAgo,
}

/// Structured comparison baseline: "N years ago".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearsAgo {
    #[serde(rename = "type")]
    pub tag: YearsAgoTag,
    pub value: u32,
}

impl YearsAgo {
    pub fn new(value: u32) -> Self {
        Self {
            tag: YearsAgoTag::YearsAgo,
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// Measured quantity of a metric: a registry key or a variable-bound one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indicator {
    Variable(VariableRef),
    Literal(String),
}

impl Indicator {
    pub fn literal(key: impl Into<String>) -> Self {
        Indicator::Literal(key.into())
    }

    pub fn variable(key: impl Into<String>) -> Self {
        Indicator::Variable(VariableRef::new(key))
    }

    /// An empty literal means "nothing selected".
    pub fn is_blank(&self) -> bool {
        match self {
            Indicator::Literal(key) => key.trim().is_empty(),
            Indicator::Variable(var) => var.key.trim().is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Axis refining an indicator. Declaration order is the registry enumeration
/// order and drives `Ord`, so `BTreeMap<ModifierKind, _>` iterates stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierKind {
    SaleType,
    Scope,
    Timeframe,
    Comparison,
    Calculation,
    Channel,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 6] = [
        ModifierKind::SaleType,
        ModifierKind::Scope,
        ModifierKind::Timeframe,
        ModifierKind::Comparison,
        ModifierKind::Calculation,
        ModifierKind::Channel,
    ];

    /// Kinds every variable-bound indicator accepts.
    pub const STANDARD: [ModifierKind; 5] = [
        ModifierKind::SaleType,
        ModifierKind::Scope,
        ModifierKind::Timeframe,
        ModifierKind::Comparison,
        ModifierKind::Calculation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::SaleType => "saleType",
            ModifierKind::Scope => "scope",
            ModifierKind::Timeframe => "timeframe",
            ModifierKind::Comparison => "comparison",
            ModifierKind::Calculation => "calculation",
            ModifierKind::Channel => "channel",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

/// Value selected for one modifier kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModifierValue {
    Variable(VariableRef),
    YearsAgo(YearsAgo),
    Literal(String),
}

impl ModifierValue {
    pub fn literal(value: impl Into<String>) -> Self {
        ModifierValue::Literal(value.into())
    }

    pub fn variable(key: impl Into<String>) -> Self {
        ModifierValue::Variable(VariableRef::new(key))
    }

    pub fn years_ago(value: u32) -> Self {
        ModifierValue::YearsAgo(YearsAgo::new(value))
    }

    /// Blank literals are treated as "no selection".
    pub fn is_blank(&self) -> bool {
        match self {
            ModifierValue::Literal(value) => value.trim().is_empty(),
            ModifierValue::Variable(var) => var.key.trim().is_empty(),
            ModifierValue::YearsAgo(_) => false,
        }
    }
}

/// Modifier values of one definition, iterated in registry order.
pub type Modifiers = BTreeMap<ModifierKind, ModifierValue>;

/// Reads a `kind -> value` object, skipping kinds this build does not know.
///
/// The UI may send keys of newer modifier kinds; they must not make the
/// whole selection unreadable.
fn known_modifier_kinds<'de, D, V>(deserializer: D) -> Result<BTreeMap<ModifierKind, V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut modifiers = BTreeMap::new();
    for (key, value) in raw {
        let Some(kind) = ModifierKind::from_str(&key) else {
            tracing::debug!("unknown modifier kind '{}' ignored", key);
            continue;
        };
        let value = serde_json::from_value(value).map_err(de::Error::custom)?;
        modifiers.insert(kind, value);
    }
    Ok(modifiers)
}

/// Calculation kind applied to an indicator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Calculation {
    #[default]
    Valor,
    Crecimiento,
    Peso,
}

impl Calculation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Calculation::Valor => "valor",
            Calculation::Crecimiento => "crecimiento",
            Calculation::Peso => "peso",
        }
    }

    /// Unknown literals fall back to plain value.
    pub fn from_literal(s: &str) -> Self {
        match s {
            "crecimiento" => Calculation::Crecimiento,
            "peso" => Calculation::Peso,
            _ => Calculation::Valor,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric definitions
// ---------------------------------------------------------------------------

/// Unit configured into a widget column / series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: String,
    pub indicator: Indicator,
    #[serde(default, deserialize_with = "known_modifier_kinds")]
    pub modifiers: Modifiers,
    pub title: String,
    /// User override of the generated title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl MetricDefinition {
    /// Title shown in the UI: the user override wins.
    pub fn effective_title(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.title,
        }
    }
}

/// Concrete modifier value after variable substitution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedModifier {
    YearsAgo(YearsAgo),
    Literal(String),
}

/// A definition with every variable reference substituted.
/// `None` marks a reference whose key is not bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetricDefinition {
    pub id: String,
    pub indicator: Option<String>,
    pub modifiers: BTreeMap<ModifierKind, Option<ResolvedModifier>>,
    pub title: String,
}

impl ResolvedMetricDefinition {
    pub fn modifier_literal(&self, kind: ModifierKind) -> Option<&str> {
        match self.modifiers.get(&kind) {
            Some(Some(ResolvedModifier::Literal(value))) => Some(value),
            _ => None,
        }
    }

    pub fn calculation(&self) -> Calculation {
        self.modifier_literal(ModifierKind::Calculation)
            .map(Calculation::from_literal)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Value bound to a variable key. A `Reference` points at another key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Reference(VariableRef),
    YearsAgo(YearsAgo),
    Text(String),
    Number(f64),
}

/// External `key -> value` store, read-only for the engine.
pub type VariableMap = HashMap<String, VariableValue>;

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

/// Selection state assembled by the configuration UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSelection {
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default, deserialize_with = "known_modifier_kinds")]
    pub modifiers: BTreeMap<ModifierKind, Vec<ModifierValue>>,
    #[serde(default)]
    pub custom_values: HashMap<String, serde_json::Value>,
}

impl MetricSelection {
    /// Numeric payload for the "a-n" comparison option, if supplied.
    pub fn years_ago_payload(&self) -> Option<u32> {
        let value = self.custom_values.get(COMPARISON_A_N_VALUE_KEY)?;
        match value {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_json_shapes() {
        let literal: Indicator = serde_json::from_str(r#""importe""#).unwrap();
        assert_eq!(literal, Indicator::literal("importe"));

        let variable: Indicator =
            serde_json::from_str(r#"{"type":"variable","key":"kpi"}"#).unwrap();
        assert_eq!(variable, Indicator::variable("kpi"));
        assert_eq!(
            serde_json::to_value(&variable).unwrap(),
            serde_json::json!({"type": "variable", "key": "kpi"})
        );
    }

    #[test]
    fn test_modifier_value_json_shapes() {
        let years: ModifierValue = serde_json::from_str(r#"{"type":"a-n","value":3}"#).unwrap();
        assert_eq!(years, ModifierValue::years_ago(3));

        let variable: ModifierValue =
            serde_json::from_str(r#"{"type":"variable","key":"periodo"}"#).unwrap();
        assert_eq!(variable, ModifierValue::variable("periodo"));

        let literal: ModifierValue = serde_json::from_str(r#""neto""#).unwrap();
        assert!(!literal.is_blank());
        assert!(ModifierValue::literal("  ").is_blank());
    }

    #[test]
    fn test_modifiers_serialize_with_kind_names() {
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKind::Calculation, ModifierValue::literal("valor"));
        modifiers.insert(ModifierKind::SaleType, ModifierValue::literal("neto"));

        let json = serde_json::to_string(&modifiers).unwrap();
        assert_eq!(json, r#"{"saleType":"neto","calculation":"valor"}"#);
    }

    #[test]
    fn test_unknown_modifier_kinds_are_skipped() {
        let selection: MetricSelection = serde_json::from_str(
            r#"{
                "mode": "multiple",
                "indicators": ["importe"],
                "modifiers": {"saleType": ["neto"], "breakdownLevel": ["x"], "layout": {"rows": 2}}
            }"#,
        )
        .unwrap();
        assert_eq!(selection.mode, SelectionMode::Multiple);
        assert_eq!(selection.modifiers.len(), 1);
        assert_eq!(
            selection.modifiers[&ModifierKind::SaleType],
            vec![ModifierValue::literal("neto")]
        );

        let definition: MetricDefinition = serde_json::from_str(
            r#"{"id":"importe","indicator":"importe","modifiers":{"breakdownLevel":"x"},"title":"Importe"}"#,
        )
        .unwrap();
        assert!(definition.modifiers.is_empty());
    }

    #[test]
    fn test_known_modifier_kind_with_bad_value_still_fails() {
        let result = serde_json::from_str::<MetricSelection>(r#"{"modifiers":{"saleType":"neto"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_years_ago_payload() {
        let mut selection = MetricSelection::default();
        assert_eq!(selection.years_ago_payload(), None);

        selection
            .custom_values
            .insert(COMPARISON_A_N_VALUE_KEY.into(), serde_json::json!(2));
        assert_eq!(selection.years_ago_payload(), Some(2));

        selection
            .custom_values
            .insert(COMPARISON_A_N_VALUE_KEY.into(), serde_json::json!("4"));
        assert_eq!(selection.years_ago_payload(), Some(4));
    }

    #[test]
    fn test_effective_title_prefers_display_name() {
        let mut def = MetricDefinition {
            id: "importe".into(),
            indicator: Indicator::literal("importe"),
            modifiers: Modifiers::new(),
            title: "Importe".into(),
            display_name: None,
        };
        assert_eq!(def.effective_title(), "Importe");
        def.display_name = Some("Ventas".into());
        assert_eq!(def.effective_title(), "Ventas");
    }
}
