use contracts::shared::indicators::*;
use contracts::shared::metrics::{Indicator, ModifierKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::metadata::{build_indicators, build_modifiers, VARIABLE_REQUIRED_MODIFIERS};

/// Read-only lookups over the indicator and modifier tables.
///
/// Every lookup degrades instead of failing: unknown indicators require
/// nothing and are compatible with nothing, unknown options have no label.
pub struct MetadataRegistry {
    indicators: HashMap<String, IndicatorMeta>,
    /// Indexed by `ModifierKind` declaration order.
    modifiers: Vec<ModifierMeta>,
}

pub static METADATA_REGISTRY: Lazy<MetadataRegistry> = Lazy::new(MetadataRegistry::build);

impl MetadataRegistry {
    fn build() -> Self {
        let indicators = build_indicators()
            .into_iter()
            .map(|meta| (meta.key.clone(), meta))
            .collect();

        let mut modifiers = build_modifiers();
        modifiers.sort_by_key(|meta| meta.kind);

        Self {
            indicators,
            modifiers,
        }
    }

    pub fn indicator(&self, key: &str) -> Option<&IndicatorMeta> {
        self.indicators.get(key)
    }

    pub fn modifier(&self, kind: ModifierKind) -> Option<&ModifierMeta> {
        self.modifiers.iter().find(|meta| meta.kind == kind)
    }

    /// Modifier kinds in registry enumeration order.
    pub fn modifier_kinds(&self) -> impl Iterator<Item = ModifierKind> + '_ {
        self.modifiers.iter().map(|meta| meta.kind)
    }

    pub fn required_modifiers_of(&self, indicator: &Indicator) -> Vec<ModifierKind> {
        match indicator {
            Indicator::Literal(key) => self
                .indicator(key)
                .map(|meta| meta.required_modifiers.clone())
                .unwrap_or_default(),
            Indicator::Variable(_) => VARIABLE_REQUIRED_MODIFIERS.to_vec(),
        }
    }

    pub fn is_compatible(&self, indicator: &Indicator, kind: ModifierKind) -> bool {
        match indicator {
            Indicator::Literal(key) => self
                .indicator(key)
                .map_or(false, |meta| meta.compatible_modifiers.contains(&kind)),
            Indicator::Variable(_) => ModifierKind::STANDARD.contains(&kind),
        }
    }

    pub fn default_value_of(&self, kind: ModifierKind) -> Option<&str> {
        self.modifier(kind)
            .and_then(|meta| meta.default_value.as_deref())
    }

    pub fn indicator_label(&self, key: &str) -> Option<&str> {
        self.indicator(key).map(|meta| meta.label.as_str())
    }

    pub fn option_label(&self, kind: ModifierKind, value: &str) -> Option<&str> {
        self.modifier(kind)?
            .options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    pub fn value_range(&self, key: &str) -> Option<ValueRange> {
        self.indicator(key).map(|meta| meta.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_modifiers() {
        let registry = &*METADATA_REGISTRY;
        assert_eq!(
            registry.required_modifiers_of(&Indicator::literal("importe")),
            vec![ModifierKind::SaleType, ModifierKind::Calculation]
        );
        assert!(registry
            .required_modifiers_of(&Indicator::literal("desconocido"))
            .is_empty());
        assert_eq!(
            registry.required_modifiers_of(&Indicator::variable("kpi")),
            vec![ModifierKind::SaleType, ModifierKind::Calculation]
        );
    }

    #[test]
    fn test_compatibility() {
        let registry = &*METADATA_REGISTRY;
        let visitas = Indicator::literal("visitas");
        assert!(registry.is_compatible(&visitas, ModifierKind::Timeframe));
        assert!(!registry.is_compatible(&visitas, ModifierKind::SaleType));
        assert!(!registry.is_compatible(&Indicator::literal("desconocido"), ModifierKind::Timeframe));

        let variable = Indicator::variable("kpi");
        for kind in ModifierKind::STANDARD {
            assert!(registry.is_compatible(&variable, kind));
        }
        assert!(!registry.is_compatible(&variable, ModifierKind::Channel));
    }

    #[test]
    fn test_defaults_and_labels() {
        let registry = &*METADATA_REGISTRY;
        assert_eq!(registry.default_value_of(ModifierKind::SaleType), Some("neto"));
        assert_eq!(registry.default_value_of(ModifierKind::Calculation), Some("valor"));
        assert_eq!(registry.default_value_of(ModifierKind::Comparison), None);
        assert_eq!(registry.option_label(ModifierKind::SaleType, "bruto"), Some("Bruto"));
        assert_eq!(registry.option_label(ModifierKind::SaleType, "otro"), None);
    }

    #[test]
    fn test_modifier_kinds_follow_enum_order() {
        let kinds: Vec<_> = METADATA_REGISTRY.modifier_kinds().collect();
        assert_eq!(kinds, ModifierKind::ALL.to_vec());
    }
}
