use contracts::shared::indicators::*;
use contracts::shared::metrics::ModifierKind;

use ModifierKind::*;

/// Well-known indicator keys (constants to avoid typos).
pub mod ids {
    pub const IMPORTE: &str = "importe";
    pub const UNIDADES: &str = "unidades";
    pub const TICKETS: &str = "tickets";
    pub const TICKET_MEDIO: &str = "ticket_medio";
    pub const MARGEN: &str = "margen";
    pub const VISITAS: &str = "visitas";
    pub const CONVERSION: &str = "conversion";
    pub const VARIACION: &str = "variacion";
}

/// Modifier kinds assumed required for a variable-bound indicator.
pub const VARIABLE_REQUIRED_MODIFIERS: [ModifierKind; 2] = [SaleType, Calculation];

fn euro() -> ValueFormat {
    ValueFormat::Money {
        currency: "€".into(),
    }
}

fn indicator(
    key: &str,
    label: &str,
    format: ValueFormat,
    required_modifiers: &[ModifierKind],
    compatible_modifiers: &[ModifierKind],
    (min, max): (f64, f64),
) -> IndicatorMeta {
    IndicatorMeta {
        key: key.into(),
        label: label.into(),
        short_label: None,
        format,
        description: None,
        required_modifiers: required_modifiers.to_vec(),
        compatible_modifiers: compatible_modifiers.to_vec(),
        range: ValueRange { min, max },
    }
}

fn modifier(
    kind: ModifierKind,
    label: &str,
    options: &[(&str, &str)],
    default_value: Option<&str>,
) -> ModifierMeta {
    ModifierMeta {
        kind,
        label: label.into(),
        options: options
            .iter()
            .map(|(value, label)| ModifierOptionMeta {
                value: (*value).into(),
                label: (*label).into(),
            })
            .collect(),
        default_value: default_value.map(Into::into),
    }
}

/// Indicator table.
pub fn build_indicators() -> Vec<IndicatorMeta> {
    vec![
        IndicatorMeta {
            description: Some("Importe de ventas del periodo".into()),
            ..indicator(
                ids::IMPORTE,
                "Importe",
                euro(),
                &[SaleType, Calculation],
                &[SaleType, Scope, Timeframe, Comparison, Calculation, Channel],
                (20_000.0, 120_000.0),
            )
        },
        indicator(
            ids::UNIDADES,
            "Unidades",
            ValueFormat::Integer,
            &[Calculation],
            &[Scope, Timeframe, Comparison, Calculation, Channel],
            (500.0, 5_000.0),
        ),
        indicator(
            ids::TICKETS,
            "Tickets",
            ValueFormat::Integer,
            &[Calculation],
            &[Scope, Timeframe, Comparison, Calculation, Channel],
            (200.0, 2_000.0),
        ),
        IndicatorMeta {
            short_label: Some("T. medio".into()),
            description: Some("Importe / Tickets".into()),
            ..indicator(
                ids::TICKET_MEDIO,
                "Ticket medio",
                euro(),
                &[SaleType, Calculation],
                &[SaleType, Scope, Timeframe, Comparison, Calculation, Channel],
                (20.0, 90.0),
            )
        },
        indicator(
            ids::MARGEN,
            "Margen",
            euro(),
            &[SaleType, Calculation],
            &[SaleType, Scope, Timeframe, Comparison, Calculation],
            (5_000.0, 40_000.0),
        ),
        indicator(
            ids::VISITAS,
            "Visitas",
            ValueFormat::Integer,
            &[Timeframe],
            &[Timeframe, Comparison, Channel],
            (1_000.0, 20_000.0),
        ),
        IndicatorMeta {
            description: Some("Tickets / Visitas".into()),
            ..indicator(
                ids::CONVERSION,
                "Conversión",
                ValueFormat::Percent { decimals: 1 },
                &[],
                &[Timeframe, Comparison, Channel],
                (1.0, 15.0),
            )
        },
        IndicatorMeta {
            description: Some("Diferencia de importe frente a la base de comparación".into()),
            ..indicator(
                ids::VARIACION,
                "Variación",
                ValueFormat::Percent { decimals: 1 },
                &[Comparison],
                &[SaleType, Timeframe, Comparison, Channel],
                (-20.0, 20.0),
            )
        },
    ]
}

/// Modifier table, in registry enumeration order.
pub fn build_modifiers() -> Vec<ModifierMeta> {
    vec![
        modifier(
            SaleType,
            "Tipo de venta",
            &[("neto", "Neto"), ("bruto", "Bruto")],
            Some("neto"),
        ),
        modifier(
            Scope,
            "Ámbito",
            &[("total", "Total"), ("comparable", "Tiendas comparables")],
            None,
        ),
        modifier(
            Timeframe,
            "Periodo",
            &[
                ("dia", "Día"),
                ("semana", "Semana"),
                ("mes", "Mes"),
                ("acumulado", "Acumulado anual"),
            ],
            Some("mes"),
        ),
        modifier(
            Comparison,
            "Comparación",
            &[
                ("periodo_anterior", "vs periodo anterior"),
                ("a-1", "vs año anterior"),
                ("a-n", "vs hace N años"),
            ],
            None,
        ),
        modifier(
            Calculation,
            "Cálculo",
            &[
                ("valor", "Valor"),
                ("crecimiento", "Crecimiento"),
                ("peso", "Peso"),
            ],
            Some("valor"),
        ),
        modifier(
            Channel,
            "Canal",
            &[("tienda", "Tienda"), ("online", "Online")],
            None,
        ),
    ]
}

/// Build the full catalogue of indicators + modifiers.
pub fn build_catalog() -> IndicatorCatalogResponse {
    IndicatorCatalogResponse {
        indicators: build_indicators(),
        modifiers: build_modifiers(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::indicators::METADATA_REGISTRY;
    use contracts::shared::metrics::Indicator;

    #[test]
    fn test_catalog_agrees_with_registry() {
        let catalog = build_catalog();

        for meta in &catalog.indicators {
            let indicator = Indicator::literal(meta.key.as_str());
            assert_eq!(
                METADATA_REGISTRY.required_modifiers_of(&indicator),
                meta.required_modifiers
            );
            for kind in &meta.required_modifiers {
                assert!(meta.compatible_modifiers.contains(kind), "{} requires {:?}", meta.key, kind);
            }
            assert!(meta.range.min < meta.range.max);
        }

        let kinds: Vec<_> = catalog.modifiers.iter().map(|meta| meta.kind).collect();
        assert_eq!(kinds, ModifierKind::ALL.to_vec());
        for meta in &catalog.modifiers {
            if let Some(default) = &meta.default_value {
                assert!(meta.options.iter().any(|option| &option.value == default));
            }
        }
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = serde_json::to_value(build_catalog()).unwrap();
        let importe = &json["indicators"][0];
        assert_eq!(importe["key"], "importe");
        assert_eq!(importe["format"], serde_json::json!({"kind": "Money", "currency": "€"}));
        assert_eq!(importe["required_modifiers"], serde_json::json!(["saleType", "calculation"]));
        assert_eq!(json["indicators"][1]["format"], serde_json::json!({"kind": "Integer"}));
        assert_eq!(json["modifiers"][0]["default_value"], "neto");
    }
}
