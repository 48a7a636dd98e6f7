use contracts::shared::widgets::{
    MockRow, MockTable, WidgetConfig, WidgetKind, WidgetRequest, WidgetResponse,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use super::config::Config;
use super::metrics::{generate_metric_definitions, VariableResolver};
use super::mock::{build_mock_table, mock_metric_widget_value};

/// Generate the widget's metric definitions and matching mock data.
pub fn build_widget_with_rng<R: Rng>(
    request: &WidgetRequest,
    config: &Config,
    rng: &mut R,
) -> WidgetResponse {
    let columns = generate_metric_definitions(
        &request.selection,
        &request.variables,
        &config.generation,
    );

    let resolver = VariableResolver::from_limits(&request.variables, &config.generation);

    let data = match request.kind {
        WidgetKind::Metric => {
            let values: BTreeMap<String, f64> = columns
                .iter()
                .map(|column| {
                    (
                        column.id.clone(),
                        mock_metric_widget_value(column, &resolver, rng),
                    )
                })
                .collect();
            MockTable {
                total_combinations: 1,
                rows: vec![MockRow {
                    dimensions: vec![],
                    values,
                }],
            }
        }
        WidgetKind::Table | WidgetKind::Chart => build_mock_table(
            &columns,
            &request.breakdowns,
            &resolver,
            config.mock.max_combinations,
            rng,
        ),
    };

    tracing::info!(
        "widget {:?}: {} definitions, {} rows",
        request.kind,
        columns.len(),
        data.rows.len()
    );

    let breakdowns = match request.kind {
        WidgetKind::Metric => vec![],
        _ => request.breakdowns.clone(),
    };

    WidgetResponse {
        config: WidgetConfig {
            kind: request.kind,
            columns,
            breakdowns,
        },
        data,
    }
}

/// Like [`build_widget_with_rng`], seeded from `config.mock.seed` when set.
pub fn build_widget(request: &WidgetRequest, config: &Config) -> WidgetResponse {
    let mut rng = match config.mock.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    build_widget_with_rng(request, config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::metrics::{VariableRef, VariableValue};

    const REQUEST: &str = r#"{
        "kind": "table",
        "selection": {
            "mode": "multiple",
            "indicators": ["importe", {"type": "variable", "key": "kpi"}],
            "modifiers": {"saleType": ["neto", "bruto"], "calculation": ["valor"]}
        },
        "breakdowns": ["section", "month"],
        "variables": {"kpi": "tickets"}
    }"#;

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.mock.seed = Some(11);
        config
    }

    #[test]
    fn test_table_request_from_json() {
        let request: WidgetRequest = serde_json::from_str(REQUEST).unwrap();
        let response = build_widget(&request, &seeded_config());

        // importe × 2 sale types, variable indicator × 2 sale types
        assert_eq!(response.config.columns.len(), 4);
        assert_eq!(response.data.total_combinations, 5 * 12);
        assert_eq!(response.data.rows.len(), 60);
        assert!(response.data.rows.iter().all(|row| row.values.len() == 4));
        assert_eq!(response.config.columns[2].title, "Tickets · Neto · Valor");
    }

    #[test]
    fn test_seed_makes_output_reproducible() {
        let request: WidgetRequest = serde_json::from_str(REQUEST).unwrap();
        let a = serde_json::to_string(&build_widget(&request, &seeded_config())).unwrap();
        let b = serde_json::to_string(&build_widget(&request, &seeded_config())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_modifier_kind_in_request_is_ignored() {
        let request: WidgetRequest = serde_json::from_str(
            r#"{
                "kind": "table",
                "selection": {
                    "mode": "multiple",
                    "indicators": ["importe"],
                    "modifiers": {"saleType": ["neto"], "breakdownLevel": ["x"]}
                },
                "breakdowns": ["channel"]
            }"#,
        )
        .unwrap();
        let response = build_widget(&request, &seeded_config());
        assert_eq!(response.config.columns.len(), 1);
        assert_eq!(response.config.columns[0].id, "importe|calculation=valor|saleType=neto");
        assert_eq!(response.data.rows.len(), 2);
    }

    #[test]
    fn test_configured_variable_depth_reaches_titles() {
        let mut request: WidgetRequest = serde_json::from_str(REQUEST).unwrap();
        request.variables.insert(
            "kpi".into(),
            VariableValue::Reference(VariableRef::new("kpi_actual")),
        );
        request
            .variables
            .insert("kpi_actual".into(), VariableValue::Text("tickets".into()));

        let response = build_widget(&request, &seeded_config());
        assert_eq!(response.config.columns[2].title, "Tickets · Neto · Valor");

        let mut config = seeded_config();
        config.generation.max_variable_depth = 0;
        let response = build_widget(&request, &config);
        assert_eq!(response.config.columns[2].title, "Dinámico · Neto · Valor");
    }

    #[test]
    fn test_metric_widget_has_single_row() {
        let mut request: WidgetRequest = serde_json::from_str(REQUEST).unwrap();
        request.kind = WidgetKind::Metric;
        let response = build_widget(&request, &seeded_config());
        assert_eq!(response.data.rows.len(), 1);
        assert!(response.config.breakdowns.is_empty());
    }
}
