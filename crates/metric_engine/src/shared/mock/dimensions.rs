//! Known values of breakdown dimensions and their combinations.

use contracts::shared::dimensions::{BreakdownCategory, DimensionValue};
use maplit::hashmap;
use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::{BTreeSet, HashMap};

use crate::shared::error::ConfigurationError;
use crate::shared::product::{combination_at, product_len, CartesianProduct};

/// Number of placeholder values synthesized for dimensions without a value table.
pub const PLACEHOLDER_VALUES: usize = 3;

static DIMENSION_VALUES: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    hashmap! {
        "product" => vec!["Camisetas", "Pantalones", "Zapatillas", "Chaquetas", "Accesorios"],
        "section" => vec!["Alimentación", "Moda", "Hogar", "Electrónica", "Deportes"],
        "month" => vec![
            "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
            "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
        ],
        "day" => vec!["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"],
        "country" => vec!["España", "Portugal", "Francia", "Italia"],
        "store" => vec!["Madrid Centro", "Barcelona Diagonal", "Valencia Puerto", "Sevilla Nervión"],
        "channel" => vec!["Tienda", "Online"],
    }
});

/// Breakdown categories offered by the breakdown picker that have no value table.
static BREAKDOWN_CATEGORIES: Lazy<Vec<BreakdownCategory>> = Lazy::new(|| {
    [
        ("region", "Región", "Geografía"),
        ("city", "Ciudad", "Geografía"),
        ("brand", "Marca", "Producto"),
        ("family", "Familia", "Producto"),
        ("supplier", "Proveedor", "Producto"),
        ("campaign", "Campaña", "Marketing"),
        ("payment_method", "Medio de pago", "Venta"),
    ]
    .into_iter()
    .map(|(id, label, group)| BreakdownCategory {
        id: id.into(),
        label: label.into(),
        group: group.into(),
    })
    .collect()
});

pub fn breakdown_category(id: &str) -> Option<&'static BreakdownCategory> {
    BREAKDOWN_CATEGORIES.iter().find(|category| category.id == id)
}

fn placeholders(label: &str) -> Vec<String> {
    (1..=PLACEHOLDER_VALUES)
        .map(|n| format!("{label} {n}"))
        .collect()
}

/// Values of `id` from the value table, else placeholders named after its
/// breakdown category. Unknown ids are an error.
pub fn try_dimension_values(id: &str) -> Result<Vec<String>, ConfigurationError> {
    if let Some(values) = DIMENSION_VALUES.get(id) {
        return Ok(values.iter().map(|v| v.to_string()).collect());
    }
    if let Some(category) = breakdown_category(id) {
        return Ok(placeholders(&category.label));
    }
    Err(ConfigurationError::UnknownDimension(id.to_string()))
}

/// Lenient lookup: unknown ids get placeholders named after the id itself.
pub fn dimension_values(id: &str) -> Vec<String> {
    try_dimension_values(id).unwrap_or_else(|_| {
        tracing::debug!("dimension '{}' unknown, using placeholder values", id);
        placeholders(id)
    })
}

/// Cartesian product of the value sets of several dimensions.
pub struct DimensionCombinations {
    ids: Vec<String>,
    axes: Vec<Vec<String>>,
}

impl DimensionCombinations {
    pub fn new<S: AsRef<str>>(ids: &[S]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.as_ref().to_string()).collect(),
            axes: ids.iter().map(|id| dimension_values(id.as_ref())).collect(),
        }
    }

    pub fn try_new<S: AsRef<str>>(ids: &[S]) -> Result<Self, ConfigurationError> {
        let axes = ids
            .iter()
            .map(|id| try_dimension_values(id.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            ids: ids.iter().map(|id| id.as_ref().to_string()).collect(),
            axes,
        })
    }

    /// Total number of combinations (saturating).
    pub fn len(&self) -> u64 {
        product_len(&self.axes)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_row(&self, values: Vec<&String>) -> Vec<DimensionValue> {
        self.ids
            .iter()
            .zip(values)
            .map(|(id, value)| DimensionValue::new(id.clone(), value.clone()))
            .collect()
    }

    /// Lazily enumerate every combination.
    pub fn iter(&self) -> impl Iterator<Item = Vec<DimensionValue>> + '_ {
        CartesianProduct::new(&self.axes).map(|values| self.to_row(values))
    }

    /// At most `cap` combinations: all of them when they fit, otherwise a
    /// random subset kept in enumeration order.
    pub fn sample<R: Rng>(&self, cap: usize, rng: &mut R) -> Vec<Vec<DimensionValue>> {
        let total = self.len();
        if total <= cap as u64 {
            return self.iter().collect();
        }

        let mut picked = BTreeSet::new();
        while picked.len() < cap {
            picked.insert(rng.gen_range(0..total));
        }

        picked
            .into_iter()
            .filter_map(|index| combination_at(&self.axes, index))
            .map(|values| self.to_row(values))
            .collect()
    }
}

/// Every combination of the known values of `dimension_ids`.
///
/// No dimensions yield one empty combination, so a table without breakdowns
/// still gets one row.
pub fn generate_dimension_combinations<S: AsRef<str>>(dimension_ids: &[S]) -> Vec<Vec<DimensionValue>> {
    DimensionCombinations::new(dimension_ids).iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_no_dimensions_yield_single_empty_combination() {
        let combos = generate_dimension_combinations::<&str>(&[]);
        assert_eq!(combos, vec![Vec::<DimensionValue>::new()]);
    }

    #[test]
    fn test_product_of_known_values() {
        let combos = generate_dimension_combinations(&["section", "day"]);
        assert_eq!(combos.len(), 5 * 7);
        assert_eq!(
            combos[0],
            vec![
                DimensionValue::new("section", "Alimentación"),
                DimensionValue::new("day", "Lunes"),
            ]
        );
        assert_eq!(combos[1][1], DimensionValue::new("day", "Martes"));
    }

    #[test]
    fn test_breakdown_category_and_unknown_fallbacks() {
        assert_eq!(
            try_dimension_values("brand").unwrap(),
            vec!["Marca 1", "Marca 2", "Marca 3"]
        );
        assert_eq!(
            try_dimension_values("nope"),
            Err(ConfigurationError::UnknownDimension("nope".into()))
        );
        assert_eq!(dimension_values("nope"), vec!["nope 1", "nope 2", "nope 3"]);
        assert!(DimensionCombinations::try_new(&["month", "nope"]).is_err());
    }

    #[test]
    fn test_sample_caps_and_keeps_order() {
        let combos = DimensionCombinations::new(&["month", "day", "store"]);
        assert_eq!(combos.len(), 12 * 7 * 4);

        let mut rng = StdRng::seed_from_u64(7);
        let sample = combos.sample(100, &mut rng);
        assert_eq!(sample.len(), 100);

        let all: Vec<_> = combos.iter().collect();
        let positions: Vec<usize> = sample
            .iter()
            .map(|row| all.iter().position(|c| c == row).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_returns_everything_when_under_cap() {
        let combos = DimensionCombinations::new(&["channel", "country"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(combos.sample(100, &mut rng).len(), 8);
    }
}
