//! Plausible numbers for demo widgets.

use contracts::shared::dimensions::DimensionValue;
use contracts::shared::indicators::ValueRange;
use contracts::shared::metrics::Calculation;
use maplit::hashmap;
use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::HashMap;

use crate::shared::format::{round_to_decimals, smart_round};
use crate::shared::indicators::METADATA_REGISTRY;

/// Range used for indicators missing from the registry.
pub const GENERIC_RANGE: ValueRange = ValueRange {
    min: 1_000.0,
    max: 10_000.0,
};

/// Largest |growth| in percent a mock row may show.
pub const MAX_GROWTH_PERCENT: f64 = 100.0;

static SECTION_WEIGHTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    hashmap! {
        "Alimentación" => 1.4,
        "Moda" => 1.1,
        "Hogar" => 0.8,
        "Electrónica" => 1.2,
        "Deportes" => 0.7,
    }
});

static MONTH_WEIGHTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    hashmap! {
        "Enero" => 1.1,
        "Febrero" => 0.8,
        "Marzo" => 0.9,
        "Abril" => 0.95,
        "Mayo" => 1.0,
        "Junio" => 1.05,
        "Julio" => 1.15,
        "Agosto" => 0.85,
        "Septiembre" => 0.95,
        "Octubre" => 1.0,
        "Noviembre" => 1.2,
        "Diciembre" => 1.4,
    }
});

static DAY_WEIGHTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    hashmap! {
        "Lunes" => 0.8,
        "Martes" => 0.85,
        "Miércoles" => 0.9,
        "Jueves" => 0.95,
        "Viernes" => 1.2,
        "Sábado" => 1.4,
        "Domingo" => 0.6,
    }
});

/// Sample N(mean, std_dev) with the Box-Muller transform.
pub fn normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // 1 - [0, 1) keeps ln() away from zero
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z * std_dev
}

/// Combined seasonal / segment factor of a row; unknown values are neutral.
pub fn dimension_weight(dimensions: &[DimensionValue]) -> f64 {
    dimensions
        .iter()
        .map(|dim| {
            let table = match dim.id.as_str() {
                "section" => &*SECTION_WEIGHTS,
                "month" => &*MONTH_WEIGHTS,
                "day" => &*DAY_WEIGHTS,
                _ => return 1.0,
            };
            table.get(dim.value.as_str()).copied().unwrap_or(1.0)
        })
        .product()
}

/// Unrounded value of `indicator` for one row.
pub fn draw_base_value<R: Rng>(
    indicator: Option<&str>,
    dimensions: &[DimensionValue],
    rng: &mut R,
) -> f64 {
    let range = indicator
        .and_then(|key| METADATA_REGISTRY.value_range(key))
        .unwrap_or(GENERIC_RANGE);

    let mean = (range.min + range.max) / 2.0;
    let std_dev = (range.max - range.min) / 6.0;
    let mut value = normal(rng, mean, std_dev);
    if range.min >= 0.0 {
        value = value.max(0.0);
    }

    value * dimension_weight(dimensions)
}

/// Percentage change against a synthesized prior period, within ±100.
fn growth_from<R: Rng>(current: f64, rng: &mut R) -> f64 {
    let previous = current * normal(rng, 1.0, 0.12);
    if previous.abs() < f64::EPSILON {
        return 0.0;
    }
    let growth = (current - previous) / previous.abs() * 100.0;
    if !growth.is_finite() {
        return 0.0;
    }
    round_to_decimals(growth.clamp(-MAX_GROWTH_PERCENT, MAX_GROWTH_PERCENT), 1)
}

/// Mock value of one metric for one row.
///
/// `base_value` is the row's already synthesized "valor"; growth and weight are
/// derived from it so the three calculations stay consistent.
pub fn generate_metric_value<R: Rng>(
    indicator: Option<&str>,
    dimensions: &[DimensionValue],
    base_value: Option<f64>,
    calculation: Calculation,
    rng: &mut R,
) -> f64 {
    let base = base_value
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| draw_base_value(indicator, dimensions, rng));

    let value = match calculation {
        Calculation::Crecimiento => growth_from(base, rng),
        Calculation::Peso => round_to_decimals((base / 10.0).clamp(0.0, 100.0), 1),
        Calculation::Valor => smart_round(base),
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}
