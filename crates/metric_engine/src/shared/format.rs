/// Rounds to the given number of decimals.
///
/// # Examples
/// ```
/// use metric_engine::shared::format::round_to_decimals;
/// assert_eq!(round_to_decimals(12.345, 1), 12.3);
/// assert_eq!(round_to_decimals(-0.06, 1), -0.1);
/// ```
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounding step used by [`smart_round`] for a value of this magnitude.
pub fn rounding_granularity(value: f64) -> f64 {
    let magnitude = value.abs();
    if magnitude < 10.0 {
        0.1
    } else if magnitude < 100.0 {
        1.0
    } else if magnitude < 1_000.0 {
        5.0
    } else if magnitude < 10_000.0 {
        10.0
    } else if magnitude < 100_000.0 {
        100.0
    } else {
        1_000.0
    }
}

/// Magnitude-aware rounding so mock numbers do not look spuriously precise.
///
/// # Examples
/// ```
/// use metric_engine::shared::format::smart_round;
/// assert_eq!(smart_round(3.14159), 3.1);
/// assert_eq!(smart_round(742.0), 740.0);
/// assert_eq!(smart_round(123_456.0), 123_000.0);
/// ```
pub fn smart_round(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let granularity = rounding_granularity(value);
    if granularity < 1.0 {
        round_to_decimals(value, 1)
    } else {
        (value / granularity).round() * granularity
    }
}
