//! Utility functions for the rating engine

/// Clamp `value` into `[min, max]`
pub fn clip_to_range(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Scale a signed result by a level factor
///
/// Non-negative values are multiplied by `factor`, negative values by its
/// reciprocal, so a factor below 1 shrinks wins and magnifies losses.
pub fn scale_for_level(value: f64, factor: f64) -> f64 {
    if value >= 0.0 {
        value * factor
    } else {
        value / factor
    }
}
