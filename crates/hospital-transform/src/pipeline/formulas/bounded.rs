//! Shared clamping helpers so every metric stays inside its documented range.

/// Clamp `value` into `[min, max]`, substituting `default` for NaN or infinities.
pub fn bounded(value: f64, min: f64, max: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default.clamp(min, max)
    }
}

/// Clamp into `[0, 1]`, treating non-finite input as zero.
pub fn unit(value: f64) -> f64 {
    bounded(value, 0.0, 1.0, 0.0)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_replaces_non_finite_values() {
        assert_eq!(bounded(f64::NAN, 1.0, 10.0, 4.0), 4.0);
        assert_eq!(bounded(f64::INFINITY, 1.0, 10.0, 4.0), 4.0);
        assert_eq!(bounded(-3.0, 1.0, 10.0, 4.0), 1.0);
        assert_eq!(bounded(42.0, 1.0, 10.0, 4.0), 10.0);
    }

    #[test]
    fn unit_and_rounding() {
        assert_eq!(unit(1.7), 1.0);
        assert_eq!(unit(f64::NAN), 0.0);
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(2.66, 1), 2.7);
    }
}
