//! Unit conversions and rounding used by the cooling calculations.

/// Watts to BTU/hr.
pub const BTU_PER_WATT: f64 = 3.41;

/// BTU/hr to tons of cooling (1 ton is roughly 12000 BTU/hr).
pub const TONS_PER_BTU: f64 = 8.33333e-5;

/// Cooling load per square foot of lab floor, BTU/hr.
pub const LAB_BTU_PER_SQFT: f64 = 20.0;

// Values at or above this have no fractional hundredths left in an f64.
const ROUNDING_LIMIT: f64 = 1e13;

pub fn btu_to_tons(btu: f64) -> f64 {
    btu * TONS_PER_BTU
}

/// Round to 2 decimal places, halves away from zero.
///
/// The decision is made on the shortest decimal representation of the
/// value, so `1.005` rounds to `1.01` even though the nearest f64 is
/// slightly below it.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }

    let text = value.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if fraction.len() <= 2 {
        return value;
    }

    let Ok(whole) = whole.parse::<u64>() else {
        return (value * 100.0).round() / 100.0;
    };

    let digits = fraction.as_bytes();
    let mut hundredths = whole * 100 + u64::from(digits[0] - b'0') * 10 + u64::from(digits[1] - b'0');
    if digits[2] >= b'5' {
        hundredths += 1;
    }

    (hundredths as f64 / 100.0).copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(-1.005), -1.01);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_round2_regular_values() {
        assert_eq!(round2(6.666664), 6.67);
        assert_eq!(round2(0.852499659), 0.85);
        assert_eq!(round2(43.6479825408), 43.65);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(12.3), 12.3);
        assert_eq!(round2(7.0), 7.0);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(99.995), 100.0);
    }

    #[test]
    fn test_round2_passes_through_non_finite() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
        assert_eq!(round2(1e20), 1e20);
    }

    #[test]
    fn test_btu_to_tons() {
        assert!((btu_to_tons(12_000.0) - 0.999_999_6).abs() < 1e-9);
        assert_eq!(round2(btu_to_tons(80_000.0)), 6.67);
    }
}
