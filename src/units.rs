//! Physical units for coordinate axes.
//!
//! Only multiplicative conversions are supported: each known unit maps to a
//! dimension and a scale factor relative to the SI (or customary) base unit
//! of that dimension. Braced symbols such as `{°}` follow the labeled-array
//! convention for units that are not plain SI symbols.

use crate::error::{ReconError, Result};

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Time,
    Angle,
    Frequency,
    Length,
    Dimensionless,
}

/// Look up the dimension and scale (to the base unit) of a unit symbol.
///
/// Base units: `s`, `rad`, `Hz`, `m`, and `""` for dimensionless values.
pub fn lookup(unit: &str) -> Option<(Dimension, f64)> {
    use std::f64::consts::PI;
    let found = match unit.trim() {
        "s" => (Dimension::Time, 1.0),
        "ms" => (Dimension::Time, 1e-3),
        "us" | "µs" => (Dimension::Time, 1e-6),
        "ns" => (Dimension::Time, 1e-9),
        "min" => (Dimension::Time, 60.0),
        "h" => (Dimension::Time, 3600.0),
        "rad" => (Dimension::Angle, 1.0),
        "deg" | "°" | "{°}" => (Dimension::Angle, PI / 180.0),
        "rev" | "{tr}" => (Dimension::Angle, 2.0 * PI),
        "Hz" => (Dimension::Frequency, 1.0),
        "kHz" => (Dimension::Frequency, 1e3),
        "rpm" => (Dimension::Frequency, 1.0 / 60.0),
        "m" => (Dimension::Length, 1.0),
        "km" => (Dimension::Length, 1e3),
        "cm" => (Dimension::Length, 1e-2),
        "mm" => (Dimension::Length, 1e-3),
        "" | "-" | "dimless" => (Dimension::Dimensionless, 1.0),
        _ => return None,
    };
    Some(found)
}

/// Factor that converts values expressed in `from` into values in `to`.
///
/// Identical symbols always convert with factor 1, even when unknown.
pub fn conversion_factor(from: &str, to: &str) -> Result<f64> {
    if from == to {
        return Ok(1.0);
    }
    let incompatible = || ReconError::IncompatibleUnits {
        from: from.to_string(),
        to: to.to_string(),
    };
    let (dim_from, scale_from) = lookup(from).ok_or_else(incompatible)?;
    let (dim_to, scale_to) = lookup(to).ok_or_else(incompatible)?;
    if dim_from != dim_to {
        return Err(incompatible());
    }
    Ok(scale_from / scale_to)
}

/// Convert a slice of values from one unit to another.
pub fn convert(values: &[f64], from: &str, to: &str) -> Result<Vec<f64>> {
    let factor = conversion_factor(from, to)?;
    if factor == 1.0 {
        return Ok(values.to_vec());
    }
    Ok(values.iter().map(|&v| v * factor).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::NUMERICAL_EPS;

    #[test]
    fn test_time_conversion() {
        let ms = convert(&[0.5, 1.0], "s", "ms").unwrap();
        assert!((ms[0] - 500.0).abs() < NUMERICAL_EPS);
        assert!((ms[1] - 1000.0).abs() < NUMERICAL_EPS);
    }

    #[test]
    fn test_angle_aliases_agree() {
        let a = conversion_factor("{°}", "rad").unwrap();
        let b = conversion_factor("deg", "rad").unwrap();
        assert!((a - b).abs() < NUMERICAL_EPS);
        assert!((a * 180.0 - std::f64::consts::PI).abs() < NUMERICAL_EPS);
    }

    #[test]
    fn test_rpm_to_hz() {
        let f = conversion_factor("rpm", "Hz").unwrap();
        assert!((f * 60.0 - 1.0).abs() < NUMERICAL_EPS);
    }

    #[test]
    fn test_unknown_identical_units_pass_through() {
        assert_eq!(conversion_factor("{furlong}", "{furlong}").unwrap(), 1.0);
    }

    #[test]
    fn test_incompatible_dimensions() {
        let err = conversion_factor("s", "rad").unwrap_err();
        assert!(matches!(err, ReconError::IncompatibleUnits { .. }));
    }

    #[test]
    fn test_unknown_unit() {
        assert!(conversion_factor("s", "parsec-ish").is_err());
    }
}
