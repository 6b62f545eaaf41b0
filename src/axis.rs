//! Coordinate axes.
//!
//! A [`CoordinateAxis`] is an ordered, strictly increasing set of coordinate
//! values with a name and a physical unit. Axes are immutable once built;
//! undersampling produces new axes rather than editing existing ones.

use crate::error::{ReconError, Result};
use crate::units;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered coordinate values with a name and a unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateAxis {
    name: String,
    unit: String,
    values: Vec<f64>,
}

impl CoordinateAxis {
    /// Build an axis from explicit values.
    ///
    /// Fails with [`ReconError::InvalidAxis`] if `values` is empty, holds a
    /// non-finite value, or is not strictly increasing.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(ReconError::InvalidAxis(format!("axis '{}' is empty", name)));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ReconError::InvalidAxis(format!(
                "axis '{}' has a non-finite value at position {}",
                name, i
            )));
        }
        if let Some(i) = values.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ReconError::InvalidAxis(format!(
                "axis '{}' is not strictly increasing at position {}",
                name,
                i + 1
            )));
        }
        Ok(Self {
            name,
            unit: unit.into(),
            values,
        })
    }

    /// `n` evenly spaced values from `start` to `stop`, both included.
    pub fn linspace(
        name: impl Into<String>,
        unit: impl Into<String>,
        start: f64,
        stop: f64,
        n: usize,
    ) -> Result<Self> {
        let values = match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                    .collect()
            }
        };
        Self::new(name, unit, values)
    }

    /// Axis name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit symbol.
    #[inline]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Raw coordinate values in the axis unit.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed axis; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coordinate values, converted to `unit` when one is given.
    pub fn get_values(&self, unit: Option<&str>) -> Result<Vec<f64>> {
        match unit {
            Some(target) => units::convert(&self.values, &self.unit, target),
            None => Ok(self.values.clone()),
        }
    }

    /// Smallest gap between consecutive coordinates, `None` for a single point.
    pub fn min_spacing(&self) -> Option<f64> {
        self.values
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
    }

    /// New axis made of the coordinates at `indices` (must be strictly increasing).
    pub fn select(&self, name: impl Into<String>, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(ReconError::DimensionMismatch(format!(
                "index {} out of range for axis '{}' of length {}",
                bad,
                self.name,
                self.len()
            )));
        }
        let values = indices.iter().map(|&i| self.values[i]).collect();
        Self::new(name, self.unit.clone(), values)
    }
}

impl std::fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] ({} values)", self.name, self.unit, self.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::NUMERICAL_EPS;

    #[test]
    fn test_linspace_endpoints() {
        let axis = CoordinateAxis::linspace("time", "s", 0.0, 1.0, 5).unwrap();
        assert_eq!(axis.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(axis.len(), 5);
        assert_eq!(axis.name(), "time");
        assert_eq!(axis.unit(), "s");
    }

    #[test]
    fn test_linspace_single_point() {
        let axis = CoordinateAxis::linspace("angle", "rad", 2.0, 5.0, 1).unwrap();
        assert_eq!(axis.values(), &[2.0]);
        assert_eq!(axis.min_spacing(), None);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            CoordinateAxis::new("t", "s", vec![]),
            Err(ReconError::InvalidAxis(_))
        ));
    }

    #[test]
    fn test_rejects_non_monotone() {
        assert!(CoordinateAxis::new("t", "s", vec![0.0, 1.0, 1.0]).is_err());
        assert!(CoordinateAxis::new("t", "s", vec![0.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(CoordinateAxis::new("t", "s", vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_get_values_with_conversion() {
        let axis = CoordinateAxis::new("angle", "{°}", vec![0.0, 90.0]).unwrap();
        let rad = axis.get_values(Some("rad")).unwrap();
        assert!((rad[1] - std::f64::consts::FRAC_PI_2).abs() < NUMERICAL_EPS);
        assert_eq!(axis.get_values(None).unwrap(), vec![0.0, 90.0]);
        assert!(axis.get_values(Some("s")).is_err());
    }

    #[test]
    fn test_min_spacing() {
        let axis = CoordinateAxis::new("t", "s", vec![0.0, 0.5, 0.6, 2.0]).unwrap();
        assert!((axis.min_spacing().unwrap() - 0.1).abs() < NUMERICAL_EPS);
    }

    #[test]
    fn test_select() {
        let axis = CoordinateAxis::linspace("time", "s", 0.0, 4.0, 5).unwrap();
        let sub = axis.select("time_under", &[0, 2, 4]).unwrap();
        assert_eq!(sub.values(), &[0.0, 2.0, 4.0]);
        assert_eq!(sub.name(), "time_under");
        assert_eq!(sub.unit(), "s");
        assert!(axis.select("bad", &[5]).is_err());
    }

    #[test]
    fn test_display() {
        let axis = CoordinateAxis::linspace("time", "s", 0.0, 1.0, 3).unwrap();
        assert_eq!(axis.to_string(), "time [s] (3 values)");
    }
}
