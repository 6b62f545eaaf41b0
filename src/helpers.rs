//! Numerical constants shared by the solver and the axis utilities.

use num_complex::Complex;

/// Small epsilon for numerical comparisons (rank detection, zero checks).
pub const NUMERICAL_EPS: f64 = 1e-10;

/// Default relative residual below which OMP stops adding atoms.
pub const DEFAULT_RESIDUAL_TOL: f64 = 1e-9;

/// Default relative imaginary residue dropped silently when casting to real.
pub const DEFAULT_IMAG_TOL: f64 = 1e-6;

/// Fraction of the peak correlation score an atom must reach to count
/// towards the sparsity estimate.
pub const SPARSITY_THRESHOLD: f64 = 0.05;

/// Multiplier applied to the sparsity estimate to get the default budget.
pub const DEFAULT_SPARSITY_FACTOR: usize = 4;

/// Fraction of the minimum grid spacing accepted when matching coordinates.
pub const AXIS_MATCH_FRACTION: f64 = 1e-3;

/// Frobenius norm of a sequence of complex values.
pub fn frobenius_norm(values: &[Complex<f64>]) -> f64 {
    values.iter().map(|v| v.norm_sqr()).sum::<f64>().sqrt()
}
