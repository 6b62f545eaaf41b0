//! Undersampling of coordinate axes and recovery of sample positions.
//!
//! [`undersample`] draws a random, order-preserving subset of an axis and
//! returns the sample positions together with the reduced axis.
//! [`recover_indices`] is its inverse in the position domain: given only the
//! coordinate values of a reduced axis it finds which positions of the full
//! axis were kept. Both are usable on their own, independently of any
//! labeled-array container.

use crate::axis::CoordinateAxis;
use crate::error::{ReconError, Result};
use crate::helpers::{AXIS_MATCH_FRACTION, NUMERICAL_EPS};
use rand::Rng;

/// Suffix appended to the name of an undersampled axis.
pub const UNDERSAMPLED_SUFFIX: &str = "_under";

/// Number of samples kept when retaining `fraction` of `len` samples.
///
/// Fails with [`ReconError::InvalidFraction`] unless `0 < fraction <= 1` and
/// at least one sample survives.
pub fn sample_count(fraction: f64, len: usize) -> Result<usize> {
    let invalid = || ReconError::InvalidFraction { fraction, len };
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(invalid());
    }
    let m = (fraction * len as f64).floor() as usize;
    if m == 0 || m > len {
        return Err(invalid());
    }
    Ok(m)
}

/// Randomly keep `floor(fraction * n)` positions of `axis`.
///
/// Positions are drawn uniformly without replacement from `rng` and sorted so
/// the reduced axis stays monotone. The reduced axis is named
/// `"<name>_under"` and keeps the unit of `axis`. Seeding `rng` makes the
/// draw reproducible; `axis` is left untouched.
///
/// # Returns
/// `(indices, reduced_axis)` where `reduced_axis.values()[k] == axis.values()[indices[k]]`.
pub fn undersample<R: Rng + ?Sized>(
    fraction: f64,
    axis: &CoordinateAxis,
    rng: &mut R,
) -> Result<(Vec<usize>, CoordinateAxis)> {
    let n = axis.len();
    let m = sample_count(fraction, n)?;

    let mut indices = rand::seq::index::sample(rng, n, m).into_vec();
    indices.sort_unstable();

    let reduced = axis.select(format!("{}{}", axis.name(), UNDERSAMPLED_SUFFIX), &indices)?;
    log::debug!(
        "undersampled axis '{}': kept {} of {} samples",
        axis.name(),
        m,
        n
    );
    Ok((indices, reduced))
}

/// Positions in `full_axis` of the coordinates of `sub_axis`.
///
/// The sub-axis values are converted into the unit of the full axis first,
/// then each one is matched to the nearest full-axis coordinate. A match must
/// lie within a small fraction of the full-axis spacing, otherwise the call
/// fails with [`ReconError::AxisMismatch`].
pub fn recover_indices(full_axis: &CoordinateAxis, sub_axis: &CoordinateAxis) -> Result<Vec<usize>> {
    let sub_values = sub_axis.get_values(Some(full_axis.unit()))?;
    match_positions(full_axis.values(), &sub_values, match_tolerance(full_axis))
}

/// Nearest-value matching of `sub` against the sorted grid `full`.
fn match_positions(full: &[f64], sub: &[f64], tol: f64) -> Result<Vec<usize>> {
    if sub.len() > full.len() {
        return Err(ReconError::AxisMismatch(format!(
            "sub-axis has {} values but the full axis only {}",
            sub.len(),
            full.len()
        )));
    }

    let mut indices = Vec::with_capacity(sub.len());
    for &value in sub {
        let idx = nearest_index(full, value).ok_or_else(|| {
            ReconError::AxisMismatch("full axis has no coordinates".to_string())
        })?;
        let gap = (full[idx] - value).abs();
        if gap > tol {
            return Err(ReconError::AxisMismatch(format!(
                "value {} is {:.3e} away from the nearest full-axis coordinate {} (tolerance {:.3e})",
                value, gap, full[idx], tol
            )));
        }
        if let Some(&prev) = indices.last() {
            if idx <= prev {
                return Err(ReconError::AxisMismatch(format!(
                    "value {} maps to position {} which does not follow position {}",
                    value, idx, prev
                )));
            }
        }
        indices.push(idx);
    }
    Ok(indices)
}

/// Index of the grid value closest to `value`; ties go to the lower index.
fn nearest_index(grid: &[f64], value: f64) -> Option<usize> {
    if grid.is_empty() {
        return None;
    }
    let upper = grid.partition_point(|&g| g < value);
    if upper == 0 {
        return Some(0);
    }
    if upper == grid.len() {
        return Some(grid.len() - 1);
    }
    let lower = upper - 1;
    if value - grid[lower] <= grid[upper] - value {
        Some(lower)
    } else {
        Some(upper)
    }
}

/// Largest gap accepted between a sub-axis value and its match.
fn match_tolerance(axis: &CoordinateAxis) -> f64 {
    match axis.min_spacing() {
        Some(spacing) => AXIS_MATCH_FRACTION * spacing,
        None => {
            let scale = axis.values().first().map_or(1.0, |v| v.abs().max(1.0));
            NUMERICAL_EPS * scale
        }
    }
}
