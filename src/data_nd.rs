//! Labeled N-dimensional arrays and reconstruction along one of their axes.
//!
//! ## Data Layout
//!
//! Values are stored flat in row-major order over the axes: for axes of
//! lengths `d_0, ..., d_{r-1}` the element at multi-index `(i_0, ..., i_{r-1})`
//! sits at `((i_0 * d_1 + i_1) * d_2 + i_2) ...`, so the last axis varies
//! fastest.
//!
//! [`orthogonal_mp`] reconstructs a container along its undersampled axis:
//! the undersampled axis becomes the row dimension, every other axis is
//! flattened into channels, the joint solver runs once over all channels,
//! and the dense result is scattered back with the full axis in place of the
//! undersampled one.

use crate::axis::CoordinateAxis;
use crate::error::{ReconError, Result};
use crate::matrix::SampleMatrix;
use crate::omp::{omp_joint_with, OmpConfig};
use crate::sampling::{recover_indices, UNDERSAMPLED_SUFFIX};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Container of values laid out over named coordinate axes.
///
/// Implementors own their axes and values; reconstruction only reads them and
/// asks for a new instance with one axis (and the values) replaced.
pub trait LabeledArray: Sized {
    /// Axes in storage order.
    fn axes(&self) -> &[CoordinateAxis];

    /// Values in row-major order over [`LabeledArray::axes`].
    fn values(&self) -> &[f64];

    /// New container identical to `self` except for axis `axis_index` and the values.
    fn with_axis_replaced(
        &self,
        axis_index: usize,
        axis: CoordinateAxis,
        values: Vec<f64>,
    ) -> Result<Self>;
}

/// Real-valued field over named axes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataNd {
    /// Field name.
    pub name: String,
    /// Short symbol used in labels.
    pub symbol: String,
    /// Unit of the values.
    pub unit: String,
    axes: Vec<CoordinateAxis>,
    values: Vec<f64>,
}

impl DataNd {
    /// Build a field; `values.len()` must equal the product of the axis lengths.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        unit: impl Into<String>,
        axes: Vec<CoordinateAxis>,
        values: Vec<f64>,
    ) -> Result<Self> {
        check_shape(&axes, values.len())?;
        Ok(Self {
            name: name.into(),
            symbol: symbol.into(),
            unit: unit.into(),
            axes,
            values,
        })
    }

    /// Axis lengths in storage order.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(CoordinateAxis::len).collect()
    }

    /// Axis with the given name.
    pub fn axis(&self, name: &str) -> Option<&CoordinateAxis> {
        self.axes.iter().find(|a| a.name() == name)
    }

    /// Value at a multi-index, `None` when out of bounds or of the wrong rank.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.axes.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, axis) in index.iter().zip(&self.axes) {
            if i >= axis.len() {
                return None;
            }
            flat = flat * axis.len() + i;
        }
        self.values.get(flat).copied()
    }

    /// Reconstruct along the undersampled counterpart of `full_axis`.
    pub fn orthogonal_mp(&self, full_axis: &CoordinateAxis, n_coefs: Option<usize>) -> Result<Self> {
        orthogonal_mp(self, full_axis, &OmpConfig::default().with_n_coefs(n_coefs))
    }

    /// Same as [`DataNd::orthogonal_mp`] with explicit solver settings.
    pub fn orthogonal_mp_with(&self, full_axis: &CoordinateAxis, config: &OmpConfig) -> Result<Self> {
        orthogonal_mp(self, full_axis, config)
    }
}

impl LabeledArray for DataNd {
    fn axes(&self) -> &[CoordinateAxis] {
        &self.axes
    }

    fn values(&self) -> &[f64] {
        &self.values
    }

    fn with_axis_replaced(
        &self,
        axis_index: usize,
        axis: CoordinateAxis,
        values: Vec<f64>,
    ) -> Result<Self> {
        if axis_index >= self.axes.len() {
            return Err(ReconError::DimensionMismatch(format!(
                "axis index {} out of range for {} axes",
                axis_index,
                self.axes.len()
            )));
        }
        let mut axes = self.axes.clone();
        axes[axis_index] = axis;
        Self::new(
            self.name.clone(),
            self.symbol.clone(),
            self.unit.clone(),
            axes,
            values,
        )
    }
}

fn check_shape(axes: &[CoordinateAxis], len: usize) -> Result<()> {
    let expected: usize = axes.iter().map(CoordinateAxis::len).product();
    if axes.is_empty() || expected != len {
        return Err(ReconError::DimensionMismatch(format!(
            "{} values do not match axis shape {:?}",
            len,
            axes.iter().map(CoordinateAxis::len).collect::<Vec<_>>()
        )));
    }
    Ok(())
}

/// Position of the axis of `axes` holding the undersampled version of `full_axis`.
///
/// An axis with exactly the full axis name wins; otherwise the
/// `"<name>_under"` naming used by [`crate::sampling::undersample`] is accepted.
pub fn find_undersampled_axis(axes: &[CoordinateAxis], full_axis: &CoordinateAxis) -> Result<usize> {
    let under_name = format!("{}{}", full_axis.name(), UNDERSAMPLED_SUFFIX);
    axes.iter()
        .position(|a| a.name() == full_axis.name())
        .or_else(|| axes.iter().position(|a| a.name() == under_name))
        .ok_or_else(|| {
            ReconError::AxisMismatch(format!(
                "no axis named '{}' or '{}' among {:?}",
                full_axis.name(),
                under_name,
                axes.iter().map(CoordinateAxis::name).collect::<Vec<_>>()
            ))
        })
}

/// Reconstruct `container` on `full_axis`.
///
/// The undersampled axis is located by name, its sample positions in
/// `full_axis` are recovered, all other axes are flattened into channels and
/// solved jointly with one shared support. Returns a new container; the
/// input is not modified.
pub fn orthogonal_mp<C: LabeledArray>(
    container: &C,
    full_axis: &CoordinateAxis,
    config: &OmpConfig,
) -> Result<C> {
    let axes = container.axes();
    check_shape(axes, container.values().len())?;

    let axis_index = find_undersampled_axis(axes, full_axis)?;
    let indices = recover_indices(full_axis, &axes[axis_index])?;

    let shape: Vec<usize> = axes.iter().map(CoordinateAxis::len).collect();
    let layout = ChannelLayout::new(&shape, axis_index);
    log::debug!(
        "orthogonal_mp: axis '{}' ({} -> {} samples), {} channels",
        axes[axis_index].name(),
        layout.rows,
        full_axis.len(),
        layout.channels()
    );

    let observed = layout.gather(container.values())?;
    let reconstructed = omp_joint_with(&observed, &indices, full_axis.len(), config)?;
    let values = layout.scatter(&reconstructed);

    container.with_axis_replaced(axis_index, full_axis.clone(), values)
}

/// Mapping between row-major N-d storage and a rows-by-channels matrix.
///
/// With the target axis of length `rows`, `outer` the product of the axis
/// lengths before it and `inner` the product after it, element
/// `(o, r, i)` sits at `(o * rows + r) * inner + i` and belongs to channel
/// `o * inner + i`.
#[derive(Debug, Clone, Copy)]
struct ChannelLayout {
    outer: usize,
    rows: usize,
    inner: usize,
}

impl ChannelLayout {
    fn new(shape: &[usize], axis_index: usize) -> Self {
        Self {
            outer: shape[..axis_index].iter().product(),
            rows: shape[axis_index],
            inner: shape[axis_index + 1..].iter().product(),
        }
    }

    fn channels(&self) -> usize {
        self.outer * self.inner
    }

    fn gather(&self, values: &[f64]) -> Result<SampleMatrix<f64>> {
        let mut data = Vec::with_capacity(values.len());
        for o in 0..self.outer {
            for i in 0..self.inner {
                for r in 0..self.rows {
                    data.push(values[(o * self.rows + r) * self.inner + i]);
                }
            }
        }
        SampleMatrix::from_column_major(data, self.rows, self.channels())
    }

    /// Inverse of `gather` for a matrix that may have a different row count.
    fn scatter(&self, matrix: &SampleMatrix<f64>) -> Vec<f64> {
        let rows = matrix.nrows();
        let mut values = vec![0.0; self.outer * rows * self.inner];
        for o in 0..self.outer {
            for i in 0..self.inner {
                let column = matrix.column(o * self.inner + i);
                for (r, &v) in column.iter().enumerate() {
                    values[(o * rows + r) * self.inner + i] = v;
                }
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> DataNd {
        let a = CoordinateAxis::new("a", "", vec![0.0, 1.0]).unwrap();
        let b = CoordinateAxis::new("b", "", vec![0.0, 1.0, 2.0]).unwrap();
        DataNd::new("f", "F", "m", vec![a, b], vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap()
    }

    #[test]
    fn test_new_checks_shape() {
        let a = CoordinateAxis::new("a", "", vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            DataNd::new("f", "F", "m", vec![a], vec![1.0]),
            Err(ReconError::DimensionMismatch(_))
        ));
        assert!(DataNd::new("f", "F", "m", vec![], vec![]).is_err());
    }

    #[test]
    fn test_get_row_major() {
        let field = grid_2x3();
        assert_eq!(field.shape(), vec![2, 3]);
        assert_eq!(field.get(&[0, 2]), Some(2.0));
        assert_eq!(field.get(&[1, 0]), Some(10.0));
        assert_eq!(field.get(&[2, 0]), None);
        assert_eq!(field.get(&[0]), None);
    }

    #[test]
    fn test_layout_gather_scatter_inverse() {
        let shape = [2, 3, 4];
        let values: Vec<f64> = (0..24).map(|v| v as f64).collect();
        for axis_index in 0..3 {
            let layout = ChannelLayout::new(&shape, axis_index);
            let matrix = layout.gather(&values).unwrap();
            assert_eq!(matrix.nrows(), shape[axis_index]);
            assert_eq!(matrix.ncols(), 24 / shape[axis_index]);
            assert_eq!(layout.scatter(&matrix), values);
        }
    }

    #[test]
    fn test_gather_puts_axis_on_rows() {
        let field = grid_2x3();
        let layout = ChannelLayout::new(&field.shape(), 1);
        let matrix = layout.gather(field.values()).unwrap();
        assert_eq!(matrix.column(0), &[0.0, 1.0, 2.0]);
        assert_eq!(matrix.column(1), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_find_axis_prefers_exact_name() {
        let full = CoordinateAxis::linspace("time", "s", 0.0, 1.0, 5).unwrap();
        let under = full.select("time_under", &[0, 2]).unwrap();
        let exact = full.select("time", &[1, 3]).unwrap();
        let angle = CoordinateAxis::new("angle", "rad", vec![0.0]).unwrap();

        assert_eq!(find_undersampled_axis(&[angle.clone(), under.clone()], &full).unwrap(), 1);
        assert_eq!(find_undersampled_axis(&[under, exact, angle.clone()], &full).unwrap(), 1);
        assert!(matches!(
            find_undersampled_axis(&[angle], &full),
            Err(ReconError::AxisMismatch(_))
        ));
    }

    #[test]
    fn test_with_axis_replaced_keeps_metadata() {
        let field = grid_2x3();
        let b = CoordinateAxis::new("b", "", vec![0.0, 0.5, 1.0, 1.5]).unwrap();
        let out = field.with_axis_replaced(1, b, vec![0.0; 8]).unwrap();
        assert_eq!(out.name, "f");
        assert_eq!(out.symbol, "F");
        assert_eq!(out.unit, "m");
        assert_eq!(out.shape(), vec![2, 4]);
        assert_eq!(field.shape(), vec![2, 3]);
        assert!(field
            .with_axis_replaced(5, CoordinateAxis::new("c", "", vec![0.0]).unwrap(), vec![0.0])
            .is_err());
    }

    #[test]
    fn test_orthogonal_mp_on_middle_axis() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        use std::f64::consts::PI;
        let n = 40;
        let full = CoordinateAxis::linspace("time", "s", 0.0, 1.0, n).unwrap();
        let mut indices =
            rand::seq::index::sample(&mut StdRng::seed_from_u64(11), n, 32).into_vec();
        indices.sort_unstable();
        let under = full.select("time_under", &indices).unwrap();
        let gain = CoordinateAxis::new("gain", "", vec![1.0, 2.0]).unwrap();
        let phase = CoordinateAxis::new("phase", "rad", vec![0.0, 0.5, 1.0]).unwrap();

        let tone = |g: f64, p: f64, t: f64| g * (2.0 * PI * 3.0 * t + p).cos() + 0.5;
        let build = |axis: &CoordinateAxis| -> Vec<f64> {
            let mut values = Vec::new();
            for &g in gain.values() {
                for &t in axis.values() {
                    for &p in phase.values() {
                        values.push(tone(g, p, t));
                    }
                }
            }
            values
        };

        let field = DataNd::new(
            "field",
            "X",
            "dimless",
            vec![gain.clone(), under.clone(), phase.clone()],
            build(&under),
        )
        .unwrap();
        let recovered = field.orthogonal_mp(&full, Some(6)).unwrap();

        assert_eq!(recovered.shape(), vec![2, n, 3]);
        assert_eq!(recovered.axes()[1], full);
        assert_eq!(field.axes()[1], under);
        let expected = build(&full);
        for (a, e) in recovered.values().iter().zip(&expected) {
            assert!((a - e).abs() < 1e-8, "{} vs {}", a, e);
        }
    }
}
