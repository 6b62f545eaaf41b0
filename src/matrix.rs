//! Column-major sample matrix for multi-channel signals.
//!
//! [`SampleMatrix`] carries observations of several co-indexed signals: rows
//! run along the sampled coordinate (time, angle, ...) and each column is one
//! channel. The flat storage uses column-major (Fortran) layout, so every
//! channel is a contiguous slice and the matrix converts to a nalgebra
//! `DMatrix` with a plain copy.

use crate::error::{ReconError, Result};
use nalgebra::{DMatrix, Scalar};
use num_complex::Complex;

/// Column-major matrix of samples (rows) by channels (columns).
///
/// Element `(row, col)` lives at index `row + col * nrows`.
///
/// ```
/// use omp_recon::matrix::SampleMatrix;
///
/// // 3 samples, 2 channels
/// let mat = SampleMatrix::from_column_major(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
/// assert_eq!(mat[(2, 0)], 3.0);
/// assert_eq!(mat.column(1), &[4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Clone> SampleMatrix<T> {
    /// Create from flat column-major data.
    ///
    /// Fails with [`ReconError::DimensionMismatch`] if `data.len() != nrows * ncols`.
    pub fn from_column_major(data: Vec<T>, nrows: usize, ncols: usize) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(ReconError::DimensionMismatch(format!(
                "{} values cannot fill a {}x{} sample matrix",
                data.len(),
                nrows,
                ncols
            )));
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create from one vector per channel. All channels must have the same length.
    pub fn from_columns(columns: &[Vec<T>]) -> Result<Self> {
        let nrows = columns.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * columns.len());
        for (c, column) in columns.iter().enumerate() {
            if column.len() != nrows {
                return Err(ReconError::DimensionMismatch(format!(
                    "channel {} has {} samples, expected {}",
                    c,
                    column.len(),
                    nrows
                )));
            }
            data.extend_from_slice(column);
        }
        Ok(Self {
            data,
            nrows,
            ncols: columns.len(),
        })
    }

    /// Single-channel matrix from a signal.
    pub fn from_signal(signal: &[T]) -> Self {
        Self {
            data: signal.to_vec(),
            nrows: signal.len(),
            ncols: 1,
        }
    }

    /// Matrix filled with `value`.
    pub fn filled(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Number of rows (samples per channel).
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns (channels).
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Dimensions as `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Contiguous slice of one channel.
    ///
    /// # Panics
    /// Panics if `col >= ncols`.
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        let start = col * self.nrows;
        &self.data[start..start + self.nrows]
    }

    /// Mutable contiguous slice of one channel.
    ///
    /// # Panics
    /// Panics if `col >= ncols`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        let start = col * self.nrows;
        &mut self.data[start..start + self.nrows]
    }

    /// Iterate over the channels.
    pub fn columns(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.ncols).map(move |c| self.column(c))
    }

    /// Flat column-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume and return the flat column-major storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element-wise conversion into a new matrix of the same shape.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> SampleMatrix<U> {
        SampleMatrix {
            data: self.data.iter().map(f).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> SampleMatrix<T> {
    /// Copy into a nalgebra `DMatrix` (both column-major).
    pub fn to_dmatrix(&self) -> DMatrix<T> {
        DMatrix::from_column_slice(self.nrows, self.ncols, &self.data)
    }

    /// Copy out of a nalgebra `DMatrix`.
    pub fn from_dmatrix(mat: &DMatrix<T>) -> Self {
        let (nrows, ncols) = mat.shape();
        Self {
            data: mat.as_slice().to_vec(),
            nrows,
            ncols,
        }
    }
}

impl SampleMatrix<f64> {
    /// Promote real samples to complex ones with zero imaginary part.
    pub fn to_complex(&self) -> SampleMatrix<Complex<f64>> {
        self.map(|&v| Complex::new(v, 0.0))
    }
}

impl<T> std::ops::Index<(usize, usize)> for SampleMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "SampleMatrix index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &self.data[row + col * self.nrows]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for SampleMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "SampleMatrix index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &mut self.data[row + col * self.nrows]
    }
}

impl<T> std::fmt::Display for SampleMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SampleMatrix({}x{})", self.nrows, self.ncols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_3x2() -> SampleMatrix<f64> {
        SampleMatrix::from_column_major(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap()
    }

    #[test]
    fn test_from_column_major_rejects_bad_length() {
        let err = SampleMatrix::from_column_major(vec![1.0, 2.0], 3, 2).unwrap_err();
        assert!(matches!(err, ReconError::DimensionMismatch(_)));
    }

    #[test]
    fn test_from_columns_matches_column_major() {
        let mat = SampleMatrix::from_columns(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(mat, sample_3x2());
    }

    #[test]
    fn test_from_columns_ragged() {
        let err = SampleMatrix::from_columns(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, ReconError::DimensionMismatch(_)));
    }

    #[test]
    fn test_index_layout() {
        let mat = sample_3x2();
        assert_eq!(mat[(0, 0)], 1.0);
        assert_eq!(mat[(2, 0)], 3.0);
        assert_eq!(mat[(0, 1)], 4.0);
        assert_eq!(mat[(2, 1)], 6.0);
    }

    #[test]
    fn test_column_mut() {
        let mut mat = sample_3x2();
        mat.column_mut(1)[2] = 60.0;
        assert_eq!(mat[(2, 1)], 60.0);
        assert_eq!(mat.columns().count(), 2);
    }

    #[test]
    fn test_from_signal_is_single_channel() {
        let mat = SampleMatrix::from_signal(&[1.0, 2.0]);
        assert_eq!(mat.shape(), (2, 1));
        assert_eq!(mat.column(0), &[1.0, 2.0]);
    }

    #[test]
    fn test_nalgebra_bridge() {
        let mat = sample_3x2();
        let dmat = mat.to_dmatrix();
        assert_eq!(dmat[(1, 1)], 5.0);
        assert_eq!(SampleMatrix::from_dmatrix(&dmat), mat);
    }

    #[test]
    fn test_to_complex() {
        let c = sample_3x2().to_complex();
        assert_eq!(c[(1, 0)], Complex::new(2.0, 0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", sample_3x2()), "SampleMatrix(3x2)");
    }
}
