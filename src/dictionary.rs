//! Inverse-DFT dictionary over a uniform sample grid.
//!
//! Atom `j` of an `n`-point grid with Fourier period `p` is
//!
//! ```text
//! d_j[i] = exp(2πi · i·j / p) / √n,   i = 0..n, j = 0..p
//! ```
//!
//! so every atom has unit norm over the full grid. The dictionary is never
//! stored: correlations `D_Mᴴ r` against the measured rows `M` are a
//! zero-filled forward FFT of the residual, and resynthesis `D[:, S] β` is
//! an inverse FFT of the sparse spectrum. Only the `|M| × |S|` block needed
//! by the least-squares step is materialized.

use crate::error::{ReconError, Result};
use nalgebra::DMatrix;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// How the sample grid relates to the Fourier period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Periodicity {
    /// The last sample closes the period (`linspace`-style grids that include
    /// both endpoints of one period). The period is `n - 1` samples and the
    /// last row repeats the first one. Exact tones on such grids stay exactly
    /// sparse, whereas an `n`-sample period leaks them across bins.
    ///
    /// Observations at both ends of the grid are fitted by one value, so when
    /// they disagree the reconstruction replaces them with a compromise. For
    /// `n = 2` only the DC atom remains and both samples become their mean.
    #[default]
    EndpointInclusive,
    /// Classic DFT grid: the period is `n` samples.
    Open,
}

impl Periodicity {
    /// Fourier period, in samples, of an `n`-point grid.
    pub fn period(self, n: usize) -> usize {
        match self {
            Periodicity::EndpointInclusive if n >= 2 => n - 1,
            _ => n,
        }
    }
}

/// Implicit inverse-DFT dictionary of an `n`-point grid.
#[derive(Clone)]
pub struct FourierDictionary {
    n: usize,
    period: usize,
    scale: f64,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl FourierDictionary {
    /// Plan the dictionary for an `n`-point grid.
    pub fn new(n: usize, periodicity: Periodicity) -> Result<Self> {
        if n == 0 {
            return Err(ReconError::DimensionMismatch(
                "full grid length must be positive".to_string(),
            ));
        }
        let period = periodicity.period(n);
        let mut planner = FftPlanner::<f64>::new();
        Ok(Self {
            n,
            period,
            scale: 1.0 / (n as f64).sqrt(),
            forward: planner.plan_fft_forward(period),
            inverse: planner.plan_fft_inverse(period),
        })
    }

    /// Number of grid rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: a dictionary has at least one row.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of distinct atoms (columns), equal to the Fourier period.
    #[inline]
    pub fn n_atoms(&self) -> usize {
        self.period
    }

    /// Entry `(row, atom)` of the full dictionary.
    #[inline]
    pub fn entry(&self, row: usize, atom: usize) -> Complex<f64> {
        let p = self.period as u64;
        let k = (row as u64 % p) * (atom as u64 % p) % p;
        Complex::from_polar(self.scale, 2.0 * PI * k as f64 / self.period as f64)
    }

    /// Dense `n × n_atoms` dictionary. Intended for inspection and tests.
    pub fn full_matrix(&self) -> DMatrix<Complex<f64>> {
        DMatrix::from_fn(self.n, self.period, |i, j| self.entry(i, j))
    }

    /// Block of the dictionary on the given rows and atoms.
    pub fn restricted(&self, rows: &[usize], atoms: &[usize]) -> DMatrix<Complex<f64>> {
        DMatrix::from_fn(rows.len(), atoms.len(), |r, c| self.entry(rows[r], atoms[c]))
    }

    /// `D_Mᴴ r` for every atom, where `residual[k]` sits on grid row `rows[k]`.
    pub fn correlate(&self, rows: &[usize], residual: &[Complex<f64>]) -> Vec<Complex<f64>> {
        debug_assert_eq!(rows.len(), residual.len());
        let mut buffer = vec![Complex::new(0.0, 0.0); self.period];
        for (&row, &value) in rows.iter().zip(residual) {
            buffer[row % self.period] += value;
        }
        self.forward.process(&mut buffer);
        for c in buffer.iter_mut() {
            *c *= self.scale;
        }
        buffer
    }

    /// `D[:, atoms] · coefs` over the full grid.
    pub fn synthesize(&self, atoms: &[usize], coefs: &[Complex<f64>]) -> Vec<Complex<f64>> {
        debug_assert_eq!(atoms.len(), coefs.len());
        let mut spectrum = vec![Complex::new(0.0, 0.0); self.period];
        for (&atom, &coef) in atoms.iter().zip(coefs) {
            spectrum[atom % self.period] += coef;
        }
        self.inverse.process(&mut spectrum);
        (0..self.n)
            .map(|i| spectrum[i % self.period] * self.scale)
            .collect()
    }
}

impl std::fmt::Debug for FourierDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FourierDictionary")
            .field("n", &self.n)
            .field("period", &self.period)
            .finish()
    }
}
