//! Orthogonal Matching Pursuit over an inverse-DFT dictionary.
//!
//! Recovers a sparse Fourier representation of a signal from samples taken
//! at a subset `M` of an `n`-point grid, then resynthesizes the signal on the
//! full grid. The joint (multiple measurement vector) form recovers several
//! co-indexed channels with one shared support: correlation scores are summed
//! over channels before each greedy selection, so evidence from every channel
//! counts towards the common support. The single-signal form is the
//! one-channel case of the same routine.
//!
//! ## Algorithm
//!
//! 1. `R = Y`, `S = ∅`
//! 2. `c_j = Σ_channels |D_M[:, j]ᴴ R|` for every atom `j ∉ S`
//! 3. append `argmax c_j` to `S` (lowest index on ties)
//! 4. `β = argmin ‖Y − D_M[:, S] β‖` by Householder QR, re-solved in full
//! 5. `R = Y − D_M[:, S] β`
//! 6. stop once `|S| = n_coefs` or `‖R‖ ≤ residual_tol · ‖Y‖`, else go to 2
//! 7. `X = D[:, S] β` on the full grid

use crate::dictionary::{FourierDictionary, Periodicity};
use crate::error::{ReconError, Result};
use crate::helpers::{
    frobenius_norm, DEFAULT_IMAG_TOL, DEFAULT_RESIDUAL_TOL, DEFAULT_SPARSITY_FACTOR,
    NUMERICAL_EPS, SPARSITY_THRESHOLD,
};
use crate::iter_maybe_parallel;
use crate::matrix::SampleMatrix;
use nalgebra::DMatrix;
use num_complex::Complex;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

type C64 = Complex<f64>;

/// Solver settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OmpConfig {
    /// Maximum number of atoms. `None` derives a budget from the data.
    pub n_coefs: Option<usize>,
    /// Relation between the sample grid and the Fourier period.
    pub periodicity: Periodicity,
    /// Stop once `‖R‖ ≤ residual_tol · ‖Y‖`.
    pub residual_tol: f64,
    /// Largest imaginary part, relative to the largest magnitude, dropped
    /// without a warning by the real-valued entry points.
    pub imag_tol: f64,
}

impl Default for OmpConfig {
    fn default() -> Self {
        Self {
            n_coefs: None,
            periodicity: Periodicity::default(),
            residual_tol: DEFAULT_RESIDUAL_TOL,
            imag_tol: DEFAULT_IMAG_TOL,
        }
    }
}

impl OmpConfig {
    pub fn with_n_coefs(mut self, n_coefs: Option<usize>) -> Self {
        self.n_coefs = n_coefs;
        self
    }

    pub fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = periodicity;
        self
    }

    pub fn with_residual_tol(mut self, residual_tol: f64) -> Self {
        self.residual_tol = residual_tol;
        self
    }

    pub fn with_imag_tol(mut self, imag_tol: f64) -> Self {
        self.imag_tol = imag_tol;
        self
    }
}

/// Why the greedy loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The support reached the sparsity budget.
    Budget,
    /// The residual fell below the noise threshold.
    Converged,
    /// Every atom of the dictionary was selected.
    Exhausted,
}

/// Outcome of one OMP run.
#[derive(Debug, Clone)]
pub struct OmpFit {
    /// Selected atoms, in selection order.
    pub support: Vec<usize>,
    /// Coefficients on the support: `|S|` rows, one column per channel.
    pub coefficients: SampleMatrix<C64>,
    /// `‖R‖ / ‖Y‖` after the last least-squares solve (0 for all-zero input).
    pub relative_residual: f64,
    /// Reason the loop stopped.
    pub termination: Termination,
    dictionary: FourierDictionary,
}

impl OmpFit {
    /// Number of channels fitted.
    pub fn n_channels(&self) -> usize {
        self.coefficients.ncols()
    }

    /// Resynthesize every channel on the full grid (`n` rows).
    pub fn synthesize(&self) -> SampleMatrix<C64> {
        let n = self.dictionary.len();
        let k = self.n_channels();
        let mut out = SampleMatrix::filled(n, k, Complex::new(0.0, 0.0));
        if self.support.is_empty() {
            return out;
        }
        for c in 0..k {
            let signal = self
                .dictionary
                .synthesize(&self.support, self.coefficients.column(c));
            out.column_mut(c).copy_from_slice(&signal);
        }
        out
    }
}

/// Run OMP on `y` (`|M|` rows, one column per channel) observed at grid
/// positions `indices` of an `n`-point grid.
///
/// Without an explicit `n_coefs` the budget is estimated from the data and
/// never exceeds the number of distinct period samples observed.
///
/// # Errors
/// * [`ReconError::DimensionMismatch`] if `indices.len() != y.nrows()`, if
///   there are no observations or channels, or if `indices` is not strictly
///   increasing within `0..n`
/// * [`ReconError::NonFiniteObservation`] if `y` holds a NaN or infinity
/// * [`ReconError::InvalidSparsity`] if `config.n_coefs` is `Some(0)` or exceeds `n`
/// * [`ReconError::SingularSystem`] if the least-squares system on the
///   selected support is rank-deficient
pub fn fit(y: &SampleMatrix<C64>, indices: &[usize], n: usize, config: &OmpConfig) -> Result<OmpFit> {
    validate_inputs(y, indices, n)?;
    if let Some(k) = config.n_coefs {
        if k == 0 || k > n {
            return Err(ReconError::InvalidSparsity { n_coefs: k, max: n });
        }
    }

    let dictionary = FourierDictionary::new(n, config.periodicity)?;
    let n_channels = y.ncols();
    let y_norm = frobenius_norm(y.as_slice());

    if y_norm == 0.0 {
        log::debug!("omp: all-zero observations, returning an empty support");
        return Ok(OmpFit {
            support: Vec::new(),
            coefficients: SampleMatrix::filled(0, n_channels, Complex::new(0.0, 0.0)),
            relative_residual: 0.0,
            termination: Termination::Converged,
            dictionary,
        });
    }

    let mut scores = aggregate_scores(&correlate_channels(&dictionary, indices, y));
    let n_atoms = dictionary.n_atoms();
    let budget = match config.n_coefs {
        Some(k) => k,
        None => default_sparsity(&scores, n_atoms.min(distinct_rows(indices, n_atoms))),
    };
    log::debug!(
        "omp: n={} observed={} channels={} atoms={} budget={}",
        n,
        indices.len(),
        n_channels,
        n_atoms,
        budget
    );

    let y_mat = y.to_dmatrix();
    let mut selected = vec![false; n_atoms];
    let mut support: Vec<usize> = Vec::with_capacity(budget);
    let mut coefficients = DMatrix::zeros(0, n_channels);
    let mut relative_residual = 1.0;
    let mut termination = Termination::Budget;

    while support.len() < budget {
        let Some((atom, score)) = best_atom(&scores, &selected) else {
            termination = Termination::Exhausted;
            break;
        };
        selected[atom] = true;
        support.push(atom);

        let (beta, residual) = least_squares(&dictionary, indices, &support, &y_mat)?;
        coefficients = beta;
        relative_residual = frobenius_norm(residual.as_slice()) / y_norm;
        log::trace!(
            "omp: iteration {} selected atom {} (score {:.4e}), relative residual {:.3e}",
            support.len(),
            atom,
            score,
            relative_residual
        );

        if relative_residual <= config.residual_tol {
            termination = Termination::Converged;
            break;
        }
        if support.len() < budget {
            let residual = SampleMatrix::from_dmatrix(&residual);
            scores = aggregate_scores(&correlate_channels(&dictionary, indices, &residual));
        }
    }

    log::debug!(
        "omp: stopped ({:?}) with {} atoms, relative residual {:.3e}",
        termination,
        support.len(),
        relative_residual
    );

    Ok(OmpFit {
        support,
        coefficients: SampleMatrix::from_dmatrix(&coefficients),
        relative_residual,
        termination,
        dictionary,
    })
}

/// Joint reconstruction of complex channels on the full grid (`n × k`).
pub fn omp_joint_complex(
    y: &SampleMatrix<C64>,
    indices: &[usize],
    n: usize,
    config: &OmpConfig,
) -> Result<SampleMatrix<C64>> {
    Ok(fit(y, indices, n, config)?.synthesize())
}

/// Joint reconstruction of real channels with explicit settings.
///
/// The complex reconstruction is cast to real; an imaginary residue larger
/// than `config.imag_tol` (relative) is logged as a warning and dropped.
pub fn omp_joint_with(
    y: &SampleMatrix<f64>,
    indices: &[usize],
    n: usize,
    config: &OmpConfig,
) -> Result<SampleMatrix<f64>> {
    let full = omp_joint_complex(&y.to_complex(), indices, n, config)?;
    Ok(into_real(&full, config.imag_tol))
}

/// Joint reconstruction of real channels (`|M| × k` in, `n × k` out).
pub fn omp_joint(
    y: &SampleMatrix<f64>,
    indices: &[usize],
    n: usize,
    n_coefs: Option<usize>,
) -> Result<SampleMatrix<f64>> {
    omp_joint_with(y, indices, n, &OmpConfig::default().with_n_coefs(n_coefs))
}

/// Reconstruct one real signal of length `n` from samples `y` at `indices`.
///
/// ```
/// use omp_recon::omp::omp;
///
/// let n = 64;
/// let signal: Vec<f64> = (0..n)
///     .map(|i| (2.0 * std::f64::consts::PI * 3.0 * i as f64 / (n - 1) as f64).cos())
///     .collect();
/// let indices: Vec<usize> = (0..n).filter(|i| i % 4 != 1).collect();
/// let y: Vec<f64> = indices.iter().map(|&i| signal[i]).collect();
///
/// let x = omp(&y, &indices, n, Some(4)).unwrap();
/// assert!((x[1] - signal[1]).abs() < 1e-6);
/// ```
pub fn omp(y: &[f64], indices: &[usize], n: usize, n_coefs: Option<usize>) -> Result<Vec<f64>> {
    Ok(omp_joint(&SampleMatrix::from_signal(y), indices, n, n_coefs)?.into_vec())
}

/// Reconstruct one complex signal of length `n` from samples `y` at `indices`.
pub fn omp_complex(
    y: &[C64],
    indices: &[usize],
    n: usize,
    n_coefs: Option<usize>,
) -> Result<Vec<C64>> {
    let config = OmpConfig::default().with_n_coefs(n_coefs);
    Ok(omp_joint_complex(&SampleMatrix::from_signal(y), indices, n, &config)?.into_vec())
}

fn validate_inputs(y: &SampleMatrix<C64>, indices: &[usize], n: usize) -> Result<()> {
    if indices.len() != y.nrows() {
        return Err(ReconError::DimensionMismatch(format!(
            "{} sample indices for {} observation rows",
            indices.len(),
            y.nrows()
        )));
    }
    if indices.is_empty() || y.ncols() == 0 {
        return Err(ReconError::DimensionMismatch(format!(
            "need at least one observation and one channel, got {}x{}",
            y.nrows(),
            y.ncols()
        )));
    }
    if let Some(&last) = indices.last() {
        if last >= n {
            return Err(ReconError::DimensionMismatch(format!(
                "sample index {} out of range for a grid of {} points",
                last, n
            )));
        }
    }
    if let Some(pos) = indices.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ReconError::DimensionMismatch(format!(
            "sample indices must be strictly increasing (position {})",
            pos + 1
        )));
    }
    for (channel, column) in y.columns().enumerate() {
        if let Some(row) = column.iter().position(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(ReconError::NonFiniteObservation { row, channel });
        }
    }
    Ok(())
}

fn correlate_channels(
    dictionary: &FourierDictionary,
    indices: &[usize],
    residual: &SampleMatrix<C64>,
) -> Vec<Vec<C64>> {
    iter_maybe_parallel!(0..residual.ncols())
        .map(|c| dictionary.correlate(indices, residual.column(c)))
        .collect()
}

/// Sum of correlation magnitudes over channels, per atom.
fn aggregate_scores(correlations: &[Vec<C64>]) -> Vec<f64> {
    let n_atoms = correlations.first().map_or(0, Vec::len);
    let mut scores = vec![0.0; n_atoms];
    for channel in correlations {
        for (s, c) in scores.iter_mut().zip(channel) {
            *s += c.norm();
        }
    }
    scores
}

/// Highest-scoring unselected atom; the lowest index wins ties.
fn best_atom(scores: &[f64], selected: &[bool]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (j, (&score, &taken)) in scores.iter().zip(selected).enumerate() {
        if taken {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((j, score)),
        }
    }
    best
}

/// Budget used when the caller gives none: a small multiple of the number of
/// atoms whose initial score reaches `SPARSITY_THRESHOLD` of the peak.
fn default_sparsity(scores: &[f64], n_atoms: usize) -> usize {
    let peak = scores.iter().cloned().fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return 1;
    }
    let significant = scores
        .iter()
        .filter(|&&s| s >= SPARSITY_THRESHOLD * peak)
        .count();
    (DEFAULT_SPARSITY_FACTOR * significant).clamp(1, n_atoms.max(1))
}

/// Number of distinct period samples among the observed rows, which bounds
/// the rank of any restricted dictionary block. Under an endpoint-inclusive
/// period rows `0` and `n - 1` coincide.
fn distinct_rows(indices: &[usize], period: usize) -> usize {
    let mut seen = vec![false; period];
    indices
        .iter()
        .filter(|&&i| !std::mem::replace(&mut seen[i % period], true))
        .count()
}

/// Least squares on the current support. Returns `(β, Y − D_M[:, S] β)`.
fn least_squares(
    dictionary: &FourierDictionary,
    indices: &[usize],
    support: &[usize],
    y: &DMatrix<C64>,
) -> Result<(DMatrix<C64>, DMatrix<C64>)> {
    let singular = || ReconError::SingularSystem {
        support_len: support.len(),
    };
    if support.len() > indices.len() {
        return Err(singular());
    }

    let a = dictionary.restricted(indices, support);
    let qr = a.clone().qr();
    let r = qr.r();

    let diag: Vec<f64> = (0..r.nrows()).map(|i| r[(i, i)].norm()).collect();
    let max_diag = diag.iter().cloned().fold(0.0_f64, f64::max);
    let min_diag = diag.iter().cloned().fold(f64::INFINITY, f64::min);
    if max_diag == 0.0 || min_diag <= NUMERICAL_EPS * max_diag {
        return Err(singular());
    }

    let rhs = qr.q().adjoint() * y;
    let beta = r.solve_upper_triangular(&rhs).ok_or_else(singular)?;
    let residual = y - &a * &beta;
    Ok((beta, residual))
}

/// Real part of `values`, warning when the dropped imaginary part is not
/// negligible relative to the largest magnitude.
fn into_real(values: &SampleMatrix<C64>, imag_tol: f64) -> SampleMatrix<f64> {
    let peak = values.as_slice().iter().map(|v| v.norm()).fold(0.0, f64::max);
    let max_imag = values
        .as_slice()
        .iter()
        .map(|v| v.im.abs())
        .fold(0.0, f64::max);
    if peak > 0.0 && max_imag > imag_tol * peak {
        log::warn!(
            "omp: dropping imaginary residue {:.3e} (relative {:.3e}) from a real reconstruction",
            max_imag,
            max_imag / peak
        );
    }
    values.map(|v| v.re)
}
