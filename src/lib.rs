//! # omp-recon
//!
//! Sparse-spectrum reconstruction of undersampled signals.
//!
//! This crate rebuilds densely sampled signals, or families of co-located
//! signals sharing one sparse frequency support, from an irregular subset of
//! their samples:
//! - Undersampling of coordinate axes and recovery of sample positions
//! - Orthogonal Matching Pursuit over an inverse-DFT dictionary, single-signal
//!   and joint (multiple measurement vectors)
//! - Reconstruction of labeled N-dimensional arrays along one axis
//!
//! ## Data Layout
//!
//! Multi-channel observations are [`SampleMatrix`] values: column-major,
//! rows along the sampled coordinate, one column per channel. Labeled arrays
//! ([`DataNd`]) store values row-major over their axes.
//!
//! ## Example
//!
//! ```
//! use omp_recon::{omp, undersample, CoordinateAxis};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let time = CoordinateAxis::linspace("time", "s", 0.0, 1.0, 200).unwrap();
//! let signal: Vec<f64> = time
//!     .values()
//!     .iter()
//!     .map(|&t| 1.0 + (2.0 * std::f64::consts::PI * 7.0 * t).sin())
//!     .collect();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let (indices, _time_under) = undersample(0.8, &time, &mut rng).unwrap();
//! let observed: Vec<f64> = indices.iter().map(|&i| signal[i]).collect();
//!
//! let dense = omp(&observed, &indices, time.len(), Some(8)).unwrap();
//! assert!(dense.iter().zip(&signal).all(|(a, b)| (a - b).abs() < 1e-6));
//! ```

#![allow(clippy::needless_range_loop)]

pub mod parallel;

pub mod axis;
pub mod data_nd;
pub mod dictionary;
pub mod error;
pub mod helpers;
pub mod matrix;
pub mod omp;
pub mod sampling;
pub mod units;

// Re-export commonly used items
pub use axis::CoordinateAxis;
pub use data_nd::{orthogonal_mp, DataNd, LabeledArray};
pub use dictionary::{FourierDictionary, Periodicity};
pub use error::{ReconError, Result};
pub use helpers::{DEFAULT_IMAG_TOL, DEFAULT_RESIDUAL_TOL, NUMERICAL_EPS};
pub use matrix::SampleMatrix;
pub use omp::{
    fit, omp, omp_complex, omp_joint, omp_joint_complex, omp_joint_with, OmpConfig, OmpFit,
    Termination,
};
pub use sampling::{recover_indices, undersample};
