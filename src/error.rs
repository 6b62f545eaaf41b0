//! Error type for sparse reconstruction.
//!
//! Every failure is reported synchronously by the call that detects it.
//! Nothing is retried internally and no partial result is returned.

use thiserror::Error;

/// Errors raised by the undersampling utilities, the OMP solver and the
/// labeled-array adapter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconError {
    /// Retention fraction outside `(0, 1]`, or it leaves zero samples.
    #[error("invalid fraction {fraction}: must be in (0, 1] and keep at least one of {len} samples")]
    InvalidFraction { fraction: f64, len: usize },

    /// A sub-axis value has no counterpart in the full axis, or no axis of a
    /// container matches the requested coordinate.
    #[error("axis mismatch: {0}")]
    AxisMismatch(String),

    /// Inconsistent lengths or shapes between indices, observations and axes.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Sparsity budget outside `[1, max]`.
    #[error("invalid sparsity {n_coefs}: must be in [1, {max}]")]
    InvalidSparsity { n_coefs: usize, max: usize },

    /// Least-squares system on the selected support is rank-deficient.
    #[error("least-squares system is singular for a support of {support_len} atoms; reduce n_coefs")]
    SingularSystem { support_len: usize },

    /// An observation is NaN or infinite.
    #[error("non-finite observation at row {row}, channel {channel}")]
    NonFiniteObservation { row: usize, channel: usize },

    /// Axis values are empty, non-finite or not strictly increasing.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),

    /// Unit conversion between unknown or unrelated units.
    #[error("cannot convert from unit '{from}' to unit '{to}'")]
    IncompatibleUnits { from: String, to: String },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ReconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ReconError::InvalidSparsity {
            n_coefs: 12,
            max: 10,
        };
        assert_eq!(err.to_string(), "invalid sparsity 12: must be in [1, 10]");

        let err = ReconError::IncompatibleUnits {
            from: "s".into(),
            to: "rad".into(),
        };
        assert!(err.to_string().contains("'s'"));
        assert!(err.to_string().contains("'rad'"));
    }

    #[test]
    fn test_non_finite_message_locates_value() {
        let err = ReconError::NonFiniteObservation { row: 3, channel: 1 };
        assert_eq!(err.to_string(), "non-finite observation at row 3, channel 1");
    }

    #[test]
    fn test_singular_message_suggests_fix() {
        let err = ReconError::SingularSystem { support_len: 4 };
        assert!(err.to_string().contains("reduce n_coefs"));
    }
}
