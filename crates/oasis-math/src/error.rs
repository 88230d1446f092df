//! Errors from the root finders and interpolators.

use thiserror::Error;

/// Result alias for `oasis-math`.
pub type MathResult<T> = Result<T, MathError>;

/// Why a root finder or interpolator gave up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The iteration cap was reached before the tolerance was met.
    #[error("no root within tolerance after {iterations} iterations, |f| = {residual:.2e}")]
    NoConvergence {
        /// Iterations spent.
        iterations: u32,
        /// Residual at the last iterate.
        residual: f64,
    },

    /// The function does not change sign over the search interval.
    #[error("no sign change on [{a}, {b}]: f = {fa:.2e} and {fb:.2e}")]
    NoSignChange {
        /// Left end.
        a: f64,
        /// Right end.
        b: f64,
        /// Value at `a`.
        fa: f64,
        /// Value at `b`.
        fb: f64,
    },

    /// A Newton step hit a vanishing slope.
    #[error("slope {slope:.2e} too flat for a Newton step")]
    FlatSlope {
        /// The derivative.
        slope: f64,
    },

    /// A query fell outside the knots and extrapolation is off.
    #[error("{x} lies outside the knots [{min}, {max}]")]
    OutsideKnots {
        /// Query point.
        x: f64,
        /// First knot.
        min: f64,
        /// Last knot.
        max: f64,
    },

    /// Too few knots to interpolate.
    #[error("{actual} knots given, {required} needed")]
    TooFewKnots {
        /// Knots needed.
        required: usize,
        /// Knots given.
        actual: usize,
    },

    /// Knots or arguments that make no sense.
    #[error("bad input: {reason}")]
    BadInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    pub(crate) fn bad_input(reason: impl Into<String>) -> Self {
        Self::BadInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MathError::NoConvergence {
            iterations: 100,
            residual: 1e-6,
        };
        assert!(err.to_string().contains("100 iterations"));
        assert_eq!(
            MathError::bad_input("unsorted").to_string(),
            "bad input: unsorted"
        );
    }
}
