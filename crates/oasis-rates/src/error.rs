//! Error types for term structure and lattice operations.

use oasis_core::{CoreError, StatusCode};
use oasis_math::MathError;
use thiserror::Error;

use crate::curves::CurveInput;

/// A specialized Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for the interest rate model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The curve has no points.
    #[error("Curve has no points")]
    NoPoints,

    /// Term is not a positive number of years.
    #[error("Invalid term {term}: must be positive")]
    InvalidTerm {
        /// The rejected term in years.
        term: f64,
    },

    /// A rate or factor is outside its valid range.
    #[error("Invalid {kind} {value} at {term} years")]
    InvalidPoint {
        /// What was being set ("rate", "factor", ...).
        kind: &'static str,
        /// Term in years.
        term: f64,
        /// The rejected value.
        value: f64,
    },

    /// The operation needs a curve of the other input type.
    #[error("{operation} requires a {expected} curve")]
    WrongCurveType {
        /// Operation attempted.
        operation: &'static str,
        /// Curve type the operation needs.
        expected: CurveInput,
    },

    /// The model must be solved first.
    #[error("Interest rate model has not been solved")]
    NotSolved,

    /// The curve implies a negative forward rate.
    #[error("Negative forward rate between {from:.2} and {to:.2} years")]
    NegativeForward {
        /// Start of the period in years.
        from: f64,
        /// End of the period in years.
        to: f64,
    },

    /// Lattice calibration failed at a step.
    #[error("Lattice calibration failed at step {step}: {source}")]
    Calibration {
        /// Lattice step that could not be fit.
        step: usize,
        /// Underlying solver failure.
        #[source]
        source: MathError,
    },

    /// Requested time lies beyond the lattice.
    #[error("Time {time:.4} years beyond model horizon {horizon:.4}")]
    BeyondHorizon {
        /// Requested time in years.
        time: f64,
        /// Last lattice time in years.
        horizon: f64,
    },

    /// Invalid lattice configuration.
    #[error("Invalid lattice configuration: {reason}")]
    Config {
        /// What is wrong.
        reason: String,
    },

    /// Core error (permission, dates).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Numerical error.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl ModelError {
    /// Creates an invalid point error.
    #[must_use]
    pub fn invalid_point(kind: &'static str, term: f64, value: f64) -> Self {
        Self::InvalidPoint { kind, term, value }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns the status code this error is reported under.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoPoints
            | Self::InvalidTerm { .. }
            | Self::InvalidPoint { .. }
            | Self::WrongCurveType { .. } => StatusCode::Curve,
            Self::NegativeForward { .. } | Self::Calibration { .. } | Self::Math(_) => {
                StatusCode::TreeFit
            }
            Self::NotSolved | Self::BeyondHorizon { .. } => StatusCode::Model,
            Self::Config { .. } => StatusCode::Config,
            Self::Core(err) => err.status_code(),
        }
    }
}
