//! Error types for valuation.

use oasis_bonds::BondError;
use oasis_core::{CoreError, Diagnostic, StatusCode};
use oasis_rates::ModelError;
use thiserror::Error;

/// A specialized Result type for valuation operations.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors that can occur during valuation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// The valuation could not be set up; every query repeats this error
    /// until the next reset.
    #[error("Valuation not set up: {0}")]
    Setup(Diagnostic),

    /// The operation needs an interest rate model.
    #[error("No interest rate model")]
    NoModel,

    /// No OAS reproduces the price.
    #[error("Cannot compute OAS for price {price}: {reason}")]
    ComputeOas {
        /// Target price.
        price: f64,
        /// Why the solve failed.
        reason: String,
    },

    /// The lattice produced an unusable price.
    #[error("Cannot compute price at OAS {oas}bp")]
    ComputePrice {
        /// OAS in basis points.
        oas: f64,
    },

    /// No yield reproduces the price.
    #[error("Cannot compute yield for price {price}: {reason}")]
    ComputeYield {
        /// Target price.
        price: f64,
        /// Why the solve failed.
        reason: String,
    },

    /// OAS input is not a number.
    #[error("Invalid OAS {oas}")]
    InvalidOas {
        /// The rejected OAS.
        oas: f64,
    },

    /// Price input is not a positive number.
    #[error("Invalid price {price}")]
    InvalidPrice {
        /// The rejected price.
        price: f64,
    },

    /// Yield input is out of range.
    #[error("Invalid yield {yield_pct}")]
    InvalidYield {
        /// The rejected yield in percent.
        yield_pct: f64,
    },

    /// The bond has no exercise date for the requested workout.
    #[error("Bond has no {workout} date after the notice period")]
    NoWorkout {
        /// "call" or "put".
        workout: &'static str,
    },

    /// Duration shift outside `[1, 300)` basis points.
    #[error("Duration shift {bp}bp outside [1, 300)")]
    DurationShift {
        /// The rejected shift.
        bp: f64,
    },

    /// Invalid engine configuration.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// What is wrong.
        reason: String,
    },

    /// Bond or cash flow failure.
    #[error(transparent)]
    Bond(#[from] BondError),

    /// Model or lattice failure.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Permission or date failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ValueError {
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
            Self::Setup(diagnostic) => diagnostic.code,
            Self::NoModel => StatusCode::Model,
            Self::ComputeOas { .. } => StatusCode::ComputeOas,
            Self::ComputePrice { .. } => StatusCode::ComputePrice,
            Self::ComputeYield { .. } => StatusCode::ComputeYield,
            Self::InvalidOas { .. } => StatusCode::Oas,
            Self::InvalidPrice { .. } => StatusCode::Price,
            Self::InvalidYield { .. } => StatusCode::Yield,
            Self::NoWorkout { .. } => StatusCode::QuoteType,
            Self::DurationShift { .. } => StatusCode::DurationShift,
            Self::Config { .. } => StatusCode::Config,
            Self::Bond(err) => err.status_code(),
            Self::Model(err) => err.status_code(),
            Self::Core(err) => err.status_code(),
        }
    }

    /// The error as a status diagnostic.
    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Setup(diagnostic) => diagnostic.clone(),
            other => Diagnostic::new(other.status_code(), other.to_string()),
        }
    }
}
