//! Error types for bond operations.

use std::fmt;

use oasis_core::{CoreError, Date, Diagnostic, StatusCode};
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// A schedule a rejected entry was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provision {
    /// Call schedule.
    Call,
    /// Put schedule.
    Put,
    /// Sink schedule.
    Sink,
    /// Coupon steps.
    Coupon,
}

impl fmt::Display for Provision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provision::Call => write!(f, "call"),
            Provision::Put => write!(f, "put"),
            Provision::Sink => write!(f, "sink"),
            Provision::Coupon => write!(f, "coupon step"),
        }
    }
}

/// Errors that can occur during bond operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Maturity is not after the initial date.
    #[error("Maturity {maturity} is not after initial date {issue}")]
    InvalidMaturity {
        /// Initial (dated) date.
        issue: Date,
        /// Maturity date.
        maturity: Date,
    },

    /// Coupon is negative or not a number.
    #[error("Invalid coupon {coupon}")]
    InvalidCoupon {
        /// The rejected coupon in percent.
        coupon: f64,
    },

    /// A schedule entry falls outside the bond's life or on the date of
    /// an opposing option.
    #[error("{provision} date {date} is outside the bond's life or clashes with another provision")]
    ProvisionDate {
        /// Schedule.
        provision: Provision,
        /// The rejected date.
        date: Date,
    },

    /// A schedule entry's price, amount or rate is not usable.
    #[error("Invalid {provision} value {value}")]
    ProvisionValue {
        /// Schedule.
        provision: Provision,
        /// The rejected price, amount or rate.
        value: f64,
    },

    /// Face amount is negative or not a number.
    #[error("Invalid face amount {face}")]
    InvalidFaceAmount {
        /// The rejected face amount.
        face: f64,
    },

    /// Redemption price is not positive.
    #[error("Invalid redemption price {price}")]
    InvalidRedemption {
        /// The rejected price.
        price: f64,
    },

    /// The bond failed construction and cannot be used.
    #[error("Bond is not valid: {0}")]
    InvalidBond(Diagnostic),

    /// The valuation date is not before maturity, or every bond has been
    /// retired by the sinking fund.
    #[error("Bond has matured by {pv_date}")]
    Matured {
        /// Valuation date.
        pv_date: Date,
    },

    /// The valuation date precedes the initial date.
    #[error("Valuation date {pv_date} is before initial date {issue}")]
    PvDateBeforeIssue {
        /// Valuation date.
        pv_date: Date,
        /// Initial date.
        issue: Date,
    },

    /// Date arithmetic failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BondError {
    /// Returns the status code this error is reported under.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidMaturity { .. } => StatusCode::Maturity,
            Self::InvalidCoupon { .. } => StatusCode::Coupon,
            Self::ProvisionDate { provision, .. } => match provision {
                Provision::Call | Provision::Put => StatusCode::OptionDate,
                Provision::Sink => StatusCode::SinkDate,
                Provision::Coupon => StatusCode::Coupon,
            },
            Self::ProvisionValue { provision, .. } => match provision {
                Provision::Call | Provision::Put => StatusCode::OptionPrice,
                Provision::Sink => StatusCode::SinkPrice,
                Provision::Coupon => StatusCode::Coupon,
            },
            Self::InvalidFaceAmount { .. } => StatusCode::FaceAmount,
            Self::InvalidRedemption { .. } => StatusCode::Price,
            Self::InvalidBond(diagnostic) => diagnostic.code,
            Self::Matured { .. } => StatusCode::Matured,
            Self::PvDateBeforeIssue { .. } => StatusCode::PvDate,
            Self::Core(err) => err.status_code(),
        }
    }
}
