//! Status and diagnostics attached to every stateful entity.
//!
//! A [`Status`] holds at most one terminal error and an ordered list of
//! warnings. Warnings never block a result; an error means the owner's
//! numeric outputs are undefined until the next successful operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of warnings retained by a [`Status`].
pub const MAX_WARNINGS: usize = 12;

/// Diagnostic codes.
///
/// Codes are grouped by hundreds: construction (1xx), calibration (2xx),
/// convergence (3xx), input (4xx), permission (5xx), internal (6xx) and
/// warnings (10xx). Zero is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum StatusCode {
    /// No error.
    #[default]
    None = 0,

    // construction
    /// Invalid date input.
    Date = 100,
    /// Invalid maturity date.
    Maturity = 102,
    /// Invalid coupon.
    Coupon = 103,
    /// Invalid option date.
    OptionDate = 104,
    /// Invalid option price.
    OptionPrice = 105,
    /// Invalid sink date.
    SinkDate = 106,
    /// Invalid sink price or amount.
    SinkPrice = 107,
    /// Invalid face amount.
    FaceAmount = 108,
    /// Invalid valuation date.
    PvDate = 109,
    /// Valuation date is on or after maturity.
    Matured = 110,

    // calibration
    /// Invalid or empty curve.
    Curve = 200,
    /// Curve cannot be fit to a lattice.
    TreeFit = 201,
    /// Interest rate model missing or not solved.
    Model = 202,

    // convergence
    /// Failed to compute OAS from price.
    ComputeOas = 300,
    /// Failed to compute price from OAS.
    ComputePrice = 301,
    /// Failed to compute yield from price.
    ComputeYield = 302,

    // input
    /// Invalid OAS.
    Oas = 400,
    /// Invalid price.
    Price = 401,
    /// Invalid yield.
    Yield = 402,
    /// Quote kind not applicable to this bond.
    QuoteType = 403,
    /// Duration shift outside `[1, 300)` basis points.
    DurationShift = 404,
    /// Invalid engine configuration.
    Config = 405,

    // permission
    /// Feature not authorized.
    Permission = 500,

    /// Internal failure.
    Internal = 600,

    // warnings
    /// Rate out of range, a substitute was used.
    RateSubstituted = 1000,
    /// Volatility out of range, clamped.
    VolatilityClamped = 1001,
    /// Notice period out of range, adjusted.
    NoticePeriod = 1002,
    /// Outstanding amount exceeds remaining schedule, reduced.
    OutstandingHigh = 1003,
    /// Outstanding amount negligible, schedule trusted.
    OutstandingLow = 1004,
    /// Sink schedule exceeds face amount, schedule trusted.
    SinkSumHigh = 1005,
    /// Sink schedule retires the bond before maturity.
    SinkTooSoon = 1006,
    /// Accumulated amount could not be fully designated to sinks.
    SinkUndesignated = 1007,
    /// OAS solved, but the price fit is imperfect.
    ImperfectOas = 1008,
    /// Too many warnings, later ones dropped.
    TooMany = 1009,
}

impl StatusCode {
    /// Numeric value of the code.
    #[must_use]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// True for recoverable, non-blocking codes.
    #[must_use]
    pub fn is_warning(self) -> bool {
        self.code() >= 1000
    }

    /// True for success.
    #[must_use]
    pub fn is_none(self) -> bool {
        self == StatusCode::None
    }

    /// Human-readable description of the code.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            StatusCode::None => "no error",
            StatusCode::Date => "invalid date input",
            StatusCode::Maturity => "invalid maturity",
            StatusCode::Coupon => "invalid coupon, must be >= 0",
            StatusCode::OptionDate => "invalid option date",
            StatusCode::OptionPrice => "invalid option price",
            StatusCode::SinkDate => "invalid sink date",
            StatusCode::SinkPrice => "invalid sink price",
            StatusCode::FaceAmount => "invalid face amount",
            StatusCode::PvDate => "invalid valuation date",
            StatusCode::Matured => "valuation date is after maturity",
            StatusCode::Curve => "invalid curve",
            StatusCode::TreeFit => "failed to construct interest rate model",
            StatusCode::Model => "interest rate model missing or unsolved",
            StatusCode::ComputeOas => "failed to compute OAS from price",
            StatusCode::ComputePrice => "failed to compute price from OAS",
            StatusCode::ComputeYield => "failed to compute yield from price",
            StatusCode::Oas => "invalid OAS",
            StatusCode::Price => "invalid price",
            StatusCode::Yield => "invalid yield",
            StatusCode::QuoteType => "invalid quote type",
            StatusCode::DurationShift => "invalid duration shift, must be >= 1 and < 300",
            StatusCode::Config => "invalid engine configuration",
            StatusCode::Permission => "not authorized",
            StatusCode::Internal => "internal failure",
            StatusCode::RateSubstituted => "rate out of range, substitute used",
            StatusCode::VolatilityClamped => "volatility out of range, clamped",
            StatusCode::NoticePeriod => "notice period out of range, adjusted",
            StatusCode::OutstandingHigh => {
                "outstanding exceeds remaining flows, reducing outstanding"
            }
            StatusCode::OutstandingLow => "outstanding below 0.1% of face, trusting schedule",
            StatusCode::SinkSumHigh => "sinking fund schedule exceeds face amount, trusting schedule",
            StatusCode::SinkTooSoon => "sink schedule retires bond before maturity",
            StatusCode::SinkUndesignated => "accumulated amount could not be fully designated",
            StatusCode::ImperfectOas => "imperfect fit of OAS to price",
            StatusCode::TooMany => "too many warnings",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A code with its message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{}] {message}", .code.code())]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: StatusCode,
    /// Message with the specifics of this occurrence.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error and warning accumulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    error: Option<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Status {
    /// Creates an empty status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the error and all warnings.
    pub fn clear(&mut self) {
        self.error = None;
        self.warnings.clear();
    }

    /// Clears the error, keeping warnings.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Records the terminal error. The first error recorded wins.
    pub fn set_error(&mut self, code: StatusCode, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(Diagnostic::new(code, message));
        }
    }

    /// Records a warning.
    ///
    /// Once [`MAX_WARNINGS`] are held, the last slot becomes
    /// [`StatusCode::TooMany`] and further warnings are dropped.
    pub fn warn(&mut self, code: StatusCode, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: {}", code.description(), message);
        if self.warnings.len() < MAX_WARNINGS {
            self.warnings.push(Diagnostic::new(code, message));
        } else if let Some(last) = self.warnings.last_mut() {
            if last.code != StatusCode::TooMany {
                *last = Diagnostic::new(StatusCode::TooMany, StatusCode::TooMany.description());
            }
        }
    }

    /// Records a diagnostic as either error or warning according to its
    /// code.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        if diagnostic.code.is_warning() {
            self.warn(diagnostic.code, diagnostic.message);
        } else {
            self.set_error(diagnostic.code, diagnostic.message);
        }
    }

    /// Copies the warnings of another status into this one.
    pub fn absorb_warnings(&mut self, other: &Status) {
        for w in &other.warnings {
            self.warn(w.code, w.message.clone());
        }
    }

    /// The error code, [`StatusCode::None`] on success.
    #[must_use]
    pub fn error(&self) -> StatusCode {
        self.error.as_ref().map_or(StatusCode::None, |e| e.code)
    }

    /// The error message, empty on success.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_ref().map_or("", |e| e.message.as_str())
    }

    /// The error diagnostic, if any.
    #[must_use]
    pub fn error_diagnostic(&self) -> Option<&Diagnostic> {
        self.error.as_ref()
    }

    /// Warnings in the order recorded.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// True if any warning with `code` was recorded.
    #[must_use]
    pub fn has_warning(&self, code: StatusCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// True when no error is recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts the status into a `Result`, returning the error diagnostic
    /// if one is recorded.
    pub fn check(&self) -> Result<(), Diagnostic> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(e) => write!(f, "error {e}")?,
            None => write!(f, "ok")?,
        }
        if !self.warnings.is_empty() {
            write!(f, " ({} warnings)", self.warnings.len())?;
        }
        Ok(())
    }
}

/// Entities that carry a [`Status`] after each operation.
pub trait HasStatus {
    /// The status of the last operation.
    fn status(&self) -> &Status;

    /// Shorthand for `status().error()`.
    fn error(&self) -> StatusCode {
        self.status().error()
    }

    /// Shorthand for `status().warnings()`.
    fn warnings(&self) -> &[Diagnostic] {
        self.status().warnings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_status_is_ok() {
        let status = Status::new();
        assert!(status.is_ok());
        assert_eq!(status.error(), StatusCode::None);
        assert_eq!(status.error_message(), "");
        assert!(status.check().is_ok());
    }

    #[test]
    fn test_first_error_wins() {
        let mut status = Status::new();
        status.set_error(StatusCode::Curve, "no points");
        status.set_error(StatusCode::TreeFit, "later");
        assert_eq!(status.error(), StatusCode::Curve);
        let err = status.check().unwrap_err();
        assert_eq!(err.code, StatusCode::Curve);
        assert!(err.to_string().contains("no points"));
    }

    #[test]
    fn test_warning_cap() {
        let mut status = Status::new();
        for i in 0..20 {
            status.warn(StatusCode::RateSubstituted, format!("warning {i}"));
        }
        assert_eq!(status.warnings().len(), MAX_WARNINGS);
        assert_eq!(status.warnings()[MAX_WARNINGS - 2].message, "warning 10");
        assert_eq!(status.warnings()[MAX_WARNINGS - 1].code, StatusCode::TooMany);
        assert!(status.is_ok());
    }

    #[test]
    fn test_record_routes_by_code() {
        let mut status = Status::new();
        status.record(Diagnostic::new(StatusCode::ImperfectOas, "fit"));
        assert!(status.is_ok());
        assert!(status.has_warning(StatusCode::ImperfectOas));
        status.record(Diagnostic::new(StatusCode::ComputeOas, "no root"));
        assert_eq!(status.error(), StatusCode::ComputeOas);

        status.clear();
        assert!(status.is_ok());
        assert!(status.warnings().is_empty());
    }

    #[test]
    fn test_code_groups() {
        assert!(StatusCode::TooMany.is_warning());
        assert!(StatusCode::SinkSumHigh.is_warning());
        assert!(!StatusCode::TreeFit.is_warning());
        assert!(StatusCode::None.is_none());
        assert_eq!(StatusCode::Permission.code(), 500);
    }
}
