//! Error types for the core crate.

use thiserror::Error;

use crate::auth::Feature;
use crate::status::StatusCode;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by dates, conventions and the authorization hook.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid calendar date or unparseable date text.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unknown day count or frequency name.
    #[error("Unknown convention: '{name}'")]
    UnknownConvention {
        /// The name that failed to parse.
        name: String,
    },

    /// The installed authorizer refused a feature.
    #[error("Permission denied for {feature} functions")]
    PermissionDenied {
        /// The feature that was refused.
        feature: Feature,
    },

    /// An authorizer was already installed for this process.
    #[error("An authorizer is already installed")]
    AuthorizerInstalled,
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an unknown convention error.
    #[must_use]
    pub fn unknown_convention(name: impl Into<String>) -> Self {
        Self::UnknownConvention { name: name.into() }
    }

    /// Returns the status code this error is reported under.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDate { .. } | Self::UnknownConvention { .. } => StatusCode::Date,
            Self::PermissionDenied { .. } | Self::AuthorizerInstalled => StatusCode::Permission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_status_codes() {
        let err = CoreError::PermissionDenied {
            feature: Feature::Lattice,
        };
        assert_eq!(err.status_code(), StatusCode::Permission);
        assert!(err.to_string().contains("lattice"));
        assert_eq!(
            CoreError::unknown_convention("ACT/999").status_code(),
            StatusCode::Date
        );
    }
}
