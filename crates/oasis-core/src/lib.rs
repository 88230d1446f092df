//! # Oasis Core
//!
//! Foundational types for the Oasis option-adjusted spread engine.
//!
//! - **Types**: [`Date`] and coupon [`Frequency`]
//! - **Day Count Conventions**: accrual fractions for bond coupons
//! - **Status**: the error/warning accumulator carried by every model,
//!   bond and valuation
//! - **Authorization**: an optional process-wide feature gate
//!
//! ## Example
//!
//! ```rust
//! use oasis_core::prelude::*;
//!
//! let mut status = Status::new();
//! status.warn(StatusCode::VolatilityClamped, "volatility 150 clamped to 100");
//! assert!(status.is_ok());
//! assert_eq!(status.warnings().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod auth;
pub mod daycounts;
pub mod error;
pub mod status;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::auth::{authorize, install_authorizer, Authorizer, Feature};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::status::{Diagnostic, HasStatus, Status, StatusCode};
    pub use crate::types::{Date, Frequency};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use status::{Diagnostic, HasStatus, Status, StatusCode};
pub use types::{Date, Frequency};
