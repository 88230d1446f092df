//! # Oasis Value
//!
//! Lattice valuation of bonds with embedded options.
//!
//! A [`Value`] binds one [`Bond`](oasis_bonds::Bond) to one solved
//! [`InterestRateModel`](oasis_rates::InterestRateModel) as of a date and
//! answers:
//!
//! - **Price / OAS**: backward induction through the rate lattice with a
//!   constant spread, and Brent root-finding for the spread that matches a
//!   price
//! - **Option value**: price with optimal exercise less the straight price
//! - **Effective duration and convexity**: full revaluation on curves
//!   shifted in parallel
//! - **Accrued interest, flows and yields** to maturity, call and put
//!
//! Inputs and outputs are expressed through [`Quote`]. Failures are
//! reported in the valuation's [`Status`](oasis_core::Status); the sentinel
//! methods return [`BAD_VALUE`].
//!
//! ## Quick Start
//!
//! ```rust
//! use oasis_bonds::Bond;
//! use oasis_core::{Date, HasStatus};
//! use oasis_rates::{CurveInput, InterestRateModel};
//! use oasis_value::prelude::*;
//!
//! let mut model = InterestRateModel::new(CurveInput::Par);
//! model.set_rate(1.0, 7.0);
//! model.set_rate(30.0, 7.0);
//! model.solve().unwrap();
//!
//! let issue = Date::from_ymd(2013, 7, 1).unwrap();
//! let bond = Bond::new("bullet", issue, Date::from_ymd(2043, 7, 1).unwrap(), 7.0);
//!
//! let mut value = Value::new(&bond, &model, issue);
//! let price = value.price(0.0);
//! assert!((price - 100.0).abs() < 0.01);
//!
//! let risk = value.effective_duration(0.0);
//! assert!(risk.duration > 0.0);
//! assert!(value.status().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod batch;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod quote;
pub mod value;
pub mod yields;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{value_all, ValuationRequest, ValuationResult};
    pub use crate::config::{EngineConfig, OasSolverConfig, RootMethod};
    pub use crate::duration::Duration;
    pub use crate::error::{ValueError, ValueResult};
    pub use crate::quote::{Quote, QuoteKind};
    pub use crate::value::{Value, BAD_VALUE};
    pub use crate::yields::Workout;
}

pub use batch::{value_all, ValuationRequest, ValuationResult};
pub use config::{EngineConfig, RootMethod};
pub use duration::Duration;
pub use error::{ValueError, ValueResult};
pub use quote::{Quote, QuoteKind};
pub use value::{Value, BAD_VALUE};
pub use yields::Workout;
