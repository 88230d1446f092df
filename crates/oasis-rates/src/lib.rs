//! # Oasis Rates
//!
//! Term structure model for the Oasis valuation engine.
//!
//! This crate provides:
//!
//! - **Model**: [`InterestRateModel`], built from sparse par rates or
//!   discount factors plus a short-rate volatility
//! - **Curves**: par interpolation and the bootstrapped [`DiscountCurve`]
//! - **Lattice**: a Black-Derman-Toy [`RateLattice`] calibrated to the
//!   curve by forward induction
//!
//! ## Quick Start
//!
//! ```rust
//! use oasis_rates::prelude::*;
//!
//! let mut model = InterestRateModel::new(CurveInput::Par);
//! model.set_rate(2.0, 4.5);
//! model.set_rate(10.0, 5.5);
//! model.set_rate(30.0, 6.0);
//! model.set_volatility(15.0);
//! model.solve().unwrap();
//!
//! // price of 100 paid in 7 years, 50bp over the lattice rates
//! let pv = model.discount(100.0, 7.0, 50.0).unwrap();
//! assert!(pv < 100.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod compounding;
pub mod config;
pub mod curves;
pub mod error;
pub mod lattice;
pub mod term_structure;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compounding::Compounding;
    pub use crate::config::LatticeConfig;
    pub use crate::curves::{CurveInput, DiscountCurve, ParCurve, TermPoint};
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::lattice::RateLattice;
    pub use crate::term_structure::{InterestRateModel, SolvedModel};
}

pub use compounding::Compounding;
pub use config::LatticeConfig;
pub use curves::{CurveInput, DiscountCurve, TermPoint};
pub use error::{ModelError, ModelResult};
pub use lattice::RateLattice;
pub use term_structure::InterestRateModel;
