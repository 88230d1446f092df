//! # Oasis Math
//!
//! Numerical building blocks for the Oasis valuation engine:
//!
//! - **Solvers**: Brent, bisection and a Newton/Brent hybrid
//! - **Interpolation**: linear and log-linear with configurable extrapolation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        Extrapolation, Interpolator, LinearInterpolator, LogLinearInterpolator,
    };
    pub use crate::solvers::{bisection, brent, hybrid, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
