//! Curve inputs and solved curves.
//!
//! - [`ParCurve`]: straight-line interpolated par rates, flat outside the
//!   input range
//! - [`DiscountCurve`]: discount factors, log-linear between pillars
//!
//! A par curve is turned into a [`DiscountCurve`] by bootstrapping on a
//! semi-annual grid (see [`DiscountCurve::bootstrap`]).

mod discount;
mod par;

pub use discount::DiscountCurve;
pub use par::ParCurve;

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the model's curve points are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveInput {
    /// Semi-annual bond-equivalent par rates in percent.
    #[default]
    Par,
    /// Discount factors (also set through zero rates).
    Factor,
}

impl fmt::Display for CurveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveInput::Par => write!(f, "par"),
            CurveInput::Factor => write!(f, "factor"),
        }
    }
}

/// A (term, value) pair on the input curve.
///
/// `value` is a par rate in percent or a discount factor depending on the
/// model's [`CurveInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermPoint {
    /// Term in years, positive.
    pub term: f64,
    /// Par rate (percent) or discount factor.
    pub value: f64,
}

impl TermPoint {
    /// Creates a term point.
    #[must_use]
    pub fn new(term: f64, value: f64) -> Self {
        Self { term, value }
    }
}
