//! Interpolation of term structures.
//!
//! - [`LinearInterpolator`]: straight-line, used for par rates
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, used for discount
//!   factors (piecewise constant forwards)
//!
//! Outside the data range an [`Extrapolation`] rule applies.

mod linear;
mod log_linear;

pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Behaviour outside the data range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extrapolation {
    /// Queries outside the range fail.
    #[default]
    None,
    /// Hold the end values constant.
    Flat,
    /// Extend the end segments.
    Linear,
}

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Validates abscissae shared by all interpolators.
fn validate(xs: &[f64], ys: &[f64]) -> MathResult<()> {
    if xs.len() < 2 {
        return Err(MathError::TooFewKnots {
            required: 2,
            actual: xs.len(),
        });
    }
    if xs.len() != ys.len() {
        return Err(MathError::bad_input(format!(
            "{} knots but {} values",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::bad_input(
            "knots must strictly increase",
        ));
    }
    Ok(())
}

/// Index i such that xs[i] <= x < xs[i+1], clamped to a valid segment.
fn find_segment(xs: &[f64], x: f64) -> usize {
    let i = xs.partition_point(|&knot| knot <= x);
    i.saturating_sub(1).min(xs.len() - 2)
}
