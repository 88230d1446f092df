//! Log-linear interpolation.
//!
//! Interpolates `ln(y)` linearly, which keeps discount factors positive and
//! gives piecewise constant forward rates.

use super::{find_segment, validate, Extrapolation, Interpolator};
use crate::error::{MathError, MathResult};

/// Log-linear interpolation between positive data points.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// [`Extrapolation::Linear`] extends the end segments in log space, i.e.
/// carries the end forward rates.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// `xs` must be strictly increasing and every y strictly positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate(&xs, &ys)?;
        let mut log_ys = Vec::with_capacity(ys.len());
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 {
                return Err(MathError::bad_input(format!(
                    "value {y} at knot {i} must be positive for log-linear"
                )));
            }
            log_ys.push(y.ln());
        }
        Ok(Self {
            xs,
            log_ys,
            extrapolation: Extrapolation::None,
        })
    }

    /// Sets the extrapolation rule.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let n = self.xs.len();
        if !self.in_range(x) {
            match self.extrapolation {
                Extrapolation::None => {
                    return Err(MathError::OutsideKnots {
                        x,
                        min: self.xs[0],
                        max: self.xs[n - 1],
                    })
                }
                Extrapolation::Flat => {
                    let log_y = if x < self.xs[0] {
                        self.log_ys[0]
                    } else {
                        self.log_ys[n - 1]
                    };
                    return Ok(log_y.exp());
                }
                Extrapolation::Linear => {}
            }
        }

        let i = find_segment(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (l0, l1) = (self.log_ys[i], self.log_ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        Ok((l0 + t * (l1 - l0)).exp())
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_forward_between_points() {
        // 5% continuously compounded at both ends
        let xs = vec![0.0, 2.0];
        let ys = vec![1.0, (-0.10f64).exp()];
        let interp = LogLinearInterpolator::new(xs, ys).unwrap();
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), (-0.05f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_linear_extrapolation_carries_forward() {
        let interp = LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, (-0.04f64).exp()])
            .unwrap()
            .with_extrapolation(Extrapolation::Linear);
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), (-0.12f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, -0.5]).is_err());
    }
}
