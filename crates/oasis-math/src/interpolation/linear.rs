//! Linear interpolation.

use super::{find_segment, validate, Extrapolation, Interpolator};
use crate::error::{MathError, MathResult};

/// Linear interpolation between data points.
///
/// ```rust
/// use oasis_math::interpolation::{Extrapolation, Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 10.0], vec![5.0, 7.0])
///     .unwrap()
///     .with_extrapolation(Extrapolation::Flat);
/// assert_eq!(interp.interpolate(30.0).unwrap(), 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// `xs` must be strictly increasing and hold at least 2 points.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate(&xs, &ys)?;
        Ok(Self {
            xs,
            ys,
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

impl Interpolator for LinearInterpolator {
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
                    return Ok(if x < self.xs[0] {
                        self.ys[0]
                    } else {
                        self.ys[n - 1]
                    })
                }
                Extrapolation::Linear => {}
            }
        }

        let i = find_segment(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        Ok(y0 + t * (y1 - y0))
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
    fn test_linear_interpolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 4.0]).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_rules() {
        let base = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();
        assert!(base.interpolate(-0.5).is_err());
        assert!(base.interpolate(2.5).is_err());

        let flat = base.clone().with_extrapolation(Extrapolation::Flat);
        assert_relative_eq!(flat.interpolate(-1.0).unwrap(), 0.0);
        assert_relative_eq!(flat.interpolate(3.0).unwrap(), 2.0);

        let linear = base.with_extrapolation(Extrapolation::Linear);
        assert_relative_eq!(linear.interpolate(-1.0).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(linear.interpolate(3.0).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_data() {
        assert!(LinearInterpolator::new(vec![0.0], vec![1.0]).is_err());
        assert!(LinearInterpolator::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(LinearInterpolator::new(vec![1.0, 1.0], vec![1.0, 2.0]).is_err());
    }
}
