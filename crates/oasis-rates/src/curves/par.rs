//! Par rate curve.

use oasis_math::interpolation::{Extrapolation, Interpolator, LinearInterpolator};

use super::TermPoint;
use crate::error::{ModelError, ModelResult};

/// Par rates interpolated on a straight line between input terms and held
/// flat beyond them.
#[derive(Debug, Clone)]
pub struct ParCurve {
    shape: Shape,
}

#[derive(Debug, Clone)]
enum Shape {
    Flat(f64),
    Linear(LinearInterpolator),
}

impl ParCurve {
    /// Builds a par curve from points sorted by term.
    pub fn new(points: &[TermPoint]) -> ModelResult<Self> {
        let shape = match points {
            [] => return Err(ModelError::NoPoints),
            [single] => Shape::Flat(single.value),
            _ => {
                let terms = points.iter().map(|p| p.term).collect();
                let rates = points.iter().map(|p| p.value).collect();
                Shape::Linear(
                    LinearInterpolator::new(terms, rates)?
                        .with_extrapolation(Extrapolation::Flat),
                )
            }
        };
        Ok(Self { shape })
    }

    /// Par rate in percent at `term` years.
    pub fn rate(&self, term: f64) -> ModelResult<f64> {
        match &self.shape {
            Shape::Flat(rate) => Ok(*rate),
            Shape::Linear(interp) => Ok(interp.interpolate(term)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_single_point_is_flat() {
        let curve = ParCurve::new(&[TermPoint::new(10.0, 6.5)]).unwrap();
        assert_relative_eq!(curve.rate(0.5).unwrap(), 6.5);
        assert_relative_eq!(curve.rate(30.0).unwrap(), 6.5);
    }

    #[test]
    fn test_interpolation_and_flat_ends() {
        let curve = ParCurve::new(&[
            TermPoint::new(1.0, 5.0),
            TermPoint::new(10.0, 7.0),
            TermPoint::new(30.0, 8.0),
        ])
        .unwrap();
        assert_relative_eq!(curve.rate(0.25).unwrap(), 5.0);
        assert_relative_eq!(curve.rate(5.5).unwrap(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(curve.rate(20.0).unwrap(), 7.5, epsilon = 1e-12);
        assert_relative_eq!(curve.rate(40.0).unwrap(), 8.0);
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(ParCurve::new(&[]).unwrap_err(), ModelError::NoPoints);
    }

    proptest! {
        #[test]
        fn increasing_curve_stays_between_inputs(
            short in 0.0f64..10.0,
            step in 0.0f64..5.0,
            term in 1.0f64..30.0,
        ) {
            let long = short + step;
            let curve = ParCurve::new(&[TermPoint::new(1.0, short), TermPoint::new(30.0, long)])
                .unwrap();
            let rate = curve.rate(term).unwrap();
            prop_assert!(rate >= short - 1e-12 && rate <= long + 1e-12);
        }
    }
}
