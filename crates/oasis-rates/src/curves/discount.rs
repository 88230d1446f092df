//! Discount factor curve.

use oasis_math::interpolation::{Extrapolation, Interpolator, LogLinearInterpolator};

use super::{ParCurve, TermPoint};
use crate::compounding::{factor_to_zero, Compounding};
use crate::error::{ModelError, ModelResult};

/// Spacing of the bootstrap grid and of par coupons, in years.
pub(crate) const COUPON_SPACING: f64 = 0.5;

/// A discount factor curve.
///
/// Pillars are interpolated log-linearly (piecewise constant forwards).
/// Beyond the last pillar the last forward rate is carried.
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    times: Vec<f64>,
    factors: Vec<f64>,
    interp: LogLinearInterpolator,
}

impl DiscountCurve {
    /// Creates a curve from pillar times and factors.
    ///
    /// A factor of 1 at time 0 is added when absent. Factors must be
    /// positive and non-increasing (no negative forward rates).
    pub fn new(times: Vec<f64>, factors: Vec<f64>) -> ModelResult<Self> {
        if times.is_empty() {
            return Err(ModelError::NoPoints);
        }
        let (mut times, mut factors) = (times, factors);
        if times[0] > 0.0 {
            times.insert(0, 0.0);
            factors.insert(0, 1.0);
        }

        for (i, (&t, &df)) in times.iter().zip(factors.iter()).enumerate() {
            if df <= 0.0 {
                return Err(ModelError::invalid_point("factor", t, df));
            }
            if i > 0 && df > factors[i - 1] {
                return Err(ModelError::NegativeForward {
                    from: times[i - 1],
                    to: t,
                });
            }
        }

        let interp = LogLinearInterpolator::new(times.clone(), factors.clone())?
            .with_extrapolation(Extrapolation::Linear);
        Ok(Self {
            times,
            factors,
            interp,
        })
    }

    /// Creates a curve from factor points sorted by term.
    pub fn from_points(points: &[TermPoint]) -> ModelResult<Self> {
        Self::new(
            points.iter().map(|p| p.term).collect(),
            points.iter().map(|p| p.value).collect(),
        )
    }

    /// Bootstraps a par curve on a semi-annual grid out to `horizon` years.
    ///
    /// ```text
    /// P_k = (1 - c_k/2 * sum_{m<k} P_m) / (1 + c_k/2)
    /// ```
    pub fn bootstrap(par: &ParCurve, horizon: f64) -> ModelResult<Self> {
        let n = ((horizon / COUPON_SPACING).ceil() as usize).max(1);
        let mut times = Vec::with_capacity(n + 1);
        let mut factors = Vec::with_capacity(n + 1);
        times.push(0.0);
        factors.push(1.0);

        let mut annuity = 0.0;
        for k in 1..=n {
            let t = k as f64 * COUPON_SPACING;
            let half_coupon = par.rate(t)? / 100.0 * COUPON_SPACING;
            let df = (1.0 - half_coupon * annuity) / (1.0 + half_coupon);
            if df <= 0.0 || df > factors[k - 1] {
                return Err(ModelError::NegativeForward {
                    from: t - COUPON_SPACING,
                    to: t,
                });
            }
            annuity += df;
            times.push(t);
            factors.push(df);
        }

        log::debug!("bootstrapped {n} semi-annual factors to {horizon} years");
        Self::new(times, factors)
    }

    /// Discount factor at `t` years; 1 for `t <= 0`.
    pub fn factor(&self, t: f64) -> ModelResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok(self.interp.interpolate(t)?)
    }

    /// Semi-annual zero rate in percent at `t` years.
    pub fn zero_rate(&self, t: f64) -> ModelResult<f64> {
        if t <= 0.0 {
            return Err(ModelError::InvalidTerm { term: t });
        }
        let df = self.factor(t)?;
        factor_to_zero(df, t).ok_or_else(|| ModelError::invalid_point("factor", t, df))
    }

    /// Continuously compounded forward rate (decimal) between `t1` and `t2`.
    pub fn forward_rate(&self, t1: f64, t2: f64) -> ModelResult<f64> {
        if t2 <= t1 {
            return Err(ModelError::InvalidTerm { term: t2 - t1 });
        }
        let ratio = self.factor(t2)? / self.factor(t1)?;
        Ok(Compounding::Continuous.zero_rate(ratio, t2 - t1))
    }

    /// Semi-annual par rate in percent at `t` years.
    pub fn par_rate(&self, t: f64) -> ModelResult<f64> {
        self.forward_par_rate(0.0, t)
    }

    /// Semi-annual par rate in percent for a bond starting at `start`
    /// and maturing `tenor` years later.
    ///
    /// Coupons fall every half year back from maturity; a short first
    /// period accrues only its own length.
    pub fn forward_par_rate(&self, start: f64, tenor: f64) -> ModelResult<f64> {
        if tenor <= 0.0 {
            return Err(ModelError::InvalidTerm { term: tenor });
        }
        let base = self.factor(start)?;
        let mut annuity = 0.0;
        let mut coupon_time = tenor;
        while coupon_time > 1e-9 {
            let accrual = coupon_time.min(COUPON_SPACING);
            annuity += accrual * self.factor(start + coupon_time)? / base;
            coupon_time -= COUPON_SPACING;
        }
        Ok(100.0 * (1.0 - self.factor(start + tenor)? / base) / annuity)
    }

    /// Last pillar time in years.
    #[must_use]
    pub fn max_term(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Pillar times and factors, starting at (0, 1).
    pub fn pillars(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.factors.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_par(rate: f64) -> ParCurve {
        ParCurve::new(&[TermPoint::new(10.0, rate)]).unwrap()
    }

    #[test]
    fn test_flat_par_bootstrap() {
        let curve = DiscountCurve::bootstrap(&flat_par(7.0), 30.0).unwrap();
        // a flat par curve is also a flat semi-annual zero curve
        for k in 1..=60 {
            let t = f64::from(k) * 0.5;
            assert_relative_eq!(
                curve.factor(t).unwrap(),
                1.035_f64.powi(-k),
                epsilon = 1e-12
            );
        }
        assert_relative_eq!(curve.par_rate(10.0).unwrap(), 7.0, epsilon = 1e-9);
        assert_relative_eq!(curve.zero_rate(7.5).unwrap(), 7.0, epsilon = 1e-9);
        assert_relative_eq!(curve.max_term(), 30.0);
        assert_relative_eq!(curve.forward_par_rate(5.0, 10.0).unwrap(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_upward_par_curve_reprices() {
        let par = ParCurve::new(&[
            TermPoint::new(1.0, 4.0),
            TermPoint::new(5.0, 5.0),
            TermPoint::new(30.0, 6.5),
        ])
        .unwrap();
        let curve = DiscountCurve::bootstrap(&par, 30.0).unwrap();
        for t in [1.0, 2.5, 5.0, 12.0, 30.0] {
            assert_relative_eq!(
                curve.par_rate(t).unwrap(),
                par.rate(t).unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_log_linear_between_pillars() {
        let curve = DiscountCurve::new(vec![1.0, 2.0], vec![0.95, 0.90]).unwrap();
        let expected = (0.95_f64 * 0.90).sqrt();
        assert_relative_eq!(curve.factor(1.5).unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(curve.factor(0.0).unwrap(), 1.0);

        // forward carried past the last pillar
        let fwd = curve.forward_rate(1.0, 2.0).unwrap();
        assert_relative_eq!(curve.forward_rate(2.0, 3.0).unwrap(), fwd, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_negative_forward() {
        let err = DiscountCurve::new(vec![1.0, 2.0], vec![0.95, 0.97]).unwrap_err();
        assert_eq!(err, ModelError::NegativeForward { from: 1.0, to: 2.0 });
        assert!(DiscountCurve::new(vec![1.0], vec![0.0]).is_err());
    }
}
