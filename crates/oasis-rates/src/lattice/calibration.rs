//! Black-Derman-Toy calibration by forward induction.

use oasis_math::solvers::{brent, SolverConfig};

use super::{RateLattice, BRANCH_PROBABILITY};
use crate::curves::DiscountCurve;
use crate::error::{ModelError, ModelResult};

/// Upper bound on a step's central rate (500% continuous).
const MAX_DRIFT: f64 = 5.0;

/// Pricing residual treated as an exactly zero forward rate.
const ZERO_FORWARD_TOLERANCE: f64 = 1e-14;

/// Fits a lognormal lattice to `curve`.
///
/// Arrow-Debreu state prices `Q(i, j)` are carried forward step by step.
/// At each step the central level `a_i` is found with Brent so that
///
/// ```text
/// sum_j Q(i, j) * exp(-r(i, j) * dt) = P(t_{i+1})
/// ```
///
/// `volatility` is in percent. With zero volatility every state shares the
/// curve's forward rate.
pub fn calibrate(
    curve: &DiscountCurve,
    volatility: f64,
    steps: usize,
    dt: f64,
) -> ModelResult<RateLattice> {
    let sigma = volatility / 100.0;
    let spacing = sigma * dt.sqrt();
    let config = SolverConfig::new(1e-15, 200);

    let mut drift = Vec::with_capacity(steps);
    let mut state_prices = vec![1.0];

    for i in 0..steps {
        let target = curve.factor((i + 1) as f64 * dt)?;
        let shape: Vec<f64> = (0..=i)
            .map(|j| (spacing * (2.0 * j as f64 - i as f64)).exp())
            .collect();

        let residual = |a: f64| -> f64 {
            state_prices
                .iter()
                .zip(shape.iter())
                .map(|(q, s)| q * (-a * s * dt).exp())
                .sum::<f64>()
                - target
        };
        // flat stretch of the curve: zero forward
        let a = if residual(0.0).abs() <= ZERO_FORWARD_TOLERANCE {
            0.0
        } else {
            brent(&residual, 0.0, MAX_DRIFT, &config)
                .map_err(|source| ModelError::Calibration { step: i, source })?
                .root
        };

        let mut next = vec![0.0; i + 2];
        for (j, (q, s)) in state_prices.iter().zip(shape.iter()).enumerate() {
            let carried = q * (-a * s * dt).exp();
            next[j] += (1.0 - BRANCH_PROBABILITY) * carried;
            next[j + 1] += BRANCH_PROBABILITY * carried;
        }
        state_prices = next;
        drift.push(a);
    }

    log::debug!(
        "calibrated {steps} lattice steps (dt = {dt:.4}, volatility = {volatility}%)"
    );
    Ok(RateLattice::from_drift(dt, sigma, drift))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{ParCurve, TermPoint};
    use approx::assert_relative_eq;

    fn flat_curve(rate: f64) -> DiscountCurve {
        let par = ParCurve::new(&[TermPoint::new(5.0, rate)]).unwrap();
        DiscountCurve::bootstrap(&par, 10.0).unwrap()
    }

    #[test]
    fn test_zero_volatility_reproduces_curve() {
        let curve = flat_curve(7.0);
        let lattice = calibrate(&curve, 0.0, 120, 1.0 / 12.0).unwrap();
        for step in [1, 6, 13, 60, 120] {
            let t = step as f64 / 12.0;
            assert_relative_eq!(
                lattice.zero_price(step, 0.0),
                curve.factor(t).unwrap(),
                epsilon = 1e-12
            );
        }
        // deterministic: every state carries the forward rate
        assert_relative_eq!(lattice.rate_at(30, 0), lattice.rate_at(30, 30), epsilon = 1e-14);
        let forward = curve.forward_rate(2.5, 2.5 + 1.0 / 12.0).unwrap();
        assert_relative_eq!(lattice.rate_at(30, 7), forward, epsilon = 1e-10);
    }

    #[test]
    fn test_volatile_lattice_reproduces_curve() {
        let par = ParCurve::new(&[TermPoint::new(1.0, 4.0), TermPoint::new(10.0, 6.0)]).unwrap();
        let curve = DiscountCurve::bootstrap(&par, 10.0).unwrap();
        let lattice = calibrate(&curve, 15.0, 120, 1.0 / 12.0).unwrap();
        for step in [1, 24, 77, 120] {
            let t = step as f64 / 12.0;
            assert_relative_eq!(
                lattice.zero_price(step, 0.0),
                curve.factor(t).unwrap(),
                epsilon = 1e-11
            );
        }
        assert!(lattice.rate_at(60, 60) > lattice.rate_at(60, 0));
    }

    #[test]
    fn test_zero_forward_is_allowed() {
        let curve = DiscountCurve::new(vec![1.0, 2.0], vec![0.95, 0.95]).unwrap();
        let lattice = calibrate(&curve, 10.0, 24, 1.0 / 12.0).unwrap();
        assert_relative_eq!(lattice.drift(18), 0.0, epsilon = 1e-12);
    }
}
