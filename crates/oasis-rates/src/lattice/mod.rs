//! Recombining binomial short-rate lattice.
//!
//! Built once per solved [`InterestRateModel`](crate::InterestRateModel)
//! and shared read-only by every valuation against that model.

mod calibration;

pub use calibration::calibrate;

use crate::error::{ModelError, ModelResult};

/// Risk-neutral probability of each branch.
pub const BRANCH_PROBABILITY: f64 = 0.5;

/// Slack when mapping a time onto a step boundary.
const STEP_EPSILON: f64 = 1e-9;

/// A recombining binomial short-rate lattice.
///
/// Node `(i, j)` covers the period `[t_i, t_{i+1}]` and carries the
/// continuously compounded short rate
///
/// ```text
/// r(i, j) = a_i * exp(sigma * sqrt(dt) * (2j - i)),   j = 0..=i
/// ```
///
/// An up move from `(i, j)` leads to `(i + 1, j + 1)`, a down move to
/// `(i + 1, j)`, each with probability 1/2.
///
/// ```text
///                    [0,0]
///                   /     \
///              [1,1]       [1,0]
///             /    \      /    \
///         [2,2]   [2,1]  [2,1]  [2,0]
/// ```
#[derive(Debug, Clone)]
pub struct RateLattice {
    dt: f64,
    volatility: f64,
    drift: Vec<f64>,
    rates: Vec<Vec<f64>>,
}

impl RateLattice {
    /// Builds the node rates from the per-step drift `a_i`.
    ///
    /// `volatility` is a decimal (0.15 for 15%).
    #[must_use]
    pub fn from_drift(dt: f64, volatility: f64, drift: Vec<f64>) -> Self {
        let spacing = volatility * dt.sqrt();
        let rates = drift
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                (0..=i)
                    .map(|j| a * (spacing * (2.0 * j as f64 - i as f64)).exp())
                    .collect()
            })
            .collect();
        Self {
            dt,
            volatility,
            drift,
            rates,
        }
    }

    /// Number of rate steps; values live on steps `0..=steps()`.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.rates.len()
    }

    /// Step length in years.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Short-rate volatility as a decimal.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Time of the last step in years.
    #[must_use]
    pub fn horizon(&self) -> f64 {
        self.steps() as f64 * self.dt
    }

    /// Time in years at `step`.
    #[must_use]
    pub fn time_at_step(&self, step: usize) -> f64 {
        step as f64 * self.dt
    }

    /// Number of states at `step`; always `step + 1`.
    #[must_use]
    pub fn states_at(&self, step: usize) -> usize {
        step + 1
    }

    /// Calibrated central level `a_i` of `step`.
    #[must_use]
    pub fn drift(&self, step: usize) -> f64 {
        self.drift[step]
    }

    /// Short rate (decimal, continuous) at node `(step, state)`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= steps()` or `state > step`.
    #[must_use]
    pub fn rate_at(&self, step: usize, state: usize) -> f64 {
        self.rates[step][state]
    }

    /// Discount factor over `tau` years at node `(step, state)` with
    /// `spread` (decimal) added to the short rate.
    #[must_use]
    pub fn discount_factor(&self, step: usize, state: usize, spread: f64, tau: f64) -> f64 {
        (-(self.rates[step][state] + spread) * tau).exp()
    }

    /// Step whose period contains `t`, or the last step when `t` falls on
    /// the horizon.
    pub fn step_at(&self, t: f64) -> ModelResult<usize> {
        if t < 0.0 || t > self.horizon() + STEP_EPSILON {
            return Err(ModelError::BeyondHorizon {
                time: t,
                horizon: self.horizon(),
            });
        }
        let step = (t / self.dt + STEP_EPSILON).floor() as usize;
        Ok(step.min(self.steps()))
    }

    /// Rolls values at `step + 1` back to `step`.
    ///
    /// `next` holds `step + 2` values; the result holds `step + 1`.
    #[must_use]
    pub fn rollback(&self, next: &[f64], step: usize, spread: f64) -> Vec<f64> {
        (0..=step)
            .map(|j| {
                let expected =
                    BRANCH_PROBABILITY * next[j + 1] + (1.0 - BRANCH_PROBABILITY) * next[j];
                self.discount_factor(step, j, spread, self.dt) * expected
            })
            .collect()
    }

    /// Price at time 0 of a unit paid at `step` in every state.
    #[must_use]
    pub fn zero_price(&self, step: usize, spread: f64) -> f64 {
        let mut values = vec![1.0; step + 1];
        for i in (0..step).rev() {
            values = self.rollback(&values, i, spread);
        }
        values[0]
    }

    /// Discounts `value` received at `from_time` years back to time 0.
    ///
    /// A time inside a step is discounted to the start of that step at
    /// each node's own rate.
    pub fn discount(&self, value: f64, from_time: f64, spread: f64) -> ModelResult<f64> {
        let step = self.step_at(from_time)?;
        let tau = (from_time - self.time_at_step(step)).max(0.0);
        let mut values: Vec<f64> = if step < self.steps() && tau > 0.0 {
            (0..=step)
                .map(|j| value * self.discount_factor(step, j, spread, tau))
                .collect()
        } else {
            vec![value; step + 1]
        };
        for i in (0..step).rev() {
            values = self.rollback(&values, i, spread);
        }
        Ok(values[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_lattice(rate: f64, steps: usize, dt: f64, volatility: f64) -> RateLattice {
        RateLattice::from_drift(dt, volatility, vec![rate; steps])
    }

    #[test]
    fn test_lattice_shape() {
        let lattice = flat_lattice(0.05, 10, 0.5, 0.0);
        assert_eq!(lattice.steps(), 10);
        assert_eq!(lattice.states_at(0), 1);
        assert_eq!(lattice.states_at(5), 6);
        assert_relative_eq!(lattice.horizon(), 5.0);
        assert_relative_eq!(lattice.time_at_step(4), 2.0);
    }

    #[test]
    fn test_node_rates_are_lognormal() {
        let lattice = flat_lattice(0.05, 3, 0.25, 0.20);
        let ratio = (2.0 * 0.20 * 0.25_f64.sqrt()).exp();
        assert_relative_eq!(lattice.rate_at(0, 0), 0.05);
        assert_relative_eq!(
            lattice.rate_at(2, 2) / lattice.rate_at(2, 1),
            ratio,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            lattice.rate_at(2, 0) * lattice.rate_at(2, 2),
            0.05 * 0.05,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_price_deterministic() {
        let lattice = flat_lattice(0.05, 4, 1.0, 0.0);
        assert_relative_eq!(lattice.zero_price(1, 0.0), (-0.05_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(lattice.zero_price(4, 0.0), (-0.20_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(lattice.zero_price(4, 0.01), (-0.24_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(lattice.zero_price(0, 0.0), 1.0);
    }

    #[test]
    fn test_discount_inside_step() {
        let lattice = flat_lattice(0.04, 12, 0.25, 0.0);
        let pv = lattice.discount(100.0, 1.1, 0.0).unwrap();
        assert_relative_eq!(pv, 100.0 * (-0.044_f64).exp(), epsilon = 1e-10);

        let at_horizon = lattice.discount(100.0, 3.0, 0.0).unwrap();
        assert_relative_eq!(at_horizon, 100.0 * (-0.12_f64).exp(), epsilon = 1e-10);

        assert!(lattice.discount(100.0, 3.5, 0.0).is_err());
    }

    #[test]
    fn test_step_at_boundaries() {
        let lattice = flat_lattice(0.04, 24, 1.0 / 12.0, 0.0);
        assert_eq!(lattice.step_at(0.0).unwrap(), 0);
        assert_eq!(lattice.step_at(0.5).unwrap(), 6);
        assert_eq!(lattice.step_at(0.49).unwrap(), 5);
        assert_eq!(lattice.step_at(2.0).unwrap(), 24);
        assert!(lattice.step_at(-0.1).is_err());
    }
}
