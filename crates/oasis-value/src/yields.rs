//! Street-convention yields on a bond's remaining flows.
//!
//! Yields compound at the bond's yield frequency over 30/360 years from the
//! valuation date. A bond with a single remaining flow inside one yield
//! period is priced at simple interest instead.

use oasis_bonds::CashFlowSchedule;
use oasis_bonds::FlowFlags;
use oasis_core::Frequency;
use oasis_math::solvers::{hybrid, SolverConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ValueError, ValueResult};

/// Lowest yield searched, percent.
pub const MIN_YIELD: f64 = -50.0;

/// Highest yield searched, percent.
pub const MAX_YIELD: f64 = 500.0;

/// The redemption a yield is computed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Workout {
    /// Final maturity, with scheduled sinks along the way.
    Maturity,
    /// First call date beyond the notice period.
    Call,
    /// First put date beyond the notice period.
    Put,
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workout::Maturity => write!(f, "maturity"),
            Workout::Call => write!(f, "call"),
            Workout::Put => write!(f, "put"),
        }
    }
}

/// Flows to a workout date as (years, cash) pairs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct YieldFlows {
    flows: Vec<(f64, f64)>,
    periods_per_year: f64,
}

impl YieldFlows {
    pub(crate) fn new(
        schedule: &CashFlowSchedule,
        workout: Workout,
        frequency: Frequency,
    ) -> ValueResult<Self> {
        let end = match workout {
            Workout::Maturity => schedule.len().checked_sub(1),
            Workout::Call => first_exercise(schedule, FlowFlags::CALL),
            Workout::Put => first_exercise(schedule, FlowFlags::PUT),
        };
        let end = end.ok_or(ValueError::NoWorkout {
            workout: match workout {
                Workout::Maturity => "maturity",
                Workout::Call => "call",
                Workout::Put => "put",
            },
        })?;

        let mut flows: Vec<(f64, f64)> = schedule.flows[..=end]
            .iter()
            .map(|f| (f.years, f.cash()))
            .collect();
        let last = &schedule.flows[end];
        let strike = match workout {
            Workout::Maturity => None,
            Workout::Call => last.call_price,
            Workout::Put => last.put_price,
        };
        if let (Some(price), Some(final_flow)) = (strike, flows.last_mut()) {
            final_flow.1 += (price + last.accrued) * last.outstanding_after() / 100.0;
        }

        Ok(Self {
            flows,
            periods_per_year: f64::from(frequency.yield_periods_per_year()),
        })
    }

    fn simple_interest_time(&self) -> Option<f64> {
        match self.flows.as_slice() {
            [(t, _)] if *t > 0.0 && *t <= 1.0 / self.periods_per_year => Some(*t),
            _ => None,
        }
    }

    /// Dirty price per 100 at `yield_pct`.
    pub(crate) fn dirty_price(&self, yield_pct: f64) -> f64 {
        let y = yield_pct / 100.0;
        if let Some(t) = self.simple_interest_time() {
            return self.flows[0].1 / (1.0 + y * t);
        }
        let n = self.periods_per_year;
        let base = 1.0 + y / n;
        self.flows
            .iter()
            .map(|(t, cash)| cash * base.powf(-n * t))
            .sum()
    }

    fn derivative(&self, yield_pct: f64) -> f64 {
        let y = yield_pct / 100.0;
        if let Some(t) = self.simple_interest_time() {
            let denom = 1.0 + y * t;
            return -self.flows[0].1 * t / (100.0 * denom * denom);
        }
        let n = self.periods_per_year;
        let base = 1.0 + y / n;
        self.flows
            .iter()
            .map(|(t, cash)| -cash * t * base.powf(-n * t - 1.0) / 100.0)
            .sum()
    }

    /// Yield in percent reproducing `dirty`.
    pub(crate) fn solve(&self, dirty: f64, guess: f64, config: &SolverConfig) -> ValueResult<f64> {
        if let Some(t) = self.simple_interest_time() {
            return Ok((self.flows[0].1 / dirty - 1.0) / t * 100.0);
        }
        let guess = guess.clamp(MIN_YIELD, MAX_YIELD);
        hybrid(
            |y| self.dirty_price(y) - dirty,
            |y| self.derivative(y),
            guess,
            (MIN_YIELD, MAX_YIELD),
            config,
        )
        .map(|r| r.root)
        .map_err(|e| ValueError::ComputeYield {
            price: dirty,
            reason: e.to_string(),
        })
    }
}

/// Index of the first flow carrying `flag` on or after the notice date.
fn first_exercise(schedule: &CashFlowSchedule, flag: FlowFlags) -> Option<usize> {
    schedule
        .iter()
        .position(|f| f.flags.contains(flag) && f.date >= schedule.notice_date)
}

/// Rejects yields the compounding cannot handle.
pub(crate) fn check_yield(yield_pct: f64) -> ValueResult<()> {
    if yield_pct.is_finite() && (MIN_YIELD..=MAX_YIELD).contains(&yield_pct) {
        Ok(())
    } else {
        Err(ValueError::InvalidYield { yield_pct })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use oasis_bonds::{Bond, SinkingFundStatus};
    use oasis_core::{Date, Status};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn schedule(bond: &Bond, pv: Date) -> CashFlowSchedule {
        bond.cash_flows(pv, &SinkingFundStatus::default(), &mut Status::new())
            .unwrap()
    }

    #[test]
    fn test_par_bond_yields_coupon() {
        let bond = Bond::new("b", date(2020, 1, 1), date(2030, 1, 1), 6.0);
        let flows = YieldFlows::new(
            &schedule(&bond, date(2020, 1, 1)),
            Workout::Maturity,
            bond.frequency(),
        )
        .unwrap();
        assert_relative_eq!(flows.dirty_price(6.0), 100.0, epsilon = 1e-9);

        let y = flows.solve(100.0, 3.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(y, 6.0, epsilon = 1e-8);
    }

    #[test]
    fn test_yield_to_call_uses_strike() {
        let mut bond = Bond::new("c", date(2020, 1, 1), date(2030, 1, 1), 6.0);
        bond.set_call(date(2025, 1, 1), 102.0);
        let s = schedule(&bond, date(2020, 1, 1));
        let to_call = YieldFlows::new(&s, Workout::Call, bond.frequency()).unwrap();
        // call date is a coupon date, so the strike is paid on top of the coupon
        assert_eq!(to_call.flows.len(), 10);
        assert_relative_eq!(to_call.flows[9].1, 3.0 + 102.0);

        assert_eq!(
            YieldFlows::new(&s, Workout::Put, bond.frequency()),
            Err(ValueError::NoWorkout { workout: "put" })
        );
    }

    #[test]
    fn test_short_bond_simple_interest() {
        let bond = Bond::new("s", date(2020, 1, 1), date(2025, 1, 1), 4.0);
        let flows = YieldFlows::new(
            &schedule(&bond, date(2024, 10, 1)),
            Workout::Maturity,
            bond.frequency(),
        )
        .unwrap();
        // one flow of 102 in a quarter year
        let dirty = flows.dirty_price(8.0);
        assert_relative_eq!(dirty, 102.0 / 1.02, epsilon = 1e-12);
        let y = flows.solve(dirty, 5.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(y, 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_check_yield() {
        assert!(check_yield(7.0).is_ok());
        assert!(check_yield(f64::NAN).is_err());
        assert!(check_yield(-80.0).is_err());
    }
}
