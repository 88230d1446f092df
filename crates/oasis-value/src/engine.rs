//! Backward induction of a bond's flows through a rate lattice.
//!
//! Times are 30/360 years from the valuation date, which is lattice time
//! zero. A flow between two steps is attached to the earlier step and
//! discounted over the remainder at that node's rate; the branching to the
//! next step happens at the step boundary.
//!
//! Values are dirty, per 100 par outstanding at the valuation date. At a
//! flow date the issuer's call caps the value of the remaining flows,
//! then the holder's put floors it, and finally the flow's cash is added.
//! American options are also tested at every step strictly between flows.

use oasis_bonds::{CashFlowSchedule, Flow};
use oasis_core::daycounts::{DayCount, DayCountConvention};
use oasis_core::Date;
use oasis_rates::lattice::BRANCH_PROBABILITY;
use oasis_rates::{ModelResult, RateLattice};

/// Slack when comparing times.
const TIME_EPSILON: f64 = 1e-9;

/// Exercise values at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Exercise {
    call: Option<f64>,
    put: Option<f64>,
}

impl Exercise {
    fn apply(&self, values: &mut [f64]) {
        if let Some(call) = self.call {
            for v in values.iter_mut() {
                *v = v.min(call);
            }
        }
        if let Some(put) = self.put {
            for v in values.iter_mut() {
                *v = v.max(put);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.call.is_none() && self.put.is_none()
    }
}

/// American exercise terms between the previous event and an event.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    call_price: Option<f64>,
    put_price: Option<f64>,
    outstanding: f64,
    coupon: f64,
    period_start: f64,
    period_end: f64,
}

impl Window {
    fn exercise_at(&self, t: f64) -> Exercise {
        let length = self.period_end - self.period_start;
        let accrued = if length > 0.0 {
            self.coupon * ((t - self.period_start) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let value = |price: f64| (price + accrued) * self.outstanding / 100.0;
        Exercise {
            call: self.call_price.map(value),
            put: self.put_price.map(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Event {
    time: f64,
    cash: f64,
    exercise: Exercise,
    window: Window,
}

/// A bond's flows prepared for lattice valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardInduction {
    events: Vec<Event>,
    notice_time: f64,
}

impl BackwardInduction {
    /// Prepares the flows of `schedule`.
    #[must_use]
    pub fn new(schedule: &CashFlowSchedule) -> Self {
        let pv_date = schedule.pv_date;
        let years = |d: Date| DayCountConvention::Thirty360.year_fraction(pv_date, d);
        let notice_time = years(schedule.notice_date);

        let events = schedule
            .iter()
            .map(|flow| {
                let time = flow.years;
                Event {
                    time,
                    cash: flow.cash(),
                    exercise: if time + TIME_EPSILON >= notice_time {
                        exercise_on(flow)
                    } else {
                        Exercise::default()
                    },
                    window: Window {
                        call_price: flow.window_call_price,
                        put_price: flow.window_put_price,
                        outstanding: flow.outstanding,
                        coupon: flow.period_coupon,
                        period_start: years(flow.period_start),
                        period_end: years(flow.period_end),
                    },
                }
            })
            .collect();

        Self {
            events,
            notice_time,
        }
    }

    /// Time of the last flow in years.
    #[must_use]
    pub fn final_time(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.time)
    }

    /// True if any exercise is possible.
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.events.iter().any(|e| {
            !e.exercise.is_empty() || e.window.call_price.is_some() || e.window.put_price.is_some()
        })
    }

    /// Dirty value at time zero with `oas_bp` added to every short rate.
    ///
    /// With `exercise` false the options are ignored and the straight
    /// bond is valued.
    pub fn dirty_price(&self, lattice: &RateLattice, oas_bp: f64, exercise: bool) -> ModelResult<f64> {
        let Some(last) = self.events.last() else {
            return Ok(0.0);
        };
        let spread = oas_bp / 10_000.0;
        let max_step = lattice.steps().saturating_sub(1);
        let step_of = |t: f64| -> ModelResult<usize> { Ok(lattice.step_at(t)?.min(max_step)) };
        let last_step = step_of(last.time)?;

        let carry = |values: &mut [f64], step: usize, tau: f64| {
            if tau > 0.0 {
                for (j, v) in values.iter_mut().enumerate() {
                    *v *= lattice.discount_factor(step, j, spread, tau);
                }
            }
        };

        let mut next: Vec<f64> = Vec::new();
        let mut pending = self.events.len();
        for step in (0..=last_step).rev() {
            let mut values: Vec<f64> = if next.is_empty() {
                vec![0.0; step + 1]
            } else {
                (0..=step)
                    .map(|j| {
                        BRANCH_PROBABILITY * next[j + 1] + (1.0 - BRANCH_PROBABILITY) * next[j]
                    })
                    .collect()
            };

            let mut cursor = lattice.time_at_step(step + 1);
            while pending > 0 && step_of(self.events[pending - 1].time)? >= step {
                let event = &self.events[pending - 1];
                carry(&mut values, step, cursor - event.time);
                cursor = event.time;
                if exercise {
                    event.exercise.apply(&mut values);
                }
                for v in &mut values {
                    *v += event.cash;
                }
                pending -= 1;
            }

            let t = lattice.time_at_step(step);
            carry(&mut values, step, cursor - t);

            if exercise && t + TIME_EPSILON >= self.notice_time {
                let upcoming = &self.events[pending];
                if upcoming.time - t > TIME_EPSILON {
                    upcoming.window.exercise_at(t).apply(&mut values);
                }
            }
            next = values;
        }

        Ok(next[0])
    }
}

fn exercise_on(flow: &Flow) -> Exercise {
    let outstanding = flow.outstanding_after();
    if outstanding <= 0.0 {
        return Exercise::default();
    }
    let value = |price: f64| (price + flow.accrued) * outstanding / 100.0;
    Exercise {
        call: flow.call_price.map(value),
        put: flow.put_price.map(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use oasis_bonds::{Bond, SinkingFundStatus};
    use oasis_core::Status;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat_lattice(rate: f64, volatility: f64) -> RateLattice {
        let steps = 12 * 40;
        RateLattice::from_drift(1.0 / 12.0, volatility, vec![rate; steps])
    }

    fn schedule(bond: &Bond, pv: Date) -> CashFlowSchedule {
        let mut status = Status::new();
        bond.cash_flows(pv, &SinkingFundStatus::default(), &mut status)
            .unwrap()
    }

    #[test]
    fn test_zero_volatility_matches_discounting() {
        let bond = Bond::new("b", date(2020, 1, 1), date(2025, 1, 1), 6.0);
        let walk = BackwardInduction::new(&schedule(&bond, date(2020, 1, 1)));
        let r: f64 = 0.05;
        let lattice = flat_lattice(r, 0.0);

        let expected: f64 = (1..=10)
            .map(|k| {
                let t = f64::from(k) * 0.5;
                let cash = if k == 10 { 103.0 } else { 3.0 };
                cash * (-r * t).exp()
            })
            .sum();
        let price = walk.dirty_price(&lattice, 0.0, true).unwrap();
        assert_relative_eq!(price, expected, epsilon = 1e-10);

        let spread = walk.dirty_price(&lattice, 100.0, true).unwrap();
        let flat_06 = walk.dirty_price(&flat_lattice(0.06, 0.0), 0.0, true).unwrap();
        assert_relative_eq!(spread, flat_06, epsilon = 1e-10);
    }

    #[test]
    fn test_call_caps_value() {
        let mut bond = Bond::new("c", date(2020, 1, 1), date(2030, 1, 1), 8.0);
        bond.set_call(date(2022, 1, 1), 100.0);
        let walk = BackwardInduction::new(&schedule(&bond, date(2020, 1, 1)));
        assert!(walk.has_options());

        let lattice = flat_lattice(0.03, 0.15);
        let with_call = walk.dirty_price(&lattice, 0.0, true).unwrap();
        let straight = walk.dirty_price(&lattice, 0.0, false).unwrap();
        assert!(with_call < straight);
        // callable after two years at par: worth at most par plus two years of coupons
        assert!(with_call < 100.0 + 16.0);
    }

    #[test]
    fn test_put_floors_value() {
        let mut bond = Bond::new("p", date(2020, 1, 1), date(2030, 1, 1), 3.0);
        bond.set_put(date(2023, 1, 1), 100.0);
        let walk = BackwardInduction::new(&schedule(&bond, date(2020, 1, 1)));

        let lattice = flat_lattice(0.07, 0.15);
        let with_put = walk.dirty_price(&lattice, 0.0, true).unwrap();
        let straight = walk.dirty_price(&lattice, 0.0, false).unwrap();
        assert!(with_put > straight);
    }

    #[test]
    fn test_notice_blocks_immediate_call() {
        let mut bond = Bond::new("n", date(2020, 1, 1), date(2030, 1, 1), 10.0);
        bond.set_call(date(2020, 1, 1), 100.0);
        let pv = date(2021, 3, 1);

        let walk = BackwardInduction::new(&schedule(&bond, pv));
        let lattice = flat_lattice(0.02, 0.0);
        let with_notice = walk.dirty_price(&lattice, 0.0, true).unwrap();

        let mut no_notice = bond.clone();
        no_notice.set_notice_period(0);
        let walk = BackwardInduction::new(&schedule(&no_notice, pv));
        let immediate = walk.dirty_price(&lattice, 0.0, true).unwrap();

        // with no notice the issuer calls today at par plus accrued
        assert_relative_eq!(immediate, 100.0 + 10.0 * 60.0 / 360.0, epsilon = 1e-9);
        assert!(with_notice > immediate);
    }

    #[test]
    fn test_beyond_horizon() {
        let bond = Bond::new("long", date(2020, 1, 1), date(2070, 1, 1), 5.0);
        let walk = BackwardInduction::new(&schedule(&bond, date(2020, 1, 1)));
        assert!(walk.dirty_price(&flat_lattice(0.05, 0.0), 0.0, true).is_err());
    }
}
