//! Cash flow generation for bonds.
//!
//! A [`CashFlowSchedule`] lists every event after the valuation date:
//! coupon payments, sinking fund and maturity redemptions, and call or
//! put dates. Amounts are per 100 of par outstanding at the valuation
//! date, so a price computed from the schedule is directly comparable to
//! a quoted price.

mod accrued;
mod schedule;

pub use accrued::AccruedInterestCalculator;
pub use schedule::{coupon_periods, CouponPeriod};

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use oasis_core::daycounts::{DayCount, DayCountConvention};
use oasis_core::{Date, Status};
use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};
use crate::instruments::{Bond, SinkingFundStatus};
use crate::types::{in_effect, on};

/// Kinds of event on a flow date, combined bitwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowFlags(u8);

impl FlowFlags {
    /// Coupon payment.
    pub const INTEREST: Self = Self(1);
    /// Maturity or sinking fund redemption.
    pub const PRINCIPAL: Self = Self(2);
    /// Call exercise possible.
    pub const CALL: Self = Self(4);
    /// Put exercise possible.
    pub const PUT: Self = Self(8);

    /// No flags.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// True if all flags in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for FlowFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FlowFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FlowFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::INTEREST, "interest"),
            (Self::PRINCIPAL, "principal"),
            (Self::CALL, "call"),
            (Self::PUT, "put"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One event after the valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Event date.
    pub date: Date,
    /// 30/360 years from the valuation date.
    pub years: f64,
    /// Interest paid.
    pub interest: f64,
    /// Par redeemed.
    pub principal: f64,
    /// Price the principal is redeemed at, zero without principal.
    pub principal_price: f64,
    /// Par outstanding before this flow's redemption.
    pub outstanding: f64,
    /// Accrued interest per 100 par right after the flow; zero on coupon
    /// dates.
    pub accrued: f64,
    /// Start of the coupon period the flow falls in.
    pub period_start: Date,
    /// End of that coupon period.
    pub period_end: Date,
    /// Full coupon of that period per 100 par.
    pub period_coupon: f64,
    /// Call price if the bond can be called on this date.
    pub call_price: Option<f64>,
    /// Put price if the bond can be put on this date.
    pub put_price: Option<f64>,
    /// American call price in effect strictly between the previous event
    /// and this one.
    pub window_call_price: Option<f64>,
    /// American put price in effect strictly between the previous event
    /// and this one.
    pub window_put_price: Option<f64>,
    /// Event kinds.
    pub flags: FlowFlags,
}

impl Flow {
    /// Cash paid on the date: interest plus redeemed principal at its
    /// price.
    #[must_use]
    pub fn cash(&self) -> f64 {
        self.interest + self.principal * self.principal_price / 100.0
    }

    /// Par outstanding after the flow.
    #[must_use]
    pub fn outstanding_after(&self) -> f64 {
        self.outstanding - self.principal
    }
}

/// Events of a bond after a valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    /// Valuation date.
    pub pv_date: Date,
    /// First date an option may be exercised, given the notice period.
    pub notice_date: Date,
    /// Face amount the sinking schedule is measured against.
    pub face: f64,
    /// Par outstanding at the valuation date, in face units.
    pub outstanding: f64,
    /// Coupon date on or before the valuation date.
    pub previous_coupon: Date,
    /// First coupon date after the valuation date.
    pub next_coupon: Date,
    /// Accrued interest at the valuation date, per 100 par.
    pub accrued: f64,
    /// Accrued days at the valuation date.
    pub accrued_days: i64,
    /// Events in date order; the last one retires the bond.
    pub flows: Vec<Flow>,
}

impl CashFlowSchedule {
    /// Builds the schedule of `bond` as seen from `pv_date`.
    ///
    /// Sinking fund adjustments are reported as warnings in `status`.
    pub fn generate(
        bond: &Bond,
        pv_date: Date,
        sinking: &SinkingFundStatus,
        status: &mut Status,
    ) -> BondResult<Self> {
        bond.check()?;
        if pv_date < bond.issue_date() {
            return Err(BondError::PvDateBeforeIssue {
                pv_date,
                issue: bond.issue_date(),
            });
        }
        if pv_date >= bond.maturity() {
            return Err(BondError::Matured { pv_date });
        }

        let periods = bond.periods()?;
        let redemptions = sinking.redemptions(bond, pv_date, status);
        if redemptions.outstanding <= 0.0 {
            return Err(BondError::Matured { pv_date });
        }
        let scale = 100.0 / redemptions.outstanding;

        let day_count = bond.day_count();
        let frequency = bond.frequency();
        let coupon_of = |p: &CouponPeriod| AccruedInterestCalculator::coupon(p, day_count, frequency);

        let current = periods
            .iter()
            .find(|p| p.end > pv_date)
            .ok_or(BondError::Matured { pv_date })?;
        let accrued = AccruedInterestCalculator::accrued(current, pv_date, day_count, frequency);
        let accrued_days = AccruedInterestCalculator::accrued_days(current, pv_date, day_count);

        let mut dates: Vec<Date> = periods.iter().map(|p| p.end).collect();
        dates.extend(redemptions.sinks.iter().map(|s| s.date));
        dates.extend(bond.calls().iter().map(|c| c.date));
        dates.extend(bond.puts().iter().map(|p| p.date));
        dates.retain(|d| *d > pv_date && *d <= bond.maturity());
        dates.sort_unstable();
        dates.dedup();

        let years = |d: Date| DayCountConvention::Thirty360.year_fraction(pv_date, d);
        let maturity = bond.maturity();

        let mut flows = Vec::with_capacity(dates.len());
        let mut outstanding = 100.0_f64;
        let mut previous = pv_date;
        let mut index = 0;
        for date in dates {
            while periods[index].end < date {
                index += 1;
            }
            let period = &periods[index];
            let coupon_end = period.end == date;

            let mut flags = FlowFlags::empty();
            let mut redeemed = 0.0;
            let mut proceeds = 0.0;
            if let Some(sink) = on(&redemptions.sinks, date) {
                redeemed += sink.amount * scale;
                proceeds += sink.amount * scale * sink.price;
            }
            if date == maturity {
                let remainder = redemptions.final_amount * scale;
                redeemed += remainder;
                proceeds += remainder * bond.redemption_price();
            }
            let principal = redeemed.min(outstanding);
            let principal_price = if redeemed > 0.0 { proceeds / redeemed } else { 0.0 };
            if principal > 0.0 {
                flags.insert(FlowFlags::PRINCIPAL);
            }

            let interest = if coupon_end {
                coupon_of(period) * outstanding / 100.0
            } else {
                AccruedInterestCalculator::accrued(period, date, day_count, frequency) * principal
                    / 100.0
            };
            if coupon_end && interest > 0.0 {
                flags.insert(FlowFlags::INTEREST);
            }

            let (call_price, put_price) = if date < maturity {
                (bond.call_price_on(date), bond.put_price_on(date))
            } else {
                (None, None)
            };
            if call_price.is_some() {
                flags.insert(FlowFlags::CALL);
            }
            if put_price.is_some() {
                flags.insert(FlowFlags::PUT);
            }
            let window_call_price = bond
                .call_american()
                .then(|| in_effect(bond.calls(), previous).map(|c| c.price))
                .flatten();
            let window_put_price = bond
                .put_american()
                .then(|| in_effect(bond.puts(), previous).map(|p| p.price))
                .flatten();

            flows.push(Flow {
                date,
                years: years(date),
                interest,
                principal,
                principal_price,
                outstanding,
                accrued: if coupon_end {
                    0.0
                } else {
                    AccruedInterestCalculator::accrued(period, date, day_count, frequency)
                },
                period_start: period.start,
                period_end: period.end,
                period_coupon: coupon_of(period),
                call_price,
                put_price,
                window_call_price,
                window_put_price,
                flags,
            });

            outstanding -= principal;
            previous = date;
            if outstanding <= 1e-9 {
                break;
            }
        }

        log::debug!(
            "{}: {} flows after {pv_date}, outstanding {:.2}",
            bond.name(),
            flows.len(),
            redemptions.outstanding
        );

        Ok(Self {
            pv_date,
            notice_date: pv_date.add_days(i64::from(bond.notice_days())),
            face: redemptions.face,
            outstanding: redemptions.outstanding,
            previous_coupon: current.start,
            next_coupon: current.end,
            accrued,
            accrued_days,
            flows,
        })
    }

    /// Number of flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// True if no flows remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// The last flow, which retires the bond.
    #[must_use]
    pub fn last(&self) -> Option<&Flow> {
        self.flows.last()
    }

    /// True if any flow allows a call or put.
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.flows.iter().any(|f| {
            f.call_price.is_some()
                || f.put_price.is_some()
                || f.window_call_price.is_some()
                || f.window_put_price.is_some()
        })
    }

    /// Iterates over the flows.
    pub fn iter(&self) -> std::slice::Iter<'_, Flow> {
        self.flows.iter()
    }
}

impl<'a> IntoIterator for &'a CashFlowSchedule {
    type Item = &'a Flow;
    type IntoIter = std::slice::Iter<'a, Flow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.iter()
    }
}
