//! Coupon and accrued interest amounts.
//!
//! Amounts are per 100 of outstanding par. A short first period accrues
//! against its notional regular period, so period-based conventions
//! (Actual/Actual) pay a proportionally smaller coupon.
//!
//! ```rust
//! use oasis_bonds::cashflows::{AccruedInterestCalculator, CouponPeriod};
//! use oasis_core::daycounts::DayCountConvention;
//! use oasis_core::{Date, Frequency};
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let period = CouponPeriod {
//!     start,
//!     end: Date::from_ymd(2025, 7, 15).unwrap(),
//!     notional_start: start,
//!     rate: 5.0,
//! };
//! let accrued = AccruedInterestCalculator::accrued(
//!     &period,
//!     Date::from_ymd(2025, 4, 15).unwrap(),
//!     DayCountConvention::Thirty360,
//!     Frequency::SemiAnnual,
//! );
//! assert!((accrued - 1.25).abs() < 1e-12);
//! ```

use oasis_core::daycounts::{DayCount, DayCountConvention};
use oasis_core::{Date, Frequency};

use super::CouponPeriod;

/// Calculator for coupon and accrued interest amounts.
pub struct AccruedInterestCalculator;

impl AccruedInterestCalculator {
    /// Interest paid at the end of `period`.
    #[must_use]
    pub fn coupon(period: &CouponPeriod, day_count: DayCountConvention, frequency: Frequency) -> f64 {
        period.rate * Self::fraction(period, period.end, day_count, frequency)
    }

    /// Interest accrued from the start of `period` to `date`.
    ///
    /// Zero on or before the period start; the full coupon on or after its
    /// end.
    #[must_use]
    pub fn accrued(
        period: &CouponPeriod,
        date: Date,
        day_count: DayCountConvention,
        frequency: Frequency,
    ) -> f64 {
        if date <= period.start {
            return 0.0;
        }
        let date = date.min(period.end);
        period.rate * Self::fraction(period, date, day_count, frequency)
    }

    /// Accrued days from the start of `period` to `date` under the
    /// convention.
    #[must_use]
    pub fn accrued_days(period: &CouponPeriod, date: Date, day_count: DayCountConvention) -> i64 {
        if date <= period.start {
            return 0;
        }
        day_count.day_count(period.start, date.min(period.end))
    }

    fn fraction(
        period: &CouponPeriod,
        to: Date,
        day_count: DayCountConvention,
        frequency: Frequency,
    ) -> f64 {
        if frequency.is_at_maturity() {
            return day_count.year_fraction(period.start, to);
        }
        day_count.accrual_fraction(period.start, to, period.notional_start, period.end, frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn period(start: Date, end: Date, notional_start: Date) -> CouponPeriod {
        CouponPeriod {
            start,
            end,
            notional_start,
            rate: 7.0,
        }
    }

    #[test]
    fn test_regular_coupon() {
        let p = period(date(2025, 1, 15), date(2025, 7, 15), date(2025, 1, 15));
        let coupon =
            AccruedInterestCalculator::coupon(&p, DayCountConvention::Thirty360, Frequency::SemiAnnual);
        assert_relative_eq!(coupon, 3.5, epsilon = 1e-12);

        let actact =
            AccruedInterestCalculator::coupon(&p, DayCountConvention::ActAct, Frequency::SemiAnnual);
        assert_relative_eq!(actact, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_accrued_bounds() {
        let p = period(date(2025, 1, 15), date(2025, 7, 15), date(2025, 1, 15));
        let dc = DayCountConvention::Thirty360;
        let f = Frequency::SemiAnnual;
        assert_eq!(AccruedInterestCalculator::accrued(&p, date(2025, 1, 15), dc, f), 0.0);
        assert_relative_eq!(
            AccruedInterestCalculator::accrued(&p, date(2025, 3, 15), dc, f),
            7.0 * 60.0 / 360.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            AccruedInterestCalculator::accrued(&p, date(2026, 1, 1), dc, f),
            3.5,
            epsilon = 1e-12
        );
        assert_eq!(AccruedInterestCalculator::accrued_days(&p, date(2025, 3, 15), dc), 60);
    }

    #[test]
    fn test_short_stub_coupon() {
        // three months of a six month period
        let p = period(date(2025, 4, 15), date(2025, 7, 15), date(2025, 1, 15));
        let coupon =
            AccruedInterestCalculator::coupon(&p, DayCountConvention::Thirty360, Frequency::SemiAnnual);
        assert_relative_eq!(coupon, 1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_at_maturity_simple_interest() {
        let p = period(date(2025, 1, 1), date(2027, 1, 1), date(2025, 1, 1));
        let coupon =
            AccruedInterestCalculator::coupon(&p, DayCountConvention::Thirty360, Frequency::AtMaturity);
        assert_relative_eq!(coupon, 14.0, epsilon = 1e-12);
    }
}
