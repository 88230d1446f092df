//! Coupon period generation.
//!
//! Periods are rolled back from maturity in whole coupon intervals. When
//! the interval does not divide the bond's life, the first period is a
//! short stub starting on the initial date.

use oasis_core::{Date, Frequency};
use serde::{Deserialize, Serialize};

use crate::error::BondResult;
use crate::types::{in_effect, CouponStep};

/// One coupon accrual period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouponPeriod {
    /// Accrual start.
    pub start: Date,
    /// Accrual end and payment date.
    pub end: Date,
    /// Start of the regular period ending on `end`; earlier than `start`
    /// for a short first period.
    pub notional_start: Date,
    /// Annual coupon in percent.
    pub rate: f64,
}

impl CouponPeriod {
    /// True when the period is shorter than a regular one.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.start != self.notional_start
    }
}

/// Generates the coupon periods of a bond.
///
/// `steps` must be sorted by date; the rate of a period is the last step
/// effective on or before its start, else `coupon`.
pub fn coupon_periods(
    issue: Date,
    maturity: Date,
    frequency: Frequency,
    coupon: f64,
    steps: &[CouponStep],
) -> BondResult<Vec<CouponPeriod>> {
    let rate_from = |start: Date| in_effect(steps, start).map_or(coupon, |s| s.rate);

    let Some(months) = frequency.months_per_period() else {
        return Ok(vec![CouponPeriod {
            start: issue,
            end: maturity,
            notional_start: issue,
            rate: rate_from(issue),
        }]);
    };

    let mut ends = vec![maturity];
    let mut k = 1;
    loop {
        let date = maturity.add_months(-(k * months as i32))?;
        if date <= issue {
            break;
        }
        ends.push(date);
        k += 1;
    }
    ends.reverse();

    let mut periods = Vec::with_capacity(ends.len());
    let mut start = issue;
    for end in ends {
        let notional_start = if periods.is_empty() {
            end.add_months(-(months as i32))?
        } else {
            start
        };
        periods.push(CouponPeriod {
            start,
            end,
            notional_start,
            rate: rate_from(start),
        });
        start = end;
    }
    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_regular_semi_annual() {
        let periods =
            coupon_periods(date(2020, 1, 15), date(2025, 1, 15), Frequency::SemiAnnual, 5.0, &[])
                .unwrap();
        assert_eq!(periods.len(), 10);
        assert_eq!(periods[0].start, date(2020, 1, 15));
        assert_eq!(periods[0].end, date(2020, 7, 15));
        assert!(!periods[0].is_stub());
        assert_eq!(periods[9].end, date(2025, 1, 15));
        assert!(periods.windows(2).all(|w| w[0].end == w[1].start));
    }

    #[test]
    fn test_short_first_period() {
        let periods =
            coupon_periods(date(2020, 3, 1), date(2022, 6, 15), Frequency::SemiAnnual, 5.0, &[])
                .unwrap();
        assert_eq!(periods.len(), 5);
        let first = periods[0];
        assert_eq!(first.start, date(2020, 3, 1));
        assert_eq!(first.end, date(2020, 6, 15));
        assert_eq!(first.notional_start, date(2019, 12, 15));
        assert!(first.is_stub());
    }

    #[test]
    fn test_at_maturity_single_period() {
        let periods =
            coupon_periods(date(2020, 3, 1), date(2025, 3, 1), Frequency::AtMaturity, 4.0, &[])
                .unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].end, date(2025, 3, 1));
    }

    #[test]
    fn test_step_coupons() {
        let steps = [CouponStep {
            date: date(2022, 1, 15),
            rate: 6.0,
        }];
        let periods =
            coupon_periods(date(2020, 1, 15), date(2024, 1, 15), Frequency::Annual, 5.0, &steps)
                .unwrap();
        let rates: Vec<f64> = periods.iter().map(|p| p.rate).collect();
        assert_eq!(rates, vec![5.0, 5.0, 6.0, 6.0]);
    }

    proptest! {
        #[test]
        fn periods_tile_issue_to_maturity(
            issue_offset in 0i64..3_000,
            length in 40i64..12_000,
            frequency in prop::sample::select(vec![
                Frequency::Annual,
                Frequency::SemiAnnual,
                Frequency::Quarterly,
                Frequency::Monthly,
            ]),
        ) {
            let issue = date(2000, 1, 1) + issue_offset;
            let maturity = issue + length;
            let periods = coupon_periods(issue, maturity, frequency, 5.0, &[]).unwrap();

            prop_assert_eq!(periods[0].start, issue);
            prop_assert_eq!(periods[periods.len() - 1].end, maturity);
            prop_assert!(periods.windows(2).all(|w| w[0].end == w[1].start));
            prop_assert!(periods.iter().all(|p| p.start < p.end));
            prop_assert!(periods.iter().skip(1).all(|p| !p.is_stub()));
        }
    }
}
