//! Actual/Actual day count conventions.

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/Actual ISDA day count convention.
///
/// Splits the period by calendar year:
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap year}}{365} + \frac{\text{Days in leap year}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if start >= end {
            return -self.year_fraction_forward(end, start);
        }
        self.year_fraction_forward(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

impl ActActIsda {
    fn year_fraction_forward(&self, start: Date, end: Date) -> f64 {
        let mut total = 0.0;
        let mut current = start.as_naive_date();
        let end = end.as_naive_date();

        while current < end {
            let current_date = Date::from(current);
            let next_year = chrono::NaiveDate::from_ymd_opt(current_date.year() + 1, 1, 1);
            let boundary = match next_year {
                Some(ny) if ny < end => ny,
                _ => end,
            };
            let days = (boundary - current).num_days() as f64;
            total += days / f64::from(current_date.days_in_year());
            current = boundary;
        }

        total
    }
}

/// Actual/Actual ICMA day count convention.
///
/// Accrual is measured against the actual length of the coupon period:
///
/// $$\text{Fraction} = \frac{\text{Days}}{\text{Frequency} \times \text{Days in Period}}$$
///
/// Treasury notes and bonds, most sovereign debt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIcma;

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        // no period information, use the calendar-year split
        ActActIsda.year_fraction(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn accrual_fraction(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
        frequency: Frequency,
    ) -> f64 {
        let days_in_period = period_start.days_between(&period_end);
        let periods = frequency.periods_per_year();
        if days_in_period <= 0 || periods == 0 {
            return self.year_fraction(start, end);
        }
        start.days_between(&end) as f64 / (f64::from(periods) * days_in_period as f64)
    }
}
