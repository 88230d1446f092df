//! Actual/360 and Actual/365 day count conventions.

use super::DayCount;
use crate::types::Date;

/// Actual/360 day count convention.
///
/// Actual days over a 360-day year. Treasury bills and money markets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed day count convention.
///
/// The year basis is always 365 days, leap years are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 365.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_act360() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 4, 1).unwrap();
        assert_eq!(Act360.day_count(start, end), 90);
        assert_relative_eq!(Act360.year_fraction(start, end), 0.25);
    }

    #[test]
    fn test_act365_ignores_leap_day() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(Act365Fixed.day_count(start, end), 366);
        assert_relative_eq!(Act365Fixed.year_fraction(start, end), 366.0 / 365.0);
    }
}
