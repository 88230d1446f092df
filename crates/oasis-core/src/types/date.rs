//! Calendar date used throughout the engine.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A calendar date.
///
/// Newtype over `chrono::NaiveDate`. Besides ISO text it understands the
/// American `m/d/y` form and the packed `yyyymmdd` integer ("library date")
/// used by the C interfaces of older analytics libraries.
///
/// # Example
///
/// ```rust
/// use oasis_core::types::Date;
///
/// let date = Date::parse_mdy("7/1/2013").unwrap();
/// assert_eq!(date.libdate(), 20130701);
/// assert_eq!(date.add_months(6).unwrap(), Date::from_ymd(2014, 1, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Creates a date from American month/day/year text, e.g. `7/1/2013`.
    ///
    /// Text without a `/` separator is read as a packed `yyyymmdd` number.
    pub fn parse_mdy(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        if !s.contains('/') {
            let packed = s
                .parse::<i64>()
                .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))?;
            return Self::from_libdate(packed);
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 3 {
            return Err(CoreError::invalid_date(format!("Cannot parse: {s}")));
        }
        let field = |p: &str| {
            p.trim()
                .parse::<i32>()
                .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
        };
        let (month, day, year) = (field(parts[0])?, field(parts[1])?, field(parts[2])?);
        if month < 1 || day < 1 {
            return Err(CoreError::invalid_date(format!("Cannot parse: {s}")));
        }
        Self::from_ymd(year, month as u32, day as u32)
    }

    /// Creates a date from its packed `yyyymmdd` form.
    pub fn from_libdate(packed: i64) -> CoreResult<Self> {
        if packed <= 0 {
            return Err(CoreError::invalid_date(format!("library date {packed}")));
        }
        let year = i32::try_from(packed / 10_000)
            .map_err(|_| CoreError::invalid_date(format!("library date {packed}")))?;
        let month = ((packed / 100) % 100) as u32;
        let day = (packed % 100) as u32;
        Self::from_ymd(year, month, day)
    }

    /// Returns the packed `yyyymmdd` form.
    #[must_use]
    pub fn libdate(&self) -> i64 {
        i64::from(self.year()) * 10_000 + i64::from(self.month()) * 100 + i64::from(self.day())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Checks if the year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Returns the number of days in the date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Returns the number of days in the date's year.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        let new_day = self.day().min(max_day);

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a number of years to the date.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(years * 12)
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Checks if the date is the end of month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    /// Accepts ISO `yyyy-mm-dd`, American `m/d/y`, or packed `yyyymmdd`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('-') {
            Self::parse(s)
        } else {
            Self::parse_mdy(s)
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Self;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl AddAssign<i64> for Date {
    fn add_assign(&mut self, days: i64) {
        *self = self.add_days(days);
    }
}

impl Sub<i64> for Date {
    type Output = Self;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl SubAssign<i64> for Date {
    fn sub_assign(&mut self, days: i64) {
        *self = self.add_days(-days);
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
