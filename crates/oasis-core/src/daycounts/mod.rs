//! Day count conventions for accrued interest and yield calculations.
//!
//! Each convention is a zero-sized type implementing [`DayCount`]. Bonds
//! select one through the [`DayCountConvention`] enum:
//!
//! - [`Thirty360US`]: 30/360 (default for bonds)
//! - [`Thirty360E`]: 30E/360
//! - [`Act360`]: Actual/360
//! - [`Act365Fixed`]: Actual/365
//! - [`ActActIcma`]: Actual/Actual, period based
//!
//! ```rust
//! use oasis_core::daycounts::{DayCount, DayCountConvention};
//! use oasis_core::types::Date;
//!
//! let dc = DayCountConvention::Thirty360;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//! assert_eq!(dc.day_count(start, end), 180);
//! ```

mod actact;
mod actual;
mod thirty360;

pub use actact::{ActActIcma, ActActIsda};
pub use actual::{Act360, Act365Fixed};
pub use thirty360::{Thirty360E, Thirty360US};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, Frequency};

/// Trait for day count conventions.
pub trait DayCount: Send + Sync {
    /// Returns the conventional name, e.g. "30/360".
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates. Negative if
    /// `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates according to the
    /// convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Fraction of the annual coupon accrued from `start` to `end`, which
    /// lie inside the coupon period `[period_start, period_end]`.
    fn accrual_fraction(
        &self,
        start: Date,
        end: Date,
        _period_start: Date,
        _period_end: Date,
        _frequency: Frequency,
    ) -> f64 {
        self.year_fraction(start, end)
    }
}

/// Day count conventions supported on bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// 30/360 US bond basis: corporate, municipal and agency bonds.
    #[default]
    Thirty360,
    /// 30E/360: 30/360 with European treatment of February.
    Thirty360E,
    /// Actual/360: Treasury bills.
    Act360,
    /// Actual/365: some certificates of deposit.
    Act365,
    /// Actual/Actual: Treasury notes and bonds, sovereign debt.
    ActAct,
}

impl DayCountConvention {
    /// Returns the implementation behind this convention.
    #[must_use]
    pub fn to_day_count(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::Thirty360 => &Thirty360US,
            DayCountConvention::Thirty360E => &Thirty360E,
            DayCountConvention::Act360 => &Act360,
            DayCountConvention::Act365 => &Act365Fixed,
            DayCountConvention::ActAct => &ActActIcma,
        }
    }

    /// Returns all supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Thirty360,
            DayCountConvention::Thirty360E,
            DayCountConvention::Act360,
            DayCountConvention::Act365,
            DayCountConvention::ActAct,
        ]
    }

    /// Days in a year under this convention, used for simple-interest
    /// yields.
    #[must_use]
    pub const fn basis(&self) -> u32 {
        match self {
            DayCountConvention::Thirty360
            | DayCountConvention::Thirty360E
            | DayCountConvention::Act360 => 360,
            DayCountConvention::Act365 | DayCountConvention::ActAct => 365,
        }
    }
}

impl DayCount for DayCountConvention {
    fn name(&self) -> &'static str {
        self.to_day_count().name()
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.to_day_count().year_fraction(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        self.to_day_count().day_count(start, end)
    }

    fn accrual_fraction(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
        frequency: Frequency,
    ) -> f64 {
        self.to_day_count()
            .accrual_fraction(start, end, period_start, period_end, frequency)
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Accepts the conventional names plus a few common aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "30/360" | "30/360 US" | "30U/360" | "BOND" | "THIRTY360" => {
                Ok(DayCountConvention::Thirty360)
            }
            "30E/360" | "EUROBOND" | "THIRTY360E" => Ok(DayCountConvention::Thirty360E),
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACTUAL/365" | "ACT365" => Ok(DayCountConvention::Act365),
            "ACT/ACT" | "ACTUAL/ACTUAL" | "ACTACT" | "ACT/ACT ICMA" => {
                Ok(DayCountConvention::ActAct)
            }
            _ => Err(CoreError::unknown_convention(s)),
        }
    }
}
