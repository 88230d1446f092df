//! Coupon payment frequency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Coupon payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// All interest paid at maturity; yields still quoted semi-annually.
    AtMaturity,
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year)
    #[default]
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
}

impl Frequency {
    /// Returns the number of coupon periods per year, zero when interest
    /// is only paid at maturity.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::AtMaturity => 0,
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the number of months per coupon period.
    #[must_use]
    pub fn months_per_period(&self) -> Option<u32> {
        match self {
            Frequency::AtMaturity => None,
            Frequency::Annual => Some(12),
            Frequency::SemiAnnual => Some(6),
            Frequency::Quarterly => Some(3),
            Frequency::Monthly => Some(1),
        }
    }

    /// Compounding periods per year used for yield calculations.
    #[must_use]
    pub fn yield_periods_per_year(&self) -> u32 {
        match self {
            Frequency::AtMaturity => 2,
            other => other.periods_per_year(),
        }
    }

    /// Returns true if interest is only paid at maturity.
    #[must_use]
    pub fn is_at_maturity(&self) -> bool {
        matches!(self, Frequency::AtMaturity)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::AtMaturity => "At Maturity",
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MATURITY" | "AT MATURITY" | "ATMATURITY" | "0" => Ok(Frequency::AtMaturity),
            "ANNUAL" | "A" | "1" => Ok(Frequency::Annual),
            "SEMIANNUAL" | "SEMI-ANNUAL" | "S" | "2" => Ok(Frequency::SemiAnnual),
            "QUARTERLY" | "Q" | "4" => Ok(Frequency::Quarterly),
            "MONTHLY" | "M" | "12" => Ok(Frequency::Monthly),
            _ => Err(CoreError::unknown_convention(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_periods() {
        assert_eq!(Frequency::AtMaturity.periods_per_year(), 0);
        assert_eq!(Frequency::Annual.periods_per_year(), 1);
        assert_eq!(Frequency::SemiAnnual.periods_per_year(), 2);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
    }

    #[test]
    fn test_yield_basis() {
        assert_eq!(Frequency::AtMaturity.yield_periods_per_year(), 2);
        assert_eq!(Frequency::Quarterly.yield_periods_per_year(), 4);
        assert_eq!(Frequency::AtMaturity.months_per_period(), None);
        assert_eq!(Frequency::SemiAnnual.months_per_period(), Some(6));
    }

    #[test]
    fn test_parse() {
        assert_eq!("semi-annual".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
        assert_eq!("12".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekly".parse::<Frequency>().is_err());
        assert_eq!(Frequency::default(), Frequency::SemiAnnual);
    }
}
