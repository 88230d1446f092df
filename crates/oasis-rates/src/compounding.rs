//! Compounding conventions for rate/factor conversion.
//!
//! Zero rates quoted to users are bond-equivalent (semi-annual). The lattice
//! works with continuously compounded rates per step.
//!
//! # Example
//!
//! ```rust
//! use oasis_rates::Compounding;
//!
//! let df_continuous = Compounding::Continuous.discount_factor(0.05, 2.0);
//! let df_semi = Compounding::SemiAnnual.discount_factor(0.05, 2.0);
//!
//! // Continuous compounding gives a slightly lower factor
//! assert!(df_continuous < df_semi);
//! ```

use serde::{Deserialize, Serialize};

/// Compounding convention. Rates are decimals (0.05 for 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Compounding {
    /// Continuous compounding.
    Continuous,
    /// Annual compounding.
    Annual,
    /// Semi-annual (bond-equivalent) compounding.
    #[default]
    SemiAnnual,
}

impl Compounding {
    /// Discount factor for `rate` over `t` years.
    #[must_use]
    pub fn discount_factor(self, rate: f64, t: f64) -> f64 {
        match self {
            Compounding::Continuous => (-rate * t).exp(),
            Compounding::Annual => (1.0 + rate).powf(-t),
            Compounding::SemiAnnual => (1.0 + rate / 2.0).powf(-2.0 * t),
        }
    }

    /// Zero rate implied by discount factor `df` at `t` years.
    ///
    /// `t` must be positive.
    #[must_use]
    pub fn zero_rate(self, df: f64, t: f64) -> f64 {
        match self {
            Compounding::Continuous => -df.ln() / t,
            Compounding::Annual => df.powf(-1.0 / t) - 1.0,
            Compounding::SemiAnnual => 2.0 * (df.powf(-1.0 / (2.0 * t)) - 1.0),
        }
    }
}

/// Converts a semi-annual zero rate in percent to a discount factor.
#[must_use]
pub fn zero_to_factor(rate: f64, year: f64) -> f64 {
    Compounding::SemiAnnual.discount_factor(rate / 100.0, year)
}

/// Converts a discount factor to a semi-annual zero rate in percent.
///
/// Returns `None` if `year` or `factor` is not positive.
#[must_use]
pub fn factor_to_zero(factor: f64, year: f64) -> Option<f64> {
    if year <= 0.0 || factor <= 0.0 {
        return None;
    }
    Some(Compounding::SemiAnnual.zero_rate(factor, year) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factor_semi_annual() {
        let df = Compounding::SemiAnnual.discount_factor(0.05, 1.0);
        assert_relative_eq!(df, 1.025_f64.powi(-2), epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_all_compounding() {
        for compounding in [
            Compounding::Continuous,
            Compounding::Annual,
            Compounding::SemiAnnual,
        ] {
            let df = compounding.discount_factor(0.05, 2.0);
            assert_relative_eq!(compounding.zero_rate(df, 2.0), 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_percent_helpers() {
        let factor = zero_to_factor(7.0, 10.0);
        assert_relative_eq!(factor, 1.035_f64.powi(-20), epsilon = 1e-12);
        assert_relative_eq!(factor_to_zero(factor, 10.0).unwrap(), 7.0, epsilon = 1e-10);
        assert_eq!(factor_to_zero(0.9, 0.0), None);
        assert_eq!(factor_to_zero(0.0, 1.0), None);
    }
}
