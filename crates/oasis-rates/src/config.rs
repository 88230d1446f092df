//! Lattice configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Default number of lattice steps per year.
pub const DEFAULT_STEPS_PER_YEAR: u32 = 12;

/// Default minimum lattice horizon in years.
pub const DEFAULT_HORIZON_YEARS: f64 = 40.0;

/// Longest lattice horizon in years.
pub const MAX_HORIZON_YEARS: f64 = 100.0;

/// Shape of the short-rate lattice.
///
/// The lattice spans `max(horizon_years, longest curve term)` in steps of
/// `1 / steps_per_year`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Time steps per year.
    pub steps_per_year: u32,
    /// Minimum horizon in years.
    pub horizon_years: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            steps_per_year: DEFAULT_STEPS_PER_YEAR,
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

impl LatticeConfig {
    /// Sets the number of steps per year.
    #[must_use]
    pub fn with_steps_per_year(mut self, steps_per_year: u32) -> Self {
        self.steps_per_year = steps_per_year;
        self
    }

    /// Sets the minimum horizon.
    #[must_use]
    pub fn with_horizon_years(mut self, horizon_years: f64) -> Self {
        self.horizon_years = horizon_years;
        self
    }

    /// Step length in years.
    #[must_use]
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.steps_per_year)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> ModelResult<()> {
        if !(1..=365).contains(&self.steps_per_year) {
            return Err(ModelError::config(format!(
                "steps_per_year must be in 1..=365, got {}",
                self.steps_per_year
            )));
        }
        if !(self.horizon_years > 0.0 && self.horizon_years <= MAX_HORIZON_YEARS) {
            return Err(ModelError::config(format!(
                "horizon_years must be in (0, {MAX_HORIZON_YEARS}], got {}",
                self.horizon_years
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_validation() {
        let config = LatticeConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.dt() - 1.0 / 12.0).abs() < 1e-15);

        assert!(config.with_steps_per_year(0).validate().is_err());
        assert!(config.with_horizon_years(-1.0).validate().is_err());
        assert!(config.with_horizon_years(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: LatticeConfig = serde_json::from_str(r#"{"steps_per_year": 24}"#).unwrap();
        assert_eq!(config.steps_per_year, 24);
        assert_eq!(config.horizon_years, DEFAULT_HORIZON_YEARS);
    }
}
