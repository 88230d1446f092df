//! Engine configuration.
//!
//! ```toml
//! duration_shift_bp = 25.0
//!
//! [lattice]
//! steps_per_year = 24
//!
//! [solver]
//! method = "bisection"
//! min_bp = -500.0
//! max_bp = 5000.0
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use oasis_math::solvers::{bisection, brent, SolverConfig, SolverResult};
use oasis_math::MathResult;
use oasis_rates::{CurveInput, InterestRateModel, LatticeConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};

/// Default effective duration shift in basis points.
pub const DEFAULT_DURATION_SHIFT_BP: f64 = 30.0;

/// Valid duration shifts are `[MIN_DURATION_SHIFT_BP, MAX_DURATION_SHIFT_BP)`.
pub const MIN_DURATION_SHIFT_BP: f64 = 1.0;

/// Exclusive upper bound of the duration shift.
pub const MAX_DURATION_SHIFT_BP: f64 = 300.0;

/// Bracketing root finder used for the OAS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootMethod {
    /// Brent's method.
    #[default]
    Brent,
    /// Plain bisection.
    Bisection,
}

/// OAS root-finding settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OasSolverConfig {
    /// Root finder.
    pub method: RootMethod,
    /// Lowest OAS searched, basis points.
    pub min_bp: f64,
    /// Highest OAS searched, basis points.
    pub max_bp: f64,
    /// Price tolerance.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: u32,
}

impl Default for OasSolverConfig {
    fn default() -> Self {
        Self {
            method: RootMethod::Brent,
            min_bp: -1000.0,
            max_bp: 10_000.0,
            tolerance: 1e-9,
            max_iterations: 200,
        }
    }
}

impl OasSolverConfig {
    /// Root-finder settings.
    #[must_use]
    pub fn solver(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }

    /// Finds the spread in `[min_bp, max_bp]` where `f` crosses zero.
    pub fn find_root<F>(&self, f: F) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        let config = self.solver();
        match self.method {
            RootMethod::Brent => brent(f, self.min_bp, self.max_bp, &config),
            RootMethod::Bisection => bisection(f, self.min_bp, self.max_bp, &config),
        }
    }

    fn validate(&self) -> ValueResult<()> {
        if !(self.min_bp < self.max_bp) {
            return Err(ValueError::config(format!(
                "OAS range [{}, {}] is empty",
                self.min_bp, self.max_bp
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(ValueError::config(format!(
                "tolerance {} must be positive",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(ValueError::config("max_iterations must be positive"));
        }
        Ok(())
    }
}

/// Valuation engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default effective duration shift, basis points.
    pub duration_shift_bp: f64,
    /// Lattice used by models built from this configuration.
    pub lattice: LatticeConfig,
    /// OAS root-finding.
    pub solver: OasSolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration_shift_bp: DEFAULT_DURATION_SHIFT_BP,
            lattice: LatticeConfig::default(),
            solver: OasSolverConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> ValueResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ValueError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ValueResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ValueError::config(format!("{}: {e}", path.display())))?;
        log::debug!("loading engine configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ValueResult<String> {
        toml::to_string(self).map_err(|e| ValueError::config(e.to_string()))
    }

    /// Checks every setting.
    pub fn validate(&self) -> ValueResult<()> {
        self.lattice
            .validate()
            .map_err(|e| ValueError::config(e.to_string()))?;
        self.solver.validate()?;
        check_shift(self.duration_shift_bp)
    }

    /// An empty model using this configuration's lattice.
    #[must_use]
    pub fn model(&self, input: CurveInput) -> InterestRateModel {
        InterestRateModel::new(input).with_config(self.lattice)
    }
}

/// Checks a duration shift against `[1, 300)` basis points.
pub(crate) fn check_shift(bp: f64) -> ValueResult<()> {
    if (MIN_DURATION_SHIFT_BP..MAX_DURATION_SHIFT_BP).contains(&bp) {
        Ok(())
    } else {
        Err(ValueError::DurationShift { bp })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.solver.method, RootMethod::Brent);
        assert_eq!(config.solver.min_bp, -1000.0);
        assert_eq!(config.solver.max_bp, 10_000.0);
        assert_eq!(config.solver.max_iterations, 200);
        assert_eq!(config.duration_shift_bp, 30.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            "duration_shift_bp = 25.0\n[lattice]\nsteps_per_year = 24\n[solver]\nmethod = \"bisection\"\nmax_bp = 5000.0\n",
        )
        .unwrap();
        assert_eq!(config.duration_shift_bp, 25.0);
        assert_eq!(config.lattice.steps_per_year, 24);
        assert_eq!(config.lattice.horizon_years, 40.0);
        assert_eq!(config.solver.max_bp, 5000.0);
        assert_eq!(config.solver.min_bp, -1000.0);
        assert_eq!(config.solver.method, RootMethod::Bisection);
    }

    #[test]
    fn test_methods_agree() {
        let f = |bp: f64| 100.0 * (-0.06 - bp / 10_000.0).exp() - 90.0;
        let by_brent = OasSolverConfig::default().find_root(f).unwrap();
        let by_bisection = OasSolverConfig {
            method: RootMethod::Bisection,
            ..OasSolverConfig::default()
        }
        .find_root(f)
        .unwrap();
        assert!((by_brent.root - by_bisection.root).abs() < 1e-6);
        assert!(by_brent.iterations < by_bisection.iterations);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            EngineConfig::from_toml_str("duration_shift_bp = 300.0"),
            Err(ValueError::DurationShift { .. })
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[solver]\nmin_bp = 100.0\nmax_bp = 50.0"),
            Err(ValueError::Config { .. })
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[lattice]\nsteps_per_year = 0"),
            Err(ValueError::Config { .. })
        ));
        assert!(EngineConfig::from_toml_str("solver = 3").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_model_uses_lattice() {
        let mut config = EngineConfig::default();
        config.lattice.steps_per_year = 4;
        let model = config.model(CurveInput::Par);
        assert_eq!(model.config().steps_per_year, 4);
    }
}
