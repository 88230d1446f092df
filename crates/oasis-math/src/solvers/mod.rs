//! Root-finding algorithms.
//!
//! - [`brent`]: bracketing, superlinear; used for lattice calibration and
//!   OAS solving
//! - [`bisection`]: bracketing, linear; selectable for OAS solving
//! - [`hybrid`]: Newton-Raphson with a Brent fallback; used for yields
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//! | Hybrid | Fast | Guaranteed | Derivative and bracket |
//!
//! ```rust
//! use oasis_math::solvers::{brent, SolverConfig};
//!
//! // price of a 5 year annual 5% bond against a yield in percent
//! let price = |y: f64| {
//!     let v = 1.0 / (1.0 + y / 100.0);
//!     (1..=5).map(|t| 5.0 * v.powi(t)).sum::<f64>() + 100.0 * v.powi(5)
//! };
//!
//! let result = brent(|y| price(y) - 95.0, 0.0, 20.0, &SolverConfig::default()).unwrap();
//! assert!(result.root > 5.0);
//! ```

mod bisection;
mod brent;
mod hybrid;

pub use bisection::bisection;
pub use brent::brent;
pub use hybrid::hybrid;

use serde::{Deserialize, Serialize};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Tolerance for convergence, applied to both the residual and the
    /// bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bond_price(yield_pct: f64, coupon: f64, years: i32, freq: i32) -> f64 {
        let v = 1.0 / (1.0 + yield_pct / 100.0 / f64::from(freq));
        let periods = years * freq;
        let c = coupon / f64::from(freq);
        (1..=periods).map(|t| c * v.powi(t)).sum::<f64>() + 100.0 * v.powi(periods)
    }

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);

        assert_relative_eq!(config.tolerance, 1e-8);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_par_bond_yield() {
        let f = |y: f64| bond_price(y, 5.0, 10, 2) - 100.0;
        let result = brent(f, 0.0, 20.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 5.0, epsilon = 1e-8);
    }

    #[test]
    fn test_all_solvers_agree() {
        let f = |y: f64| bond_price(y, 6.0, 7, 2) - 98.0;
        let df = |y: f64| (f(y + 1e-6) - f(y - 1e-6)) / 2e-6;
        let config = SolverConfig::default();

        let by_brent = brent(f, 0.0, 20.0, &config).unwrap();
        let by_bisection = bisection(f, 0.0, 20.0, &config).unwrap();
        let by_hybrid = hybrid(f, df, 6.0, (0.0, 20.0), &config).unwrap();

        assert_relative_eq!(by_brent.root, by_bisection.root, epsilon = 1e-7);
        assert_relative_eq!(by_brent.root, by_hybrid.root, epsilon = 1e-7);
        assert!(by_brent.root > 6.0);
    }
}
