//! Newton-Raphson with a Brent fallback.

use crate::error::{MathError, MathResult};
use crate::solvers::{brent, SolverConfig, SolverResult};

/// Newton steps allowed before falling back.
const NEWTON_MAX_ITERATIONS: u32 = 20;

/// Consecutive growing residuals tolerated before Newton is abandoned.
const MAX_DIVERGENCE: u32 = 3;

/// Hybrid root-finding algorithm.
///
/// Runs Newton-Raphson from `initial_guess`; if it diverges, hits a flat
/// derivative, leaves `bounds`, or runs out of steps, Brent is run on
/// `bounds`.
///
/// ```rust
/// use oasis_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
/// let result = hybrid(f, df, 1.5, (1.0, 2.0), &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: (f64, f64),
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    match newton_in_bounds(&f, &df, initial_guess, bounds, config) {
        Ok(result) => Ok(result),
        Err(err) => {
            log::trace!("newton abandoned ({err}), falling back to brent");
            let mut result = brent(&f, bounds.0, bounds.1, config)?;
            result.iterations += NEWTON_MAX_ITERATIONS.min(config.max_iterations);
            Ok(result)
        }
    }
}

fn newton_in_bounds<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    bounds: (f64, f64),
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let (lo, hi) = (bounds.0.min(bounds.1), bounds.0.max(bounds.1));
    let mut x = initial_guess;
    let mut prev_residual = f64::MAX;
    let mut divergence_count = 0;
    let max_iter = config.max_iterations.min(NEWTON_MAX_ITERATIONS);

    for iteration in 0..max_iter {
        let fx = f(x);
        let residual = fx.abs();
        if residual < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if residual > prev_residual * 2.0 {
            divergence_count += 1;
            if divergence_count >= MAX_DIVERGENCE {
                return Err(MathError::bad_input("Newton iterate blew up"));
            }
        } else {
            divergence_count = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if dfx.abs() < 1e-15 {
            return Err(MathError::FlatSlope { slope: dfx });
        }

        let step = fx / dfx;
        x -= step;
        if !x.is_finite() || x < lo || x > hi {
            return Err(MathError::bad_input("Newton step left the bracket"));
        }

        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::NoConvergence {
        iterations: max_iter,
        residual: f(x).abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let result = hybrid(
            |x: f64| x * x - 2.0,
            |x: f64| 2.0 * x,
            1.5,
            (1.0, 2.0),
            &SolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_fallback_to_brent() {
        // Newton from 0 jumps out of [1, 3]
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let df = |x: f64| 3.0 * x * x - 2.0;
        let result = hybrid(f, df, 0.0, (1.0, 3.0), &SolverConfig::default()).unwrap();
        assert!(f(result.root).abs() < 1e-9);
        assert!(result.iterations >= NEWTON_MAX_ITERATIONS.min(100));
    }

    #[test]
    fn test_no_root_in_bounds() {
        let result = hybrid(
            |x: f64| x * x + 1.0,
            |x: f64| 2.0 * x,
            0.5,
            (0.0, 2.0),
            &SolverConfig::default(),
        );
        assert!(result.is_err());
    }
}
