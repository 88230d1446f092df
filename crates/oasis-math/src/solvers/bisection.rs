//! Bisection root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Bisection root-finding algorithm.
///
/// Halves the bracket until the residual or half-width falls below
/// `config.tolerance`. The endpoints may be given in either order.
///
/// ```rust
/// use oasis_math::solvers::{bisection, SolverConfig};
///
/// let result = bisection(|x: f64| x * x - 2.0, 2.0, 1.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo.abs() < config.tolerance {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: f_lo,
        });
    }
    if f_hi.abs() < config.tolerance {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: f_hi,
        });
    }
    if !(f_lo * f_hi < 0.0) {
        return Err(MathError::NoSignChange {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);

        if f_mid.abs() < config.tolerance || 0.5 * (hi - lo) < config.tolerance {
            log::trace!("bisection converged to {mid} after {} iterations", iteration + 1);
            return Ok(SolverResult {
                root: mid,
                iterations: iteration + 1,
                residual: f_mid,
            });
        }

        if f_mid * f_lo < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = 0.5 * (lo + hi);
    Err(MathError::NoConvergence {
        iterations: config.max_iterations,
        residual: f(mid).abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let result = bisection(|x: f64| x * x - 2.0, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let result = bisection(|x: f64| x * x - 2.0, 2.0, 3.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::NoSignChange { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let result = bisection(|x: f64| x - 1.0, 0.0, 1.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_decreasing_function() {
        // price-like: decreasing in the unknown
        let f = |s: f64| 100.0 * (-s / 100.0).exp() - 90.0;
        let result = bisection(f, -50.0, 50.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, -100.0 * (0.9f64).ln(), epsilon = 1e-8);
    }
}
