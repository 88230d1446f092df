//! Effective duration and convexity results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Effective duration and convexity from a symmetric rate shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    /// Effective duration in years.
    pub duration: f64,
    /// Effective convexity.
    pub convexity: f64,
}

impl Duration {
    /// Creates a duration result.
    #[must_use]
    pub fn new(duration: f64, convexity: f64) -> Self {
        Self {
            duration,
            convexity,
        }
    }

    /// Computes both measures from prices at the base curve and the curve
    /// shifted up and down by `shift` (decimal).
    ///
    /// ```text
    /// D = (P- - P+) / (2 P0 shift)
    /// C = (P+ + P- - 2 P0) / (P0 shift^2)
    /// ```
    #[must_use]
    pub fn from_prices(base: f64, up: f64, down: f64, shift: f64) -> Self {
        Self {
            duration: (down - up) / (2.0 * base * shift),
            convexity: (up + down - 2.0 * base) / (base * shift * shift),
        }
    }
}

impl From<Duration> for f64 {
    fn from(d: Duration) -> f64 {
        d.duration
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duration {:.4}, convexity {:.4}",
            self.duration, self.convexity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_prices() {
        let d = Duration::from_prices(100.0, 99.0, 101.05, 0.003);
        assert_relative_eq!(d.duration, 2.05 / 0.6, epsilon = 1e-12);
        assert_relative_eq!(d.convexity, 0.05 / (100.0 * 0.000_009), epsilon = 1e-9);
        assert_relative_eq!(f64::from(d), d.duration);
    }
}
