//! Market quotes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A quoted number together with what it means.
///
/// Prices are clean, per 100 par; OAS is in basis points; yields are in
/// percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "UPPERCASE")]
pub enum Quote {
    /// Option-adjusted spread.
    Oas(f64),
    /// Clean price.
    Price(f64),
    /// Yield to maturity.
    Ytm(f64),
    /// Yield to first call.
    Ytc(f64),
    /// Yield to first put.
    Ytp(f64),
}

/// The kind of a [`Quote`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuoteKind {
    /// Option-adjusted spread.
    Oas,
    /// Clean price.
    Price,
    /// Yield to maturity.
    Ytm,
    /// Yield to first call.
    Ytc,
    /// Yield to first put.
    Ytp,
}

impl Quote {
    /// Builds a quote of `kind` with `value`.
    #[must_use]
    pub fn new(kind: QuoteKind, value: f64) -> Self {
        match kind {
            QuoteKind::Oas => Self::Oas(value),
            QuoteKind::Price => Self::Price(value),
            QuoteKind::Ytm => Self::Ytm(value),
            QuoteKind::Ytc => Self::Ytc(value),
            QuoteKind::Ytp => Self::Ytp(value),
        }
    }

    /// The quote's kind.
    #[must_use]
    pub fn kind(&self) -> QuoteKind {
        match self {
            Self::Oas(_) => QuoteKind::Oas,
            Self::Price(_) => QuoteKind::Price,
            Self::Ytm(_) => QuoteKind::Ytm,
            Self::Ytc(_) => QuoteKind::Ytc,
            Self::Ytp(_) => QuoteKind::Ytp,
        }
    }

    /// The quoted number.
    #[must_use]
    pub fn value(&self) -> f64 {
        match *self {
            Self::Oas(v) | Self::Price(v) | Self::Ytm(v) | Self::Ytc(v) | Self::Ytp(v) => v,
        }
    }

    /// True for the three yield kinds.
    #[must_use]
    pub fn is_yield(&self) -> bool {
        matches!(self, Self::Ytm(_) | Self::Ytc(_) | Self::Ytp(_))
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Oas => "OAS",
            Self::Price => "PRICE",
            Self::Ytm => "YTM",
            Self::Ytc => "YTC",
            Self::Ytp => "YTP",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_value() {
        let quote = Quote::new(QuoteKind::Ytc, 6.25);
        assert_eq!(quote, Quote::Ytc(6.25));
        assert_eq!(quote.kind(), QuoteKind::Ytc);
        assert_eq!(quote.value(), 6.25);
        assert!(quote.is_yield());
        assert!(!Quote::Oas(10.0).is_yield());
        assert_eq!(Quote::Price(99.5).to_string(), "PRICE 99.5");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Quote::Oas(125.0)).unwrap();
        assert_eq!(json, r#"{"kind":"OAS","value":125.0}"#);
        let back: Quote = serde_json::from_str(r#"{"kind":"PRICE","value":101.5}"#).unwrap();
        assert_eq!(back, Quote::Price(101.5));
    }
}
