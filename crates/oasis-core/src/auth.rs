//! Pluggable authorization.
//!
//! The engine does not enforce licensing itself. An embedding application
//! may install one [`Authorizer`] per process; without one every feature
//! is allowed.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Feature groups that can be gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Interest rate model calibration.
    Lattice,
    /// Bond valuation.
    Valuation,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Lattice => write!(f, "lattice"),
            Feature::Valuation => write!(f, "valuation"),
        }
    }
}

/// Decides whether a feature may be used.
pub trait Authorizer: Send + Sync {
    /// Returns true if `feature` is allowed.
    fn authorize(&self, feature: Feature) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(Feature) -> bool + Send + Sync,
{
    fn authorize(&self, feature: Feature) -> bool {
        self(feature)
    }
}

/// Allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _feature: Feature) -> bool {
        true
    }
}

static AUTHORIZER: OnceCell<Box<dyn Authorizer>> = OnceCell::new();

/// Installs the process-wide authorizer. Can only be done once.
pub fn install_authorizer<A>(authorizer: A) -> CoreResult<()>
where
    A: Authorizer + 'static,
{
    AUTHORIZER
        .set(Box::new(authorizer))
        .map_err(|_| CoreError::AuthorizerInstalled)
}

/// Checks `feature` against the installed authorizer.
pub fn authorize(feature: Feature) -> CoreResult<()> {
    let allowed = AUTHORIZER.get().map_or(true, |a| a.authorize(feature));
    if allowed {
        Ok(())
    } else {
        log::warn!("{feature} functions refused by authorizer");
        Err(CoreError::PermissionDenied { feature })
    }
}
