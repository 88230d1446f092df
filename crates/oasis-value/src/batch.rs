//! Batch valuation of independent requests against one solved model.
//!
//! The solved lattice is shared read-only; each request gets its own
//! [`Value`]. With the `parallel` feature the requests run on the rayon
//! thread pool.

use oasis_bonds::{Bond, SinkingFundStatus};
use oasis_core::{Date, HasStatus, Status};
use oasis_rates::InterestRateModel;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::duration::Duration;
use crate::quote::Quote;
use crate::value::{Value, BAD_VALUE};

/// One bond to value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRequest {
    /// The bond.
    pub bond: Bond,
    /// Valuation date.
    pub pv_date: Date,
    /// Market quote: an OAS, a price or a yield.
    pub quote: Quote,
    /// Sinking fund outstanding and accumulation.
    #[serde(default)]
    pub sinking: SinkingFundStatus,
}

impl ValuationRequest {
    /// Creates a request without sinking fund information.
    #[must_use]
    pub fn new(bond: Bond, pv_date: Date, quote: Quote) -> Self {
        Self {
            bond,
            pv_date,
            quote,
            sinking: SinkingFundStatus::default(),
        }
    }
}

/// The analytics of one request.
///
/// Numbers that could not be computed hold [`BAD_VALUE`]; `status` carries
/// the first error and any warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Bond name.
    pub name: String,
    /// Valuation date.
    pub pv_date: Date,
    /// Clean price.
    pub price: f64,
    /// OAS in basis points.
    pub oas: f64,
    /// Accrued interest.
    pub accrued: f64,
    /// Option value to the holder.
    pub option_value: f64,
    /// Effective duration and convexity.
    pub duration: Duration,
    /// Outcome of the valuation.
    pub status: Status,
}

impl ValuationResult {
    /// True if every number was computed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Models solved for the duration shifts, shared by every request in a
/// batch.
type ShiftedModels = Vec<(f64, InterestRateModel)>;

fn solve_shifts(model: &InterestRateModel, config: &EngineConfig) -> ShiftedModels {
    if !model.is_solved() {
        return Vec::new();
    }
    let bp = config.duration_shift_bp;
    [bp, -bp]
        .into_iter()
        .filter_map(|shift| {
            let mut shifted = model.shifted(shift);
            match shifted.solve() {
                Ok(()) => Some((shift, shifted)),
                Err(err) => {
                    log::debug!("shift {shift}bp not solved: {err}");
                    None
                }
            }
        })
        .collect()
}

/// Values a single request.
#[must_use]
pub fn value_one(
    model: &InterestRateModel,
    request: &ValuationRequest,
    config: &EngineConfig,
) -> ValuationResult {
    value_shared(model, &[], request, config)
}

fn value_shared(
    model: &InterestRateModel,
    shifts: &[(f64, InterestRateModel)],
    request: &ValuationRequest,
    config: &EngineConfig,
) -> ValuationResult {
    let mut value = shifts.iter().fold(
        Value::with_sinking_fund(&request.bond, model, &request.sinking, request.pv_date)
            .with_config(*config),
        |value, (bp, shifted)| value.with_shifted_model(*bp, shifted),
    );

    let mut status = value.status().clone();
    let mut track = |value: &Value| {
        if let Some(error) = value.status().error_diagnostic() {
            status.record(error.clone());
        }
        for warning in value.status().warnings() {
            if !status.warnings().contains(warning) {
                status.record(warning.clone());
            }
        }
    };

    let oas = value.oas_from(request.quote);
    track(&value);
    let (price, option_value, duration) = if oas == BAD_VALUE {
        (BAD_VALUE, BAD_VALUE, Duration::new(BAD_VALUE, BAD_VALUE))
    } else {
        let price = value.price(oas);
        track(&value);
        let option_value = value.option_value(oas);
        track(&value);
        let duration = value.effective_duration(oas);
        track(&value);
        (price, option_value, duration)
    };
    let accrued = value.accrued();
    track(&value);

    ValuationResult {
        name: request.bond.name().to_string(),
        pv_date: request.pv_date,
        price,
        oas,
        accrued,
        option_value,
        duration,
        status,
    }
}

/// Values every request against `model` in order.
///
/// The curves shifted for effective duration are solved once and shared.
#[cfg(not(feature = "parallel"))]
#[must_use]
pub fn value_all(
    model: &InterestRateModel,
    requests: &[ValuationRequest],
    config: &EngineConfig,
) -> Vec<ValuationResult> {
    log::debug!("valuing {} requests", requests.len());
    let shifts = solve_shifts(model, config);
    requests
        .iter()
        .map(|request| value_shared(model, &shifts, request, config))
        .collect()
}

/// Values every request against `model` in parallel.
///
/// The curves shifted for effective duration are solved once and shared.
/// Results are in request order.
#[cfg(feature = "parallel")]
#[must_use]
pub fn value_all(
    model: &InterestRateModel,
    requests: &[ValuationRequest],
    config: &EngineConfig,
) -> Vec<ValuationResult> {
    use rayon::prelude::*;

    log::debug!("valuing {} requests in parallel", requests.len());
    let shifts = solve_shifts(model, config);
    requests
        .par_iter()
        .map(|request| value_shared(model, &shifts, request, config))
        .collect()
}
