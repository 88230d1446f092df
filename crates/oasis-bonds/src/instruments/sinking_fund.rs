//! Market state of a sinking fund.
//!
//! The bond's sink schedule says how much par must be retired on each
//! date. [`SinkingFundStatus`] adds what the market knows at the
//! valuation date: the par actually outstanding (which may be less than
//! the schedule implies after acceleration or open market purchases) and
//! the amount already held by the issuer's accumulators, which will be
//! designated against the next sinks instead of bonds held by the public.

use oasis_core::{Date, Status, StatusCode};
use serde::{Deserialize, Serialize};

use crate::instruments::Bond;
use crate::types::SinkEntry;

/// Outstanding amounts below this share of face are treated as missing.
const OUTSTANDING_FLOOR: f64 = 0.001;

/// Face used when neither a face amount nor a sink schedule is given.
const NOMINAL_FACE: f64 = 100.0;

/// Sinking fund information known at the valuation date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinkingFundStatus {
    /// Par outstanding at the valuation date; negative means unknown, in
    /// which case the remaining schedule is trusted.
    pub outstanding: f64,
    /// Par held by accumulators.
    pub accumulation: f64,
}

impl Default for SinkingFundStatus {
    fn default() -> Self {
        Self {
            outstanding: -1.0,
            accumulation: 0.0,
        }
    }
}

/// Remaining redemptions in face units.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Redemptions {
    /// Face the schedule is measured against.
    pub face: f64,
    /// Par held by the public at the valuation date.
    pub outstanding: f64,
    /// Sinks after the valuation date, adjusted for outstanding and
    /// accumulation.
    pub sinks: Vec<SinkEntry>,
    /// Par redeemed at maturity.
    pub final_amount: f64,
}

impl SinkingFundStatus {
    /// Creates a status with a known outstanding amount and accumulation.
    #[must_use]
    pub fn new(outstanding: f64, accumulation: f64) -> Self {
        Self {
            outstanding,
            accumulation,
        }
    }

    /// True if the outstanding amount is unknown.
    #[must_use]
    pub fn trusts_schedule(&self) -> bool {
        self.outstanding < 0.0
    }

    /// Applies this status to the sink schedule of `bond` as seen from
    /// `pv_date`.
    pub(crate) fn redemptions(&self, bond: &Bond, pv_date: Date, status: &mut Status) -> Redemptions {
        let sinks = bond.sinks();
        let sink_total: f64 = sinks.iter().map(|s| s.amount).sum();

        let face = if bond.face_amount() > 0.0 {
            if sink_total > bond.face_amount() * (1.0 + 1e-12) {
                status.warn(
                    StatusCode::SinkSumHigh,
                    format!(
                        "{}: sinks total {sink_total} against face {}",
                        bond.name(),
                        bond.face_amount()
                    ),
                );
                sink_total
            } else {
                bond.face_amount()
            }
        } else if sinks.is_empty() {
            NOMINAL_FACE
        } else {
            sink_total
        };

        let final_amount = (face - sink_total).max(0.0);
        if !sinks.is_empty() && final_amount <= face * 1e-12 {
            if let Some(last) = sinks.last() {
                if last.date < bond.maturity() {
                    status.warn(
                        StatusCode::SinkTooSoon,
                        format!("{}: schedule retires the bond on {}", bond.name(), last.date),
                    );
                }
            }
        }

        let retired: f64 = sinks
            .iter()
            .filter(|s| s.date <= pv_date)
            .map(|s| s.amount)
            .sum();
        let scheduled = (face - retired).max(0.0);
        let mut remaining: Vec<SinkEntry> = sinks.iter().filter(|s| s.date > pv_date).copied().collect();
        let mut final_amount = final_amount;

        let mut outstanding = scheduled;
        if !self.trusts_schedule() {
            if self.outstanding < OUTSTANDING_FLOOR * face {
                status.warn(
                    StatusCode::OutstandingLow,
                    format!("outstanding {} ignored, using {scheduled}", self.outstanding),
                );
            } else if self.outstanding > scheduled * (1.0 + 1e-12) {
                status.warn(
                    StatusCode::OutstandingHigh,
                    format!("outstanding {} reduced to {scheduled}", self.outstanding),
                );
            } else if scheduled > 0.0 {
                let ratio = self.outstanding / scheduled;
                for sink in &mut remaining {
                    sink.amount *= ratio;
                }
                final_amount *= ratio;
                outstanding = self.outstanding;
            }
        }

        if self.accumulation > 0.0 {
            let mut left = self.accumulation;
            for sink in &mut remaining {
                let used = left.min(sink.amount);
                sink.amount -= used;
                left -= used;
                if left <= 0.0 {
                    break;
                }
            }
            let designated = self.accumulation - left;
            outstanding -= designated;
            if left > 0.0 {
                status.warn(
                    StatusCode::SinkUndesignated,
                    format!("{left} of accumulation {} not designated", self.accumulation),
                );
            }
            remaining.retain(|s| s.amount > 0.0);
        }

        Redemptions {
            face,
            outstanding,
            sinks: remaining,
            final_amount,
        }
    }
}
