//! # Oasis Bonds
//!
//! Instrument model for the Oasis valuation engine.
//!
//! This crate provides:
//!
//! - **Instruments**: [`Bond`] with call, put, sinking fund and coupon step
//!   schedules, and the market-side [`SinkingFundStatus`]
//! - **Cash Flows**: coupon periods, accrued interest and the
//!   [`CashFlowSchedule`] consumed by the valuation engine
//!
//! ## Example
//!
//! ```rust
//! use oasis_bonds::prelude::*;
//! use oasis_core::{Date, Status};
//!
//! let issue = Date::from_ymd(2020, 1, 15).unwrap();
//! let maturity = Date::from_ymd(2030, 1, 15).unwrap();
//! let mut bond = Bond::new("sinker", issue, maturity, 6.5);
//! bond.set_face_amount(1_000_000.0);
//! bond.set_sink(Date::from_ymd(2028, 1, 15).unwrap(), 500_000.0);
//!
//! let mut status = Status::new();
//! let pv_date = Date::from_ymd(2024, 3, 1).unwrap();
//! let flows = bond
//!     .cash_flows(pv_date, &SinkingFundStatus::default(), &mut status)
//!     .unwrap();
//! assert_eq!(flows.last().unwrap().date, maturity);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_lines)]

pub mod cashflows;
pub mod error;
pub mod instruments;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{
        AccruedInterestCalculator, CashFlowSchedule, CouponPeriod, Flow, FlowFlags,
    };
    pub use crate::error::{BondError, BondResult, Provision};
    pub use crate::instruments::{Bond, SinkingFundStatus};
    pub use crate::types::{CouponStep, Dated, OptionEntry, SinkEntry};
}

pub use cashflows::{CashFlowSchedule, Flow, FlowFlags};
pub use error::{BondError, BondResult, Provision};
pub use instruments::{Bond, SinkingFundStatus};
