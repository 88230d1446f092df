//! Bond instruments.
//!
//! - [`Bond`]: fixed coupon bond with call, put, sink and coupon step
//!   schedules
//! - [`SinkingFundStatus`]: market state of a sinking fund at the
//!   valuation date

mod bond;
mod sinking_fund;

pub use bond::{Bond, DEFAULT_NOTICE_DAYS, PAR};
pub use sinking_fund::SinkingFundStatus;
