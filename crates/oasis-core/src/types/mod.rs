//! Domain types shared by every crate in the workspace.
//!
//! - [`Date`]: Calendar date with `m/d/y` and packed `yyyymmdd` forms
//! - [`Frequency`]: Coupon payment frequency

mod date;
mod frequency;

pub use date::Date;
pub use frequency::Frequency;
