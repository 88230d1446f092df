//! Bond provision types.

mod options;

pub use options::{CouponStep, Dated, OptionEntry, SinkEntry};
pub(crate) use options::{in_effect, on, remove_on, upsert};
