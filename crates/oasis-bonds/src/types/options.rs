//! Call, put, sink and coupon schedule entries.

use oasis_core::Date;
use serde::{Deserialize, Serialize};

/// Something that occurs on a date.
pub trait Dated {
    /// The entry's date.
    fn date(&self) -> Date;
}

/// A call or put entry: exercisable from `date` at `price`.
///
/// For American options the price applies until the next entry; for
/// European options only on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// First (or only) exercise date.
    pub date: Date,
    /// Strike, percent of par.
    pub price: f64,
}

/// A scheduled sinking fund redemption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinkEntry {
    /// Redemption date.
    pub date: Date,
    /// Face amount retired.
    pub amount: f64,
    /// Redemption price, percent of par.
    pub price: f64,
}

/// A coupon rate that takes effect for periods starting on or after
/// `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouponStep {
    /// Effective date.
    pub date: Date,
    /// Annual coupon in percent.
    pub rate: f64,
}

impl Dated for OptionEntry {
    fn date(&self) -> Date {
        self.date
    }
}

impl Dated for SinkEntry {
    fn date(&self) -> Date {
        self.date
    }
}

impl Dated for CouponStep {
    fn date(&self) -> Date {
        self.date
    }
}

/// Inserts `entry` keeping the schedule sorted, replacing any entry on the
/// same date.
pub(crate) fn upsert<T: Dated>(schedule: &mut Vec<T>, entry: T) {
    match schedule.binary_search_by_key(&entry.date(), Dated::date) {
        Ok(index) => schedule[index] = entry,
        Err(index) => schedule.insert(index, entry),
    }
}

/// Removes the entry on `date`, if any.
pub(crate) fn remove_on<T: Dated>(schedule: &mut Vec<T>, date: Date) {
    schedule.retain(|entry| entry.date() != date);
}

/// Latest entry on or before `date`.
pub(crate) fn in_effect<T: Dated>(schedule: &[T], date: Date) -> Option<&T> {
    let index = schedule.partition_point(|entry| entry.date() <= date);
    index.checked_sub(1).map(|i| &schedule[i])
}

/// Entry exactly on `date`.
pub(crate) fn on<T: Dated>(schedule: &[T], date: Date) -> Option<&T> {
    schedule
        .binary_search_by_key(&date, Dated::date)
        .ok()
        .map(|i| &schedule[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn entry(y: i32, price: f64) -> OptionEntry {
        OptionEntry {
            date: date(y, 1, 1),
            price,
        }
    }

    #[test]
    fn test_upsert_keeps_order_and_replaces() {
        let mut schedule = Vec::new();
        upsert(&mut schedule, entry(2030, 101.0));
        upsert(&mut schedule, entry(2028, 102.0));
        upsert(&mut schedule, entry(2032, 100.0));
        upsert(&mut schedule, entry(2030, 100.5));

        let years: Vec<i32> = schedule.iter().map(|e| e.date.year()).collect();
        assert_eq!(years, vec![2028, 2030, 2032]);
        assert_eq!(schedule[1].price, 100.5);

        remove_on(&mut schedule, date(2028, 1, 1));
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn test_lookup() {
        let schedule = vec![entry(2028, 102.0), entry(2030, 101.0)];
        assert!(in_effect(&schedule, date(2027, 12, 31)).is_none());
        assert_eq!(in_effect(&schedule, date(2029, 6, 1)).unwrap().price, 102.0);
        assert_eq!(in_effect(&schedule, date(2030, 1, 1)).unwrap().price, 101.0);
        assert!(on(&schedule, date(2029, 6, 1)).is_none());
        assert_eq!(on(&schedule, date(2030, 1, 1)).unwrap().price, 101.0);
    }
}
