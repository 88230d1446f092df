//! The bond instrument.

use oasis_core::daycounts::{DayCount, DayCountConvention};
use oasis_core::{Date, Diagnostic, Frequency, HasStatus, Status, StatusCode};
use serde::{Deserialize, Serialize};

use crate::cashflows::{coupon_periods, AccruedInterestCalculator, CashFlowSchedule, CouponPeriod};
use crate::error::{BondError, BondResult, Provision};
use crate::instruments::SinkingFundStatus;
use crate::types::{in_effect, on, remove_on, upsert, CouponStep, OptionEntry, SinkEntry};

/// Default option notice in calendar days.
pub const DEFAULT_NOTICE_DAYS: u32 = 30;

/// Default redemption price, percent of par.
pub const PAR: f64 = 100.0;

/// A fixed coupon bond with optional call, put and sinking fund
/// provisions.
///
/// Construction never fails outright: an inconsistent bond records the
/// problem in its [`Status`] and every setter afterwards returns `false`.
/// Setters validate their own input and return `false` (leaving the bond
/// unchanged) when it is rejected.
///
/// # Example
///
/// ```rust
/// use oasis_bonds::prelude::*;
/// use oasis_core::Date;
///
/// let issue = Date::from_ymd(2020, 1, 15).unwrap();
/// let maturity = Date::from_ymd(2050, 1, 15).unwrap();
/// let mut bond = Bond::new("callable 7s of 2050", issue, maturity, 7.0);
/// assert!(bond.is_valid());
/// assert!(bond.set_call(Date::from_ymd(2025, 1, 15).unwrap(), 100.0));
/// assert!(!bond.set_call(Date::from_ymd(2051, 1, 15).unwrap(), 100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BondRecord", into = "BondRecord")]
pub struct Bond {
    name: String,
    issue_date: Date,
    maturity: Date,
    coupon: f64,
    day_count: DayCountConvention,
    frequency: Frequency,
    redemption_price: f64,
    face_amount: f64,
    coupon_steps: Vec<CouponStep>,
    calls: Vec<OptionEntry>,
    puts: Vec<OptionEntry>,
    sinks: Vec<SinkEntry>,
    notice_days: u32,
    call_american: bool,
    put_american: bool,
    status: Status,
}

/// Serialized form of a [`Bond`].
///
/// Reading one back replays the terms through the constructor and the
/// setters, so a rejected term lands in the bond's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BondRecord {
    name: String,
    issue_date: Date,
    maturity: Date,
    coupon: f64,
    #[serde(default)]
    day_count: DayCountConvention,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default = "default_redemption")]
    redemption_price: f64,
    #[serde(default)]
    face_amount: f64,
    #[serde(default)]
    coupon_steps: Vec<CouponStep>,
    #[serde(default)]
    calls: Vec<OptionEntry>,
    #[serde(default)]
    puts: Vec<OptionEntry>,
    #[serde(default)]
    sinks: Vec<SinkEntry>,
    #[serde(default = "default_notice")]
    notice_days: u32,
    #[serde(default = "default_true")]
    call_american: bool,
    #[serde(default)]
    put_american: bool,
}

fn default_redemption() -> f64 {
    PAR
}

fn default_notice() -> u32 {
    DEFAULT_NOTICE_DAYS
}

fn default_true() -> bool {
    true
}

impl From<Bond> for BondRecord {
    fn from(bond: Bond) -> Self {
        Self {
            name: bond.name,
            issue_date: bond.issue_date,
            maturity: bond.maturity,
            coupon: bond.coupon,
            day_count: bond.day_count,
            frequency: bond.frequency,
            redemption_price: bond.redemption_price,
            face_amount: bond.face_amount,
            coupon_steps: bond.coupon_steps,
            calls: bond.calls,
            puts: bond.puts,
            sinks: bond.sinks,
            notice_days: bond.notice_days,
            call_american: bond.call_american,
            put_american: bond.put_american,
        }
    }
}

impl From<BondRecord> for Bond {
    fn from(record: BondRecord) -> Self {
        let mut bond = Bond::new(
            record.name.clone(),
            record.issue_date,
            record.maturity,
            record.coupon,
        );
        if let Err(err) = bond.replay(&record) {
            if bond.is_valid() {
                log::warn!("bond {}: {err}", bond.name);
                bond.status.set_error(err.status_code(), err.to_string());
            }
        }
        bond
    }
}

impl Bond {
    /// Creates a bond paying `coupon` percent semi-annually on a 30/360
    /// basis from `issue_date` to `maturity`.
    ///
    /// Invalid dates or coupon are recorded in the bond's status.
    #[must_use]
    pub fn new(name: impl Into<String>, issue_date: Date, maturity: Date, coupon: f64) -> Self {
        let mut bond = Self {
            name: name.into(),
            issue_date,
            maturity,
            coupon,
            day_count: DayCountConvention::default(),
            frequency: Frequency::default(),
            redemption_price: PAR,
            face_amount: 0.0,
            coupon_steps: Vec::new(),
            calls: Vec::new(),
            puts: Vec::new(),
            sinks: Vec::new(),
            notice_days: DEFAULT_NOTICE_DAYS,
            call_american: true,
            put_american: false,
            status: Status::new(),
        };
        if let Err(err) = bond.validate() {
            log::warn!("bond {}: {err}", bond.name);
            bond.status.set_error(err.status_code(), err.to_string());
        }
        bond
    }

    /// Like [`Bond::new`], but returns the construction error instead of
    /// recording it.
    pub fn try_new(
        name: impl Into<String>,
        issue_date: Date,
        maturity: Date,
        coupon: f64,
    ) -> BondResult<Self> {
        let bond = Self::new(name, issue_date, maturity, coupon);
        bond.check()?;
        Ok(bond)
    }

    fn validate(&self) -> BondResult<()> {
        if self.issue_date >= self.maturity {
            return Err(BondError::InvalidMaturity {
                issue: self.issue_date,
                maturity: self.maturity,
            });
        }
        if !self.coupon.is_finite() || self.coupon < 0.0 {
            return Err(BondError::InvalidCoupon {
                coupon: self.coupon,
            });
        }
        Ok(())
    }

    fn replay(&mut self, record: &BondRecord) -> BondResult<()> {
        self.check()?;
        self.day_count = record.day_count;
        self.frequency = record.frequency;
        self.call_american = record.call_american;
        self.put_american = record.put_american;
        self.try_set_redemption_price(record.redemption_price)?;
        self.try_set_face_amount(record.face_amount)?;
        for step in &record.coupon_steps {
            self.try_set_coupon(step.date, step.rate)?;
        }
        for call in &record.calls {
            self.try_set_call(call.date, call.price)?;
        }
        for put in &record.puts {
            self.try_set_put(put.date, put.price)?;
        }
        for sink in &record.sinks {
            self.try_set_sink_at_price(sink.date, sink.amount, sink.price)?;
        }
        self.notice_days = record.notice_days;
        self.clamp_notice();
        Ok(())
    }

    /// Returns the construction error, if any.
    pub fn check(&self) -> BondResult<()> {
        self.status.check().map_err(BondError::InvalidBond)
    }

    /// True if construction succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status.is_ok()
    }

    // ---- setters ------------------------------------------------------

    /// Sets the day count used for coupons and accrued interest.
    pub fn set_day_count(&mut self, day_count: DayCountConvention) -> bool {
        if !self.is_valid() {
            return false;
        }
        self.day_count = day_count;
        true
    }

    /// Sets the coupon frequency.
    pub fn set_frequency(&mut self, frequency: Frequency) -> bool {
        if !self.is_valid() {
            return false;
        }
        self.frequency = frequency;
        self.clamp_notice();
        true
    }

    /// Sets the price paid at maturity, percent of par.
    pub fn set_redemption_price(&mut self, price: f64) -> bool {
        self.try_set_redemption_price(price).is_ok()
    }

    /// Like [`Bond::set_redemption_price`], with the reason for a
    /// rejection.
    pub fn try_set_redemption_price(&mut self, price: f64) -> BondResult<()> {
        self.check()?;
        if !price.is_finite() || price <= 0.0 {
            return Err(BondError::InvalidRedemption { price });
        }
        self.redemption_price = price;
        Ok(())
    }

    /// Sets the original face amount the sink schedule is measured
    /// against. Zero trusts the schedule.
    pub fn set_face_amount(&mut self, face: f64) -> bool {
        self.try_set_face_amount(face).is_ok()
    }

    /// Like [`Bond::set_face_amount`], with the reason for a rejection.
    pub fn try_set_face_amount(&mut self, face: f64) -> BondResult<()> {
        self.check()?;
        if !face.is_finite() || face < 0.0 {
            return Err(BondError::InvalidFaceAmount { face });
        }
        self.face_amount = face;
        Ok(())
    }

    /// Adds a call from `date` at `price`, replacing any call on that
    /// date.
    ///
    /// Fails if the date is outside `[issue, maturity)`, the price is not
    /// positive, or a put is already scheduled on the same date.
    pub fn set_call(&mut self, date: Date, price: f64) -> bool {
        self.try_set_call(date, price).is_ok()
    }

    /// Like [`Bond::set_call`], with the reason for a rejection.
    pub fn try_set_call(&mut self, date: Date, price: f64) -> BondResult<()> {
        self.check_option(Provision::Call, date, price)?;
        upsert(&mut self.calls, OptionEntry { date, price });
        Ok(())
    }

    /// Adds a put on `date` at `price`, replacing any put on that date.
    ///
    /// Fails under the same conditions as [`Bond::set_call`], with the
    /// roles of calls and puts swapped.
    pub fn set_put(&mut self, date: Date, price: f64) -> bool {
        self.try_set_put(date, price).is_ok()
    }

    /// Like [`Bond::set_put`], with the reason for a rejection.
    pub fn try_set_put(&mut self, date: Date, price: f64) -> BondResult<()> {
        self.check_option(Provision::Put, date, price)?;
        upsert(&mut self.puts, OptionEntry { date, price });
        Ok(())
    }

    fn check_option(&self, provision: Provision, date: Date, price: f64) -> BondResult<()> {
        self.check()?;
        let opposite = match provision {
            Provision::Put => &self.calls,
            _ => &self.puts,
        };
        if date < self.issue_date || date >= self.maturity || on(opposite, date).is_some() {
            return Err(BondError::ProvisionDate { provision, date });
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(BondError::ProvisionValue {
                provision,
                value: price,
            });
        }
        Ok(())
    }

    /// Adds a sink of `amount` par on `date` at par.
    pub fn set_sink(&mut self, date: Date, amount: f64) -> bool {
        self.set_sink_at_price(date, amount, PAR)
    }

    /// Adds a sink of `amount` par on `date` at `price`.
    ///
    /// The date must lie in `(issue, maturity]`.
    pub fn set_sink_at_price(&mut self, date: Date, amount: f64, price: f64) -> bool {
        self.try_set_sink_at_price(date, amount, price).is_ok()
    }

    /// Like [`Bond::set_sink_at_price`], with the reason for a rejection.
    pub fn try_set_sink_at_price(&mut self, date: Date, amount: f64, price: f64) -> BondResult<()> {
        self.check()?;
        if date <= self.issue_date || date > self.maturity {
            return Err(BondError::ProvisionDate {
                provision: Provision::Sink,
                date,
            });
        }
        for value in [amount, price] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BondError::ProvisionValue {
                    provision: Provision::Sink,
                    value,
                });
            }
        }
        upsert(&mut self.sinks, SinkEntry { date, amount, price });
        Ok(())
    }

    /// Changes the coupon to `rate` percent for periods starting on or
    /// after `date`.
    pub fn set_coupon(&mut self, date: Date, rate: f64) -> bool {
        self.try_set_coupon(date, rate).is_ok()
    }

    /// Like [`Bond::set_coupon`], with the reason for a rejection.
    pub fn try_set_coupon(&mut self, date: Date, rate: f64) -> BondResult<()> {
        self.check()?;
        if date <= self.issue_date || date >= self.maturity {
            return Err(BondError::ProvisionDate {
                provision: Provision::Coupon,
                date,
            });
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(BondError::ProvisionValue {
                provision: Provision::Coupon,
                value: rate,
            });
        }
        upsert(&mut self.coupon_steps, CouponStep { date, rate });
        Ok(())
    }

    /// Sets the option notice period in calendar days.
    ///
    /// A notice at least as long as a coupon period is shortened to one
    /// day less, with a warning.
    pub fn set_notice_period(&mut self, days: i32) -> bool {
        let Ok(days) = u32::try_from(days) else {
            return false;
        };
        if !self.is_valid() {
            return false;
        }
        self.notice_days = days;
        self.clamp_notice();
        true
    }

    fn clamp_notice(&mut self) {
        let limit = self.period_days() - 1;
        if self.notice_days > limit {
            self.status.warn(
                StatusCode::NoticePeriod,
                format!("notice of {} days shortened to {limit}", self.notice_days),
            );
            self.notice_days = limit;
        }
    }

    fn period_days(&self) -> u32 {
        self.frequency.months_per_period().map_or(360, |m| m * 30)
    }

    /// Makes calls exercisable at any time (`true`) or only on call dates.
    pub fn set_call_american(&mut self, american: bool) -> bool {
        if !self.is_valid() {
            return false;
        }
        self.call_american = american;
        true
    }

    /// Makes puts exercisable at any time (`true`) or only on put dates.
    pub fn set_put_american(&mut self, american: bool) -> bool {
        if !self.is_valid() {
            return false;
        }
        self.put_american = american;
        true
    }

    /// Removes the call on `date`.
    pub fn remove_call(&mut self, date: Date) {
        remove_on(&mut self.calls, date);
    }

    /// Removes the put on `date`.
    pub fn remove_put(&mut self, date: Date) {
        remove_on(&mut self.puts, date);
    }

    /// Removes the sink on `date`.
    pub fn remove_sink(&mut self, date: Date) {
        remove_on(&mut self.sinks, date);
    }

    /// Removes the coupon step on `date`.
    pub fn remove_coupon(&mut self, date: Date) {
        remove_on(&mut self.coupon_steps, date);
    }

    // ---- accessors ----------------------------------------------------

    /// Identification label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Initial (dated) date.
    #[must_use]
    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Initial coupon in percent.
    #[must_use]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Coupon in effect for a period starting on `date`.
    #[must_use]
    pub fn coupon_on(&self, date: Date) -> f64 {
        in_effect(&self.coupon_steps, date).map_or(self.coupon, |s| s.rate)
    }

    /// Day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Maturity redemption price.
    #[must_use]
    pub fn redemption_price(&self) -> f64 {
        self.redemption_price
    }

    /// Face amount, zero when the sink schedule is trusted.
    #[must_use]
    pub fn face_amount(&self) -> f64 {
        self.face_amount
    }

    /// Coupon steps in date order.
    #[must_use]
    pub fn coupon_steps(&self) -> &[CouponStep] {
        &self.coupon_steps
    }

    /// Call schedule in date order.
    #[must_use]
    pub fn calls(&self) -> &[OptionEntry] {
        &self.calls
    }

    /// Put schedule in date order.
    #[must_use]
    pub fn puts(&self) -> &[OptionEntry] {
        &self.puts
    }

    /// Sink schedule in date order.
    #[must_use]
    pub fn sinks(&self) -> &[SinkEntry] {
        &self.sinks
    }

    /// Option notice period in days.
    #[must_use]
    pub fn notice_days(&self) -> u32 {
        self.notice_days
    }

    /// True if calls are American.
    #[must_use]
    pub fn call_american(&self) -> bool {
        self.call_american
    }

    /// True if puts are American.
    #[must_use]
    pub fn put_american(&self) -> bool {
        self.put_american
    }

    /// True if the bond has a call schedule.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        !self.calls.is_empty()
    }

    /// True if the bond has a put schedule.
    #[must_use]
    pub fn is_putable(&self) -> bool {
        !self.puts.is_empty()
    }

    /// True if the bond has a sinking fund.
    #[must_use]
    pub fn has_sinking_fund(&self) -> bool {
        !self.sinks.is_empty()
    }

    /// Call price if the bond can be called on `date`.
    #[must_use]
    pub fn call_price_on(&self, date: Date) -> Option<f64> {
        Self::exercise_price(&self.calls, self.call_american, date)
    }

    /// Put price if the bond can be put on `date`.
    #[must_use]
    pub fn put_price_on(&self, date: Date) -> Option<f64> {
        Self::exercise_price(&self.puts, self.put_american, date)
    }

    fn exercise_price(schedule: &[OptionEntry], american: bool, date: Date) -> Option<f64> {
        let entry = if american {
            in_effect(schedule, date)
        } else {
            on(schedule, date)
        };
        entry.map(|e| e.price)
    }

    // ---- cash flows ---------------------------------------------------

    /// Coupon periods from the initial date to maturity.
    pub fn periods(&self) -> BondResult<Vec<CouponPeriod>> {
        self.check()?;
        coupon_periods(
            self.issue_date,
            self.maturity,
            self.frequency,
            self.coupon,
            &self.coupon_steps,
        )
    }

    /// Accrued interest per 100 par on `date`; zero outside the bond's
    /// life.
    pub fn accrued_on(&self, date: Date) -> BondResult<f64> {
        if date <= self.issue_date || date >= self.maturity {
            return Ok(0.0);
        }
        let periods = self.periods()?;
        Ok(periods
            .iter()
            .find(|p| p.end > date)
            .map_or(0.0, |p| {
                AccruedInterestCalculator::accrued(p, date, self.day_count, self.frequency)
            }))
    }

    /// Days accrued on `date` under the bond's day count.
    pub fn accrued_days_on(&self, date: Date) -> BondResult<i64> {
        if date <= self.issue_date || date >= self.maturity {
            return Ok(0);
        }
        let periods = self.periods()?;
        Ok(periods
            .iter()
            .find(|p| p.end > date)
            .map_or(0, |p| self.day_count.day_count(p.start, date)))
    }

    /// Events after `pv_date`; see [`CashFlowSchedule::generate`].
    pub fn cash_flows(
        &self,
        pv_date: Date,
        sinking: &SinkingFundStatus,
        status: &mut Status,
    ) -> BondResult<CashFlowSchedule> {
        CashFlowSchedule::generate(self, pv_date, sinking, status)
    }

    /// The construction error as a diagnostic, if any.
    #[must_use]
    pub fn error_diagnostic(&self) -> Option<&Diagnostic> {
        self.status.error_diagnostic()
    }
}

impl HasStatus for Bond {
    fn status(&self) -> &Status {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn bond() -> Bond {
        Bond::new("test", date(2020, 1, 15), date(2030, 1, 15), 7.0)
    }

    #[test]
    fn test_defaults() {
        let b = bond();
        assert!(b.is_valid());
        assert_eq!(b.error(), StatusCode::None);
        assert_eq!(b.day_count(), DayCountConvention::Thirty360);
        assert_eq!(b.frequency(), Frequency::SemiAnnual);
        assert_eq!(b.notice_days(), 30);
        assert!(b.call_american());
        assert!(!b.put_american());
        assert_relative_eq!(b.redemption_price(), 100.0);
    }

    #[test]
    fn test_invalid_construction() {
        let b = Bond::new("bad", date(2030, 1, 15), date(2020, 1, 15), 7.0);
        assert_eq!(b.error(), StatusCode::Maturity);
        assert!(!b.clone().set_frequency(Frequency::Annual));
        assert!(b.periods().is_err());

        let b = Bond::new("bad", date(2020, 1, 15), date(2030, 1, 15), -1.0);
        assert_eq!(b.error(), StatusCode::Coupon);
        assert!(Bond::try_new("bad", date(2020, 1, 15), date(2030, 1, 15), f64::NAN).is_err());
    }

    #[test]
    fn test_option_dates_must_lie_in_life() {
        let mut b = bond();
        assert!(b.set_call(date(2020, 1, 15), 103.0));
        assert!(b.set_call(date(2025, 1, 15), 100.0));
        assert!(!b.set_call(date(2030, 1, 15), 100.0));
        assert!(!b.set_call(date(2019, 1, 15), 100.0));
        assert!(!b.set_call(date(2026, 1, 15), 0.0));
        assert_eq!(b.calls().len(), 2);

        assert!(b.set_put(date(2027, 1, 15), 100.0));
        assert!(!b.set_put(date(2025, 1, 15), 100.0));
        assert!(!b.set_call(date(2027, 1, 15), 100.0));

        b.remove_call(date(2025, 1, 15));
        assert!(b.set_put(date(2025, 1, 15), 100.0));
    }

    #[test]
    fn test_exercise_prices() {
        let mut b = bond();
        b.set_call(date(2025, 1, 15), 102.0);
        b.set_call(date(2027, 1, 15), 100.0);
        b.set_put(date(2026, 1, 15), 99.0);

        assert_eq!(b.call_price_on(date(2024, 12, 31)), None);
        assert_eq!(b.call_price_on(date(2026, 6, 1)), Some(102.0));
        assert_eq!(b.call_price_on(date(2028, 6, 1)), Some(100.0));
        assert_eq!(b.put_price_on(date(2026, 1, 15)), Some(99.0));
        assert_eq!(b.put_price_on(date(2026, 1, 16)), None);

        b.set_call_american(false);
        assert_eq!(b.call_price_on(date(2026, 6, 1)), None);
        assert_eq!(b.call_price_on(date(2025, 1, 15)), Some(102.0));
    }

    #[test]
    fn test_sinks_and_steps() {
        let mut b = bond();
        assert!(!b.set_sink(date(2020, 1, 15), 10.0));
        assert!(b.set_sink(date(2030, 1, 15), 10.0));
        assert!(!b.set_sink(date(2028, 1, 15), -5.0));
        assert!(b.set_sink_at_price(date(2028, 1, 15), 5.0, 101.0));
        assert_eq!(b.sinks()[0].date, date(2028, 1, 15));
        assert!(b.has_sinking_fund());
        b.remove_sink(date(2028, 1, 15));
        assert_eq!(b.sinks().len(), 1);

        assert!(b.set_coupon(date(2025, 1, 15), 8.0));
        assert!(!b.set_coupon(date(2030, 1, 15), 8.0));
        assert_relative_eq!(b.coupon_on(date(2024, 7, 15)), 7.0);
        assert_relative_eq!(b.coupon_on(date(2025, 1, 15)), 8.0);
        b.remove_coupon(date(2025, 1, 15));
        assert_relative_eq!(b.coupon_on(date(2029, 1, 15)), 7.0);
    }

    #[test]
    fn test_notice_period() {
        let mut b = bond();
        assert!(!b.set_notice_period(-1));
        assert!(b.set_notice_period(0));
        assert_eq!(b.notice_days(), 0);
        assert!(b.set_notice_period(400));
        assert_eq!(b.notice_days(), 179);
        assert!(b.status().has_warning(StatusCode::NoticePeriod));
    }

    #[test]
    fn test_accrued_on() {
        let b = bond();
        assert_relative_eq!(b.accrued_on(date(2021, 4, 15)).unwrap(), 7.0 * 90.0 / 360.0, epsilon = 1e-12);
        assert_eq!(b.accrued_days_on(date(2021, 4, 15)).unwrap(), 90);
        assert_relative_eq!(b.accrued_on(date(2021, 7, 15)).unwrap(), 0.0);
        assert_relative_eq!(b.accrued_on(date(2031, 1, 1)).unwrap(), 0.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut b = bond();
        b.set_call(date(2025, 1, 15), 100.0);
        let json = serde_json::to_string(&b).unwrap();
        let back: Bond = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_deserialized_bond_is_revalidated() {
        let mut b = bond();
        b.set_call(date(2025, 1, 15), 100.0);
        let mut json = serde_json::to_value(&b).unwrap();

        // call after maturity
        json["calls"][0]["date"] = serde_json::json!("2035-01-01");
        let back: Bond = serde_json::from_value(json.clone()).unwrap();
        assert!(!back.is_valid());
        assert_eq!(back.error(), StatusCode::OptionDate);
        assert!(back.periods().is_err());

        // the constructor's own checks run first
        json["coupon"] = serde_json::json!(-40.0);
        let back: Bond = serde_json::from_value(json).unwrap();
        assert_eq!(back.error(), StatusCode::Coupon);

        let sinker = r#"{"name":"s","issue_date":"2020-01-15","maturity":"2030-01-15",
            "coupon":5.0,"sinks":[{"date":"2028-01-15","amount":-5.0,"price":100.0}]}"#;
        let back: Bond = serde_json::from_str(sinker).unwrap();
        assert_eq!(back.error(), StatusCode::SinkPrice);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{"name":"m","issue_date":"2020-01-15","maturity":"2030-01-15","coupon":5.0}"#;
        let back: Bond = serde_json::from_str(json).unwrap();
        assert!(back.is_valid());
        assert_eq!(back.notice_days(), DEFAULT_NOTICE_DAYS);
        assert!(back.call_american());
        assert_relative_eq!(back.redemption_price(), 100.0);
        assert_eq!(back, Bond::new("m", date(2020, 1, 15), date(2030, 1, 15), 5.0));
    }

    #[test]
    fn test_try_setters_name_the_problem() {
        let mut b = bond();
        assert_eq!(
            b.try_set_put(date(2031, 1, 15), 100.0),
            Err(BondError::ProvisionDate {
                provision: Provision::Put,
                date: date(2031, 1, 15)
            })
        );
        assert_eq!(
            b.try_set_call(date(2025, 1, 15), -1.0).unwrap_err().status_code(),
            StatusCode::OptionPrice
        );
        assert_eq!(
            b.try_set_face_amount(f64::NAN).unwrap_err().status_code(),
            StatusCode::FaceAmount
        );
        assert_eq!(
            b.try_set_coupon(date(2019, 1, 15), 5.0).unwrap_err().status_code(),
            StatusCode::Coupon
        );
        // a rejected setter leaves the bond usable
        assert!(b.is_valid());
    }
}
