//! Valuation of one bond against one model at one date.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use oasis_bonds::{Bond, CashFlowSchedule, Flow, SinkingFundStatus};
use oasis_core::auth::{authorize, Feature};
use oasis_core::{Date, HasStatus, Status, StatusCode};
use oasis_rates::{InterestRateModel, RateLattice};

use crate::config::{check_shift, EngineConfig};
use crate::duration::Duration;
use crate::engine::BackwardInduction;
use crate::error::{ValueError, ValueResult};
use crate::quote::Quote;
use crate::yields::{check_yield, Workout, YieldFlows};

/// Returned by the sentinel methods when a number cannot be computed.
pub const BAD_VALUE: f64 = -1.0e30;

/// Price residual above which a solved OAS draws a warning.
const OAS_RESIDUAL_WARNING: f64 = 1e-6;

#[derive(Debug, Clone)]
struct Prepared {
    schedule: CashFlowSchedule,
    induction: BackwardInduction,
}

/// A bond valued against an interest rate model as of a date.
///
/// The bond's flows are generated once, when the valuation is created or
/// reset. Lattice prices are cached per OAS, and curves shifted for
/// effective duration are solved once per shift.
///
/// Every query starts from the status left by setup: a setup error makes
/// every query fail with that error, and setup warnings are repeated.
/// Queries come in two styles. The `try_*` methods take a [`Quote`] and
/// return a [`ValueResult`]; the others take plain numbers and return
/// [`BAD_VALUE`] on failure. Both record the outcome in
/// [`status`](HasStatus::status).
///
/// # Example
///
/// ```rust
/// use oasis_bonds::Bond;
/// use oasis_core::Date;
/// use oasis_rates::{CurveInput, InterestRateModel};
/// use oasis_value::{Quote, Value};
///
/// let mut model = InterestRateModel::new(CurveInput::Par);
/// model.set_rate(1.0, 6.0);
/// model.set_rate(30.0, 6.0);
/// model.set_volatility(10.0);
/// model.solve().unwrap();
///
/// let issue = Date::from_ymd(2020, 1, 15).unwrap();
/// let maturity = Date::from_ymd(2030, 1, 15).unwrap();
/// let mut bond = Bond::new("10y 6%", issue, maturity, 6.0);
/// bond.set_call(Date::from_ymd(2025, 1, 15).unwrap(), 100.0);
///
/// let mut value = Value::new(&bond, &model, issue);
/// let price = value.price(25.0);
/// let oas = value.try_oas(Quote::Price(price)).unwrap();
/// assert!((oas - 25.0).abs() < 1e-6);
/// assert!(value.option_value(25.0) < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    bond: Bond,
    sinking: SinkingFundStatus,
    pv_date: Date,
    model: Option<InterestRateModel>,
    config: EngineConfig,
    prepared: Result<Prepared, ValueError>,
    prices: HashMap<(u64, bool), f64>,
    shifted: HashMap<u64, InterestRateModel>,
    setup_status: Status,
    status: Status,
}

impl Value {
    /// Values `bond` against `model` as of `pv_date`.
    #[must_use]
    pub fn new(bond: &Bond, model: &InterestRateModel, pv_date: Date) -> Self {
        Self::build(
            bond,
            SinkingFundStatus::default(),
            pv_date,
            Some(model.clone()),
        )
    }

    /// Values a sinking fund bond with a known outstanding amount.
    #[must_use]
    pub fn with_sinking_fund(
        bond: &Bond,
        model: &InterestRateModel,
        sinking: &SinkingFundStatus,
        pv_date: Date,
    ) -> Self {
        Self::build(bond, *sinking, pv_date, Some(model.clone()))
    }

    /// A valuation for accrued interest, flows and yields only.
    ///
    /// Lattice queries fail until [`set_model`](Self::set_model) is called.
    #[must_use]
    pub fn without_model(bond: &Bond, pv_date: Date) -> Self {
        Self::build(bond, SinkingFundStatus::default(), pv_date, None)
    }

    /// Replaces the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self.prepare();
        self
    }

    /// Seeds the duration cache with `model`, already solved for a
    /// parallel shift of `bp` basis points.
    ///
    /// Ignored unless its lattice spans the same horizon as the bound
    /// model's.
    #[must_use]
    pub fn with_shifted_model(mut self, bp: f64, model: &InterestRateModel) -> Self {
        let horizon = |m: &InterestRateModel| m.lattice().map(RateLattice::horizon).ok();
        let base = self.model.as_ref().and_then(horizon);
        if base.is_some() && base == horizon(model) {
            self.shifted.insert(bp.to_bits(), model.clone());
        }
        self
    }

    fn build(
        bond: &Bond,
        sinking: SinkingFundStatus,
        pv_date: Date,
        model: Option<InterestRateModel>,
    ) -> Self {
        let mut value = Self {
            bond: bond.clone(),
            sinking,
            pv_date,
            model,
            config: EngineConfig::default(),
            prepared: Err(ValueError::NoModel),
            prices: HashMap::new(),
            shifted: HashMap::new(),
            setup_status: Status::new(),
            status: Status::new(),
        };
        value.prepare();
        value
    }

    /// Rebinds the valuation to another bond and date.
    pub fn reset(&mut self, bond: &Bond, pv_date: Date) {
        self.reset_with_sinking_fund(bond, &SinkingFundStatus::default(), pv_date);
    }

    /// Rebinds the valuation to another sinking fund bond and date.
    pub fn reset_with_sinking_fund(
        &mut self,
        bond: &Bond,
        sinking: &SinkingFundStatus,
        pv_date: Date,
    ) {
        self.bond = bond.clone();
        self.sinking = *sinking;
        self.pv_date = pv_date;
        self.prepare();
    }

    /// Rebinds the valuation to another model.
    pub fn set_model(&mut self, model: &InterestRateModel) {
        self.model = Some(model.clone());
        self.prepare();
    }

    fn prepare(&mut self) {
        self.prices.clear();
        self.shifted.clear();

        let mut status = Status::new();
        let prepared = self.generate(&mut status);
        match &prepared {
            Ok(p) => log::debug!(
                "{}: valuation at {} with {} flows",
                self.bond.name(),
                self.pv_date,
                p.schedule.len()
            ),
            Err(err) => {
                log::debug!(
                    "{}: valuation at {} not set up: {err}",
                    self.bond.name(),
                    self.pv_date
                );
                status.set_error(err.status_code(), err.to_string());
            }
        }
        if let Ok(p) = &prepared {
            self.cover(p.induction.final_time());
        }
        self.prepared = prepared;
        self.status = status.clone();
        self.setup_status = status;
    }

    /// Swaps in a model whose lattice reaches `years`, when the bound one
    /// is solved but too short. Failures surface on the first lattice
    /// query.
    fn cover(&mut self, years: f64) {
        let Some(model) = &self.model else {
            return;
        };
        if !model.is_solved() {
            return;
        }
        match model.covering(years) {
            Ok(longer) => self.model = Some(longer),
            Err(err) => log::debug!("{}: lattice not extended: {err}", self.bond.name()),
        }
    }

    fn generate(&self, status: &mut Status) -> ValueResult<Prepared> {
        authorize(Feature::Valuation)?;
        self.config.validate()?;
        let schedule = self.bond.cash_flows(self.pv_date, &self.sinking, status)?;
        let induction = BackwardInduction::new(&schedule);
        Ok(Prepared {
            schedule,
            induction,
        })
    }

    // ---- accessors ----

    /// The bond being valued.
    #[must_use]
    pub fn bond(&self) -> &Bond {
        &self.bond
    }

    /// The valuation date.
    #[must_use]
    pub fn pv_date(&self) -> Date {
        self.pv_date
    }

    /// The model, if one is bound.
    #[must_use]
    pub fn model(&self) -> Option<&InterestRateModel> {
        self.model.as_ref()
    }

    /// The sinking fund status in use.
    #[must_use]
    pub fn sinking_fund(&self) -> &SinkingFundStatus {
        &self.sinking
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- Result-style queries ----

    /// Clean price per 100 outstanding for any quote.
    pub fn try_price(&mut self, quote: Quote) -> ValueResult<f64> {
        self.query(|v| v.quote_to_price(quote))
    }

    /// OAS in basis points for any quote.
    pub fn try_oas(&mut self, quote: Quote) -> ValueResult<f64> {
        self.query(|v| v.quote_to_oas(quote))
    }

    /// Value of the embedded options to the holder: the price with
    /// exercise less the straight price, at the quote's OAS.
    ///
    /// Negative for calls, positive for puts.
    pub fn try_option_value(&mut self, quote: Quote) -> ValueResult<f64> {
        self.query(|v| {
            let oas = v.quote_to_oas(quote)?;
            Ok(v.dirty(oas, true)? - v.dirty(oas, false)?)
        })
    }

    /// Effective duration and convexity with the configured shift.
    pub fn try_effective_duration(&mut self, quote: Quote) -> ValueResult<Duration> {
        let bp = self.config.duration_shift_bp;
        self.try_effective_duration_with_shift(quote, bp)
    }

    /// Effective duration and convexity for a parallel shift of `bp`
    /// basis points in the model's input curve.
    pub fn try_effective_duration_with_shift(
        &mut self,
        quote: Quote,
        bp: f64,
    ) -> ValueResult<Duration> {
        self.query(|v| {
            let (base, up, down) = v.shifted_prices(quote, bp)?;
            Ok(Duration::from_prices(base, up, down, bp / 10_000.0))
        })
    }

    /// Duration from the upward shift alone.
    pub fn try_up_duration(&mut self, quote: Quote) -> ValueResult<f64> {
        let bp = self.config.duration_shift_bp;
        self.query(|v| {
            let (base, up, _) = v.shifted_prices(quote, bp)?;
            Ok((base - up) / (base * bp / 10_000.0))
        })
    }

    /// Duration from the downward shift alone.
    pub fn try_down_duration(&mut self, quote: Quote) -> ValueResult<f64> {
        let bp = self.config.duration_shift_bp;
        self.query(|v| {
            let (base, _, down) = v.shifted_prices(quote, bp)?;
            Ok((down - base) / (base * bp / 10_000.0))
        })
    }

    /// Yield to maturity in percent for any quote.
    pub fn try_yield_to_maturity(&mut self, quote: Quote) -> ValueResult<f64> {
        self.try_yield(quote, Workout::Maturity)
    }

    /// Yield to the first call after the notice period.
    pub fn try_yield_to_call(&mut self, quote: Quote) -> ValueResult<f64> {
        self.try_yield(quote, Workout::Call)
    }

    /// Yield to the first put after the notice period.
    pub fn try_yield_to_put(&mut self, quote: Quote) -> ValueResult<f64> {
        self.try_yield(quote, Workout::Put)
    }

    /// Yield in percent to `workout` for any quote.
    pub fn try_yield(&mut self, quote: Quote, workout: Workout) -> ValueResult<f64> {
        self.query(|v| match (quote, workout) {
            (Quote::Ytm(y), Workout::Maturity)
            | (Quote::Ytc(y), Workout::Call)
            | (Quote::Ytp(y), Workout::Put) => {
                check_yield(y)?;
                Ok(y)
            }
            _ => {
                let price = v.quote_to_price(quote)?;
                v.price_to_yield(price, workout)
            }
        })
    }

    /// Accrued interest per 100 outstanding.
    pub fn try_accrued(&mut self) -> ValueResult<f64> {
        self.query(|v| Ok(v.prepared()?.schedule.accrued))
    }

    /// Days of accrued interest under the bond's day count.
    pub fn try_accrued_days(&mut self) -> ValueResult<i64> {
        self.query(|v| Ok(v.prepared()?.schedule.accrued_days))
    }

    /// The complete flow schedule.
    pub fn cash_flows(&mut self) -> ValueResult<&CashFlowSchedule> {
        self.status = self.setup_status.clone();
        self.prepared
            .as_ref()
            .map(|p| &p.schedule)
            .map_err(|e| ValueError::Setup(e.to_diagnostic()))
    }

    /// Remaining flows, per 100 outstanding at the valuation date.
    pub fn flows(&mut self) -> ValueResult<&[Flow]> {
        self.cash_flows().map(|s| s.flows.as_slice())
    }

    // ---- sentinel queries ----

    /// Clean price at `oas` basis points, or [`BAD_VALUE`].
    pub fn price(&mut self, oas: f64) -> f64 {
        self.try_price(Quote::Oas(oas)).unwrap_or(BAD_VALUE)
    }

    /// OAS in basis points reproducing clean `price`, or [`BAD_VALUE`].
    pub fn oas(&mut self, price: f64) -> f64 {
        self.try_oas(Quote::Price(price)).unwrap_or(BAD_VALUE)
    }

    /// Clean price for a quote, or [`BAD_VALUE`].
    pub fn price_from(&mut self, quote: Quote) -> f64 {
        self.try_price(quote).unwrap_or(BAD_VALUE)
    }

    /// OAS for a quote, or [`BAD_VALUE`].
    pub fn oas_from(&mut self, quote: Quote) -> f64 {
        self.try_oas(quote).unwrap_or(BAD_VALUE)
    }

    /// Option value at `oas`, or [`BAD_VALUE`].
    pub fn option_value(&mut self, oas: f64) -> f64 {
        self.try_option_value(Quote::Oas(oas)).unwrap_or(BAD_VALUE)
    }

    /// Effective duration and convexity at `oas`; both fields are
    /// [`BAD_VALUE`] on failure.
    pub fn effective_duration(&mut self, oas: f64) -> Duration {
        self.try_effective_duration(Quote::Oas(oas))
            .unwrap_or(Duration::new(BAD_VALUE, BAD_VALUE))
    }

    /// Upward-shift duration at `oas`, or [`BAD_VALUE`].
    pub fn up_duration(&mut self, oas: f64) -> f64 {
        self.try_up_duration(Quote::Oas(oas)).unwrap_or(BAD_VALUE)
    }

    /// Downward-shift duration at `oas`, or [`BAD_VALUE`].
    pub fn down_duration(&mut self, oas: f64) -> f64 {
        self.try_down_duration(Quote::Oas(oas)).unwrap_or(BAD_VALUE)
    }

    /// Accrued interest, or [`BAD_VALUE`].
    pub fn accrued(&mut self) -> f64 {
        self.try_accrued().unwrap_or(BAD_VALUE)
    }

    /// Yield to maturity at clean `price`, or [`BAD_VALUE`].
    pub fn yield_to_maturity(&mut self, price: f64) -> f64 {
        self.try_yield_to_maturity(Quote::Price(price))
            .unwrap_or(BAD_VALUE)
    }

    /// Yield to call at clean `price`, or [`BAD_VALUE`].
    pub fn yield_to_call(&mut self, price: f64) -> f64 {
        self.try_yield_to_call(Quote::Price(price))
            .unwrap_or(BAD_VALUE)
    }

    /// Yield to put at clean `price`, or [`BAD_VALUE`].
    pub fn yield_to_put(&mut self, price: f64) -> f64 {
        self.try_yield_to_put(Quote::Price(price))
            .unwrap_or(BAD_VALUE)
    }

    /// Clean price at a yield to maturity, or [`BAD_VALUE`].
    pub fn ytm_to_price(&mut self, yield_pct: f64) -> f64 {
        self.try_price(Quote::Ytm(yield_pct)).unwrap_or(BAD_VALUE)
    }

    /// Clean price at a yield to call, or [`BAD_VALUE`].
    pub fn ytc_to_price(&mut self, yield_pct: f64) -> f64 {
        self.try_price(Quote::Ytc(yield_pct)).unwrap_or(BAD_VALUE)
    }

    /// Clean price at a yield to put, or [`BAD_VALUE`].
    pub fn ytp_to_price(&mut self, yield_pct: f64) -> f64 {
        self.try_price(Quote::Ytp(yield_pct)).unwrap_or(BAD_VALUE)
    }

    // ---- internals ----

    fn query<T>(&mut self, op: impl FnOnce(&mut Self) -> ValueResult<T>) -> ValueResult<T> {
        self.status = self.setup_status.clone();
        let result = op(self);
        if let Err(err) = &result {
            log::debug!("{}: {err}", self.bond.name());
            self.status.set_error(err.status_code(), err.to_string());
        }
        result
    }

    fn prepared(&self) -> ValueResult<&Prepared> {
        self.prepared
            .as_ref()
            .map_err(|e| ValueError::Setup(e.to_diagnostic()))
    }

    fn lattice(&self) -> ValueResult<&RateLattice> {
        Ok(self.model.as_ref().ok_or(ValueError::NoModel)?.lattice()?)
    }

    fn accrued_amount(&self) -> ValueResult<f64> {
        Ok(self.prepared()?.schedule.accrued)
    }

    /// Dirty lattice value at `oas`, with or without exercise.
    fn dirty(&mut self, oas: f64, exercise: bool) -> ValueResult<f64> {
        if !oas.is_finite() {
            return Err(ValueError::InvalidOas { oas });
        }
        let key = (oas.to_bits(), exercise);
        if let Some(&cached) = self.prices.get(&key) {
            return Ok(cached);
        }
        let value = self
            .prepared()?
            .induction
            .dirty_price(self.lattice()?, oas, exercise)?;
        if !value.is_finite() {
            return Err(ValueError::ComputePrice { oas });
        }
        self.prices.insert(key, value);
        Ok(value)
    }

    fn quote_to_price(&mut self, quote: Quote) -> ValueResult<f64> {
        match quote {
            Quote::Oas(oas) => Ok(self.dirty(oas, true)? - self.accrued_amount()?),
            Quote::Price(price) => {
                check_price(price)?;
                Ok(price)
            }
            Quote::Ytm(y) => self.yield_to_clean(y, Workout::Maturity),
            Quote::Ytc(y) => self.yield_to_clean(y, Workout::Call),
            Quote::Ytp(y) => self.yield_to_clean(y, Workout::Put),
        }
    }

    fn quote_to_oas(&mut self, quote: Quote) -> ValueResult<f64> {
        match quote {
            Quote::Oas(oas) if oas.is_finite() => Ok(oas),
            Quote::Oas(oas) => Err(ValueError::InvalidOas { oas }),
            other => {
                let price = self.quote_to_price(other)?;
                self.solve_oas(price)
            }
        }
    }

    fn solve_oas(&mut self, price: f64) -> ValueResult<f64> {
        check_price(price)?;
        let target = price + self.accrued_amount()?;
        let solver = self.config.solver;

        let result = {
            let induction = &self.prepared()?.induction;
            let lattice = self.lattice()?;
            // lattice errors do not depend on the spread
            induction.dirty_price(lattice, solver.min_bp, true)?;
            solver.find_root(|oas| {
                induction
                    .dirty_price(lattice, oas, true)
                    .map_or(f64::NAN, |p| p - target)
            })
        };
        let result = result.map_err(|e| ValueError::ComputeOas {
            price,
            reason: e.to_string(),
        })?;

        if result.residual.abs() > OAS_RESIDUAL_WARNING {
            self.status.warn(
                StatusCode::ImperfectOas,
                format!(
                    "OAS {:.4}bp misses price {price} by {:.2e}",
                    result.root, result.residual
                ),
            );
        }
        log::trace!(
            "{}: OAS {:.6}bp for price {price} in {} iterations",
            self.bond.name(),
            result.root,
            result.iterations
        );
        Ok(result.root)
    }

    fn yield_flows(&self, workout: Workout) -> ValueResult<(YieldFlows, f64)> {
        let schedule = &self.prepared()?.schedule;
        let flows = YieldFlows::new(schedule, workout, self.bond.frequency())?;
        Ok((flows, schedule.accrued))
    }

    fn yield_to_clean(&self, yield_pct: f64, workout: Workout) -> ValueResult<f64> {
        check_yield(yield_pct)?;
        let (flows, accrued) = self.yield_flows(workout)?;
        Ok(flows.dirty_price(yield_pct) - accrued)
    }

    fn price_to_yield(&self, price: f64, workout: Workout) -> ValueResult<f64> {
        check_price(price)?;
        let (flows, accrued) = self.yield_flows(workout)?;
        flows.solve(price + accrued, self.bond.coupon(), &self.config.solver.solver())
    }

    /// Dirty prices at the quote's OAS on the base curve and the curve
    /// shifted up and down by `bp`.
    fn shifted_prices(&mut self, quote: Quote, bp: f64) -> ValueResult<(f64, f64, f64)> {
        check_shift(bp)?;
        let oas = self.quote_to_oas(quote)?;
        let base = self.dirty(oas, true)?;
        if !(base > 0.0) {
            return Err(ValueError::ComputePrice { oas });
        }
        let up = self.shifted_dirty(bp, oas)?;
        let down = self.shifted_dirty(-bp, oas)?;
        log::debug!(
            "{}: shift {bp}bp at OAS {oas:.4}bp: {up:.6} / {base:.6} / {down:.6}",
            self.bond.name()
        );
        Ok((base, up, down))
    }

    fn shifted_dirty(&mut self, bp: f64, oas: f64) -> ValueResult<f64> {
        let base = self.model.as_ref().ok_or(ValueError::NoModel)?;
        let induction = &self
            .prepared
            .as_ref()
            .map_err(|e| ValueError::Setup(e.to_diagnostic()))?
            .induction;
        let model = match self.shifted.entry(bp.to_bits()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut model = base.shifted(bp);
                model.solve()?;
                entry.insert(model)
            }
        };
        let value = induction.dirty_price(model.lattice()?, oas, true)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValueError::ComputePrice { oas })
        }
    }
}

impl HasStatus for Value {
    fn status(&self) -> &Status {
        &self.status
    }
}

fn check_price(price: f64) -> ValueResult<()> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ValueError::InvalidPrice { price })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use oasis_rates::{CurveInput, LatticeConfig};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat_model(rate: f64, volatility: f64) -> InterestRateModel {
        let mut model = InterestRateModel::new(CurveInput::Par);
        model.set_rate(0.5, rate);
        model.set_rate(30.0, rate);
        model.set_volatility(volatility);
        model.solve().unwrap();
        model
    }

    fn bullet() -> Bond {
        Bond::new("bullet", date(2020, 1, 15), date(2030, 1, 15), 6.0)
    }

    #[test]
    fn test_price_and_oas_round_trip() {
        let model = flat_model(6.0, 12.0);
        let mut value = Value::new(&bullet(), &model, date(2020, 1, 15));

        let par = value.price(0.0);
        assert_relative_eq!(par, 100.0, epsilon = 0.05);
        assert!(value.status().is_ok());

        let cheap = value.price(50.0);
        assert!(cheap < par);
        assert_relative_eq!(value.oas(cheap), 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_long_bond_extends_lattice() {
        let model = flat_model(5.0, 0.0);
        let issue = date(2020, 1, 15);
        let long = Bond::new("50y", issue, date(2070, 1, 15), 5.0);

        let mut value = Value::new(&long, &model, issue);
        assert!(value.model().unwrap().lattice().unwrap().horizon() >= 50.0);
        assert_relative_eq!(value.price(0.0), 100.0, epsilon = 0.01);
        assert!(value.status().is_ok());
        assert!(value.effective_duration(0.0).duration > 0.0);

        // the caller's model is left alone
        assert_relative_eq!(model.lattice().unwrap().horizon(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_seeded_shift_models_are_used() {
        let model = flat_model(6.0, 10.0);
        let pv = date(2020, 1, 15);
        let fresh = Value::new(&bullet(), &model, pv).effective_duration(0.0);

        let mut up = model.shifted(30.0);
        up.solve().unwrap();
        let mut down = model.shifted(-30.0);
        down.solve().unwrap();
        let seeded = Value::new(&bullet(), &model, pv)
            .with_shifted_model(30.0, &up)
            .with_shifted_model(-30.0, &down)
            .effective_duration(0.0);
        assert_relative_eq!(seeded.duration, fresh.duration, epsilon = 1e-12);
        assert_relative_eq!(seeded.convexity, fresh.convexity, epsilon = 1e-12);

        // seeded models are taken as given
        let mut wide = model.shifted(100.0);
        wide.solve().unwrap();
        let skewed = Value::new(&bullet(), &model, pv)
            .with_shifted_model(30.0, &wide)
            .effective_duration(0.0);
        assert!((skewed.duration - fresh.duration).abs() > 0.1);

        // a model on a different lattice is not taken
        let mut short = model
            .shifted(30.0)
            .with_config(LatticeConfig::default().with_horizon_years(35.0));
        short.solve().unwrap();
        let ignored = Value::new(&bullet(), &model, pv)
            .with_shifted_model(30.0, &short)
            .effective_duration(0.0);
        assert_relative_eq!(ignored.duration, fresh.duration, epsilon = 1e-12);
    }

    #[test]
    fn test_accrued_between_coupons() {
        let model = flat_model(6.0, 0.0);
        let mut value = Value::new(&bullet(), &model, date(2020, 3, 15));
        assert_relative_eq!(value.accrued(), 1.0, epsilon = 1e-12);
        assert_eq!(value.try_accrued_days().unwrap(), 60);
    }

    #[test]
    fn test_setup_error_is_sticky() {
        let model = flat_model(6.0, 10.0);
        let mut value = Value::new(&bullet(), &model, date(2019, 1, 1));
        assert_eq!(value.status().error(), StatusCode::PvDate);

        assert_eq!(value.price(0.0), BAD_VALUE);
        assert_eq!(value.status().error(), StatusCode::PvDate);
        assert!(matches!(
            value.try_accrued(),
            Err(ValueError::Setup(d)) if d.code == StatusCode::PvDate
        ));

        value.reset(&bullet(), date(2021, 1, 15));
        assert!(value.status().is_ok());
        assert!(value.price(0.0) > 0.0);
    }

    #[test]
    fn test_without_model() {
        let mut value = Value::without_model(&bullet(), date(2020, 1, 15));
        assert!(value.status().is_ok());
        assert_relative_eq!(value.yield_to_maturity(100.0), 6.0, epsilon = 1e-8);

        assert_eq!(value.price(0.0), BAD_VALUE);
        assert_eq!(value.status().error(), StatusCode::Model);

        // a successful query clears the previous error
        assert_relative_eq!(value.ytm_to_price(6.0), 100.0, epsilon = 1e-9);
        assert!(value.status().is_ok());

        value.set_model(&flat_model(6.0, 0.0));
        assert!(value.price(0.0) > 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let model = flat_model(6.0, 10.0);
        let mut value = Value::new(&bullet(), &model, date(2020, 1, 15));

        assert_eq!(value.oas(-5.0), BAD_VALUE);
        assert_eq!(value.status().error(), StatusCode::Price);

        assert_eq!(value.price(f64::NAN), BAD_VALUE);
        assert_eq!(value.status().error(), StatusCode::Oas);

        assert!(matches!(
            value.try_effective_duration_with_shift(Quote::Oas(0.0), 500.0),
            Err(ValueError::DurationShift { .. })
        ));
        assert_eq!(value.status().error(), StatusCode::DurationShift);

        assert_eq!(value.yield_to_call(100.0), BAD_VALUE);
        assert_eq!(value.status().error(), StatusCode::QuoteType);
    }

    #[test]
    fn test_yield_quote_passes_through() {
        let model = flat_model(6.0, 10.0);
        let mut value = Value::new(&bullet(), &model, date(2020, 1, 15));
        assert_eq!(value.try_yield_to_maturity(Quote::Ytm(5.5)).unwrap(), 5.5);

        let price = value.ytm_to_price(5.0);
        assert!(price > 100.0);
        let oas = value.try_oas(Quote::Ytm(5.0)).unwrap();
        assert_relative_eq!(value.price(oas), price, epsilon = 1e-6);
    }

    #[test]
    fn test_bullet_has_no_option_value() {
        let model = flat_model(6.0, 15.0);
        let mut value = Value::new(&bullet(), &model, date(2020, 1, 15));
        assert_relative_eq!(value.option_value(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flows_listing() {
        let model = flat_model(6.0, 0.0);
        let mut value = Value::new(&bullet(), &model, date(2020, 1, 15));
        let flows = value.flows().unwrap();
        assert_eq!(flows.len(), 20);
        assert_relative_eq!(flows[19].cash(), 103.0);
    }
}
