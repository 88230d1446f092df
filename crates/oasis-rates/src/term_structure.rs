//! The interest rate model: curve inputs, volatility and the solved lattice.

use std::sync::Arc;

use oasis_core::auth::{authorize, Feature};
use oasis_core::{HasStatus, Status, StatusCode};

use crate::compounding;
use crate::config::{LatticeConfig, MAX_HORIZON_YEARS};
use crate::curves::{CurveInput, DiscountCurve, ParCurve, TermPoint};
use crate::error::{ModelError, ModelResult};
use crate::lattice::{calibrate, RateLattice};

/// Rate in percent used when a rejected input has nothing to fall back on.
pub const DEFAULT_RATE: f64 = 5.0;

/// Highest accepted short-rate volatility in percent.
pub const MAX_VOLATILITY: f64 = 100.0;

/// Terms closer than this are the same curve point.
const TERM_EPSILON: f64 = 1e-9;

/// Output of a successful [`InterestRateModel::solve`].
#[derive(Debug)]
pub struct SolvedModel {
    /// Discount curve implied by the inputs.
    pub curve: DiscountCurve,
    /// Lattice calibrated to `curve`.
    pub lattice: RateLattice,
}

/// Term structure model.
///
/// Holds sparse (term, rate) inputs and a short-rate volatility. After a
/// successful [`solve`](Self::solve) it owns a calibrated [`RateLattice`],
/// which any mutation discards. Clones share the solved lattice.
///
/// Setters return `false` when an input is ignored. Out-of-range rates and
/// volatilities are replaced and reported as warnings in the model's
/// [`Status`].
///
/// # Example
///
/// ```rust
/// use oasis_rates::{CurveInput, InterestRateModel};
///
/// let mut model = InterestRateModel::new(CurveInput::Par);
/// assert!(model.set_rate(1.0, 5.0));
/// assert!(model.set_rate(30.0, 7.0));
/// model.set_volatility(12.0);
/// model.solve().unwrap();
///
/// assert!((model.get_rate(30.0).unwrap() - 7.0).abs() < 1e-12);
/// assert!(model.get_factor(10.0).unwrap() < 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InterestRateModel {
    input: CurveInput,
    points: Vec<TermPoint>,
    volatility: f64,
    config: LatticeConfig,
    solved: Option<Arc<SolvedModel>>,
    status: Status,
}

impl InterestRateModel {
    /// Creates an empty model for the given input type.
    #[must_use]
    pub fn new(input: CurveInput) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// Sets the lattice configuration.
    #[must_use]
    pub fn with_config(mut self, config: LatticeConfig) -> Self {
        self.config = config;
        self.solved = None;
        self
    }

    /// Returns the lattice configuration.
    #[must_use]
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Returns the input curve type.
    #[must_use]
    pub fn input_type(&self) -> CurveInput {
        self.input
    }

    /// True for a par curve model.
    #[must_use]
    pub fn is_par_curve(&self) -> bool {
        self.input == CurveInput::Par
    }

    /// Curve points sorted by term.
    #[must_use]
    pub fn points(&self) -> &[TermPoint] {
        &self.points
    }

    // ---- curve configuration ----

    /// Sets a par rate in percent (7% as `7.0`).
    ///
    /// Ignored on a factor curve or for a non-positive term. A negative rate
    /// is replaced by the current curve's rate at `term` (or
    /// [`DEFAULT_RATE`] on an empty curve) with a warning.
    pub fn set_rate(&mut self, term: f64, rate: f64) -> bool {
        if self.input != CurveInput::Par || !valid_term(term) || !rate.is_finite() {
            return false;
        }
        let rate = self.substitute_negative("rate", term, rate);
        self.insert_point(term, rate);
        true
    }

    /// Sets a discount factor on a factor curve.
    ///
    /// Ignored on a par curve, for a non-positive term or a non-positive
    /// factor.
    pub fn set_factor(&mut self, term: f64, factor: f64) -> bool {
        if self.input != CurveInput::Factor
            || !valid_term(term)
            || !factor.is_finite()
            || factor <= 0.0
        {
            return false;
        }
        self.insert_point(term, factor);
        true
    }

    /// Sets a factor curve point through a semi-annual zero rate in percent.
    ///
    /// A negative rate is replaced as in [`set_rate`](Self::set_rate).
    pub fn set_zero_rate(&mut self, term: f64, zero_rate: f64) -> bool {
        if self.input != CurveInput::Factor || !valid_term(term) || !zero_rate.is_finite() {
            return false;
        }
        let zero_rate = self.substitute_negative("zero rate", term, zero_rate);
        self.insert_point(term, compounding::zero_to_factor(zero_rate, term));
        true
    }

    /// Removes the point at `term`, if any.
    pub fn remove_point(&mut self, term: f64) {
        let before = self.points.len();
        self.points.retain(|p| (p.term - term).abs() > TERM_EPSILON);
        if self.points.len() != before {
            self.invalidate();
        }
    }

    /// Removes every curve point.
    pub fn remove_all_points(&mut self) {
        self.points.clear();
        self.invalidate();
    }

    /// Sets the short-rate volatility in percent (18% as `18.0`).
    ///
    /// Negative values become zero and values above [`MAX_VOLATILITY`] are
    /// clamped, both with a warning. Returns `false` for a non-finite value.
    pub fn set_volatility(&mut self, volatility: f64) -> bool {
        if !volatility.is_finite() {
            return false;
        }
        let clamped = volatility.clamp(0.0, MAX_VOLATILITY);
        if clamped != volatility {
            self.status.warn(
                StatusCode::VolatilityClamped,
                format!("volatility {volatility} replaced by {clamped}"),
            );
        }
        if clamped != self.volatility {
            self.volatility = clamped;
            self.invalidate();
        }
        true
    }

    /// Short-rate volatility in percent.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    // ---- curve queries ----

    /// Par rate in percent at `term`.
    ///
    /// A factor curve must be solved first.
    pub fn get_rate(&self, term: f64) -> ModelResult<f64> {
        if !valid_term(term) {
            return Err(ModelError::InvalidTerm { term });
        }
        match self.input {
            CurveInput::Par => ParCurve::new(&self.points)?.rate(term),
            CurveInput::Factor => self.solved()?.curve.par_rate(term),
        }
    }

    /// Discount factor at `term`.
    ///
    /// A par curve must be solved first.
    pub fn get_factor(&self, term: f64) -> ModelResult<f64> {
        if !valid_term(term) {
            return Err(ModelError::InvalidTerm { term });
        }
        match (&self.solved, self.input) {
            (Some(solved), _) => solved.curve.factor(term),
            (None, CurveInput::Factor) => DiscountCurve::from_points(&self.points)?.factor(term),
            (None, CurveInput::Par) => Err(ModelError::NotSolved),
        }
    }

    /// Semi-annual zero rate in percent at `term`.
    pub fn get_zero_rate(&self, term: f64) -> ModelResult<f64> {
        let factor = self.get_factor(term)?;
        compounding::factor_to_zero(factor, term)
            .ok_or_else(|| ModelError::invalid_point("factor", term, factor))
    }

    /// Converts a semi-annual zero rate in percent to a discount factor.
    #[must_use]
    pub fn zero_to_factor(rate: f64, year: f64) -> f64 {
        compounding::zero_to_factor(rate, year)
    }

    /// Converts a discount factor to a semi-annual zero rate in percent.
    #[must_use]
    pub fn factor_to_zero(factor: f64, year: f64) -> Option<f64> {
        compounding::factor_to_zero(factor, year)
    }

    // ---- solving ----

    /// Builds the discount curve and calibrates the lattice.
    ///
    /// Fails without points, when the curve implies a negative forward
    /// rate, or when the installed authorizer refuses lattice functions.
    /// The outcome is also recorded in the model's status; warnings from
    /// the setters are kept.
    pub fn solve(&mut self) -> ModelResult<()> {
        self.status.clear_error();
        match self.build() {
            Ok(solved) => {
                self.solved = Some(Arc::new(solved));
                Ok(())
            }
            Err(err) => {
                self.solved = None;
                self.status.set_error(err.status_code(), err.to_string());
                Err(err)
            }
        }
    }

    fn build(&self) -> ModelResult<SolvedModel> {
        authorize(Feature::Lattice)?;
        self.config.validate()?;
        let last_term = self.points.last().ok_or(ModelError::NoPoints)?.term;
        let horizon = self.config.horizon_years.max(last_term);

        let curve = match self.input {
            CurveInput::Par => DiscountCurve::bootstrap(&ParCurve::new(&self.points)?, horizon)?,
            CurveInput::Factor => DiscountCurve::from_points(&self.points)?,
        };

        let dt = self.config.dt();
        let steps = (horizon / dt - 1e-9).ceil() as usize;
        let lattice = calibrate(&curve, self.volatility, steps, dt)?;
        log::debug!(
            "solved {} curve with {} points: {} steps over {:.2} years",
            self.input,
            self.points.len(),
            steps,
            lattice.horizon()
        );
        Ok(SolvedModel { curve, lattice })
    }

    /// True once [`solve`](Self::solve) has succeeded and nothing changed
    /// since.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved.is_some()
    }

    /// The solved curve and lattice.
    pub fn solved(&self) -> ModelResult<&SolvedModel> {
        self.solved.as_deref().ok_or(ModelError::NotSolved)
    }

    /// The calibrated lattice.
    pub fn lattice(&self) -> ModelResult<&RateLattice> {
        Ok(&self.solved()?.lattice)
    }

    /// Discounts `value` received `from_time` years ahead through the
    /// lattice with `oas` basis points added to every short rate.
    pub fn discount(&self, value: f64, from_time: f64, oas: f64) -> ModelResult<f64> {
        self.lattice()?.discount(value, from_time, oas / 10_000.0)
    }

    /// Short-rate volatility in percent in effect at `from_time` years.
    pub fn volatility_at(&self, from_time: f64) -> ModelResult<f64> {
        let lattice = self.lattice()?;
        lattice.step_at(from_time)?;
        Ok(lattice.volatility() * 100.0)
    }

    // ---- derived models ----

    /// This model, re-solved over a longer lattice if the solved one ends
    /// before `years`.
    ///
    /// A model that already reaches `years` is returned as a clone sharing
    /// its lattice. The horizon can grow to [`MAX_HORIZON_YEARS`].
    pub fn covering(&self, years: f64) -> ModelResult<Self> {
        let horizon = self.lattice()?.horizon();
        if years <= horizon + 1e-9 {
            return Ok(self.clone());
        }
        if !(years <= MAX_HORIZON_YEARS) {
            return Err(ModelError::BeyondHorizon {
                time: years,
                horizon: MAX_HORIZON_YEARS,
            });
        }
        log::debug!("extending lattice from {horizon:.2} to {:.0} years", years.ceil());
        let config = self.config.with_horizon_years(years.ceil());
        let mut model = self.clone().with_config(config);
        model.solve()?;
        Ok(model)
    }

    /// An unsolved copy with every input shifted by `bp` basis points.
    ///
    /// Par curves shift the par rates; factor curves shift the semi-annual
    /// zero rates.
    #[must_use]
    pub fn shifted(&self, bp: f64) -> Self {
        let shift = bp / 100.0;
        let points = self
            .points
            .iter()
            .map(|p| match self.input {
                CurveInput::Par => TermPoint::new(p.term, p.value + shift),
                CurveInput::Factor => {
                    let zero = compounding::factor_to_zero(p.value, p.term).unwrap_or(0.0);
                    TermPoint::new(p.term, compounding::zero_to_factor(zero + shift, p.term))
                }
            })
            .collect();
        Self {
            input: self.input,
            points,
            volatility: self.volatility,
            config: self.config,
            solved: None,
            status: Status::new(),
        }
    }

    /// An unsolved par model of the curve as seen `period` years ahead.
    ///
    /// Forward par rates are taken at semi-annual terms out to the longest
    /// input term.
    pub fn projected(&self, period: f64) -> ModelResult<Self> {
        if !(period > 0.0) {
            return Err(ModelError::InvalidTerm { term: period });
        }
        let curve = &self.solved()?.curve;
        let last_term = self.points.last().ok_or(ModelError::NoPoints)?.term;
        let count = ((last_term / 0.5).ceil() as usize).max(1);

        let mut model = Self::new(CurveInput::Par).with_config(self.config);
        model.volatility = self.volatility;
        for k in 1..=count {
            let term = k as f64 * 0.5;
            let rate = curve.forward_par_rate(period, term)?;
            model.set_rate(term, rate);
        }
        Ok(model)
    }

    // ---- internals ----

    fn substitute_negative(&mut self, kind: &str, term: f64, value: f64) -> f64 {
        if value >= 0.0 {
            return value;
        }
        let replacement = self
            .current_rate(term)
            .filter(|r| *r >= 0.0)
            .unwrap_or(DEFAULT_RATE);
        self.status.warn(
            StatusCode::RateSubstituted,
            format!("{kind} {value} at {term} years replaced by {replacement}"),
        );
        replacement
    }

    fn current_rate(&self, term: f64) -> Option<f64> {
        match self.input {
            CurveInput::Par => ParCurve::new(&self.points).and_then(|c| c.rate(term)).ok(),
            CurveInput::Factor => DiscountCurve::from_points(&self.points)
                .and_then(|c| c.zero_rate(term))
                .ok(),
        }
    }

    fn insert_point(&mut self, term: f64, value: f64) {
        match self
            .points
            .iter_mut()
            .find(|p| (p.term - term).abs() <= TERM_EPSILON)
        {
            Some(existing) => existing.value = value,
            None => {
                let index = self.points.partition_point(|p| p.term < term);
                self.points.insert(index, TermPoint::new(term, value));
            }
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.solved = None;
    }
}

impl HasStatus for InterestRateModel {
    fn status(&self) -> &Status {
        &self.status
    }
}

fn valid_term(term: f64) -> bool {
    term.is_finite() && term > 0.0
}
