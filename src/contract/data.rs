//! Option contract and market input structures

use crate::error::{LatticeError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days per year for Actual/365 tenure calculation
const DAYS_PER_YEAR: f64 = 365.0;

fn default_income_rate() -> f64 {
    0.0
}

/// Normalise a user-supplied tag: lowercase, `_` and spaces folded to `-`
fn normalise_tag(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

/// Payoff direction of a vanilla option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payoff {
    Call,
    Put,
}

impl Payoff {
    /// Immediate exercise value at the given spot
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            Payoff::Call => (spot - strike).max(0.0),
            Payoff::Put => (strike - spot).max(0.0),
        }
    }
}

/// Exercise right of a vanilla option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exercise {
    /// Exercise at expiry only
    European,
    /// Exercise at any lattice node
    American,
}

/// The four supported option variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    EuropeanCall,
    AmericanCall,
    EuropeanPut,
    AmericanPut,
}

impl OptionKind {
    pub const ALL: [OptionKind; 4] = [
        OptionKind::EuropeanCall,
        OptionKind::AmericanCall,
        OptionKind::EuropeanPut,
        OptionKind::AmericanPut,
    ];
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            OptionKind::EuropeanCall => "european-call",
            OptionKind::AmericanCall => "american-call",
            OptionKind::EuropeanPut => "european-put",
            OptionKind::AmericanPut => "american-put",
        };
        f.write_str(tag)
    }
}

impl FromStr for OptionKind {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self> {
        match normalise_tag(s).as_str() {
            "european-call" => Ok(OptionKind::EuropeanCall),
            "american-call" => Ok(OptionKind::AmericanCall),
            "european-put" => Ok(OptionKind::EuropeanPut),
            "american-put" => Ok(OptionKind::AmericanPut),
            _ => Err(LatticeError::UnsupportedVariant(format!("option kind '{}'", s))),
        }
    }
}

/// How the up/down multipliers and risk-neutral probability are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpDownSpecification {
    /// Caller-supplied multipliers, probability from the forward growth
    #[serde(alias = "traditional")]
    FixedMultiplier,
    /// Probability fixed at 0.5, multipliers from volatility and drift
    #[serde(alias = "alternative")]
    CrrAlternative,
}

impl fmt::Display for UpDownSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpDownSpecification::FixedMultiplier => f.write_str("fixed-multiplier"),
            UpDownSpecification::CrrAlternative => f.write_str("crr-alternative"),
        }
    }
}

impl FromStr for UpDownSpecification {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self> {
        match normalise_tag(s).as_str() {
            "fixed-multiplier" | "traditional" => Ok(UpDownSpecification::FixedMultiplier),
            "crr-alternative" | "alternative" => Ok(UpDownSpecification::CrrAlternative),
            _ => Err(LatticeError::UnsupportedVariant(format!("specification '{}'", s))),
        }
    }
}

/// A known future cash payment on the underlying (discrete dividend)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment time, in years from valuation
    pub time: f64,

    /// Cash amount
    pub amount: f64,

    /// Discount rate for this payment; the tree rate is used when absent
    #[serde(default)]
    pub rate: Option<f64>,
}

impl Payment {
    pub fn new(time: f64, amount: f64) -> Self {
        Self { time, amount, rate: None }
    }

    pub fn with_rate(time: f64, amount: f64, rate: f64) -> Self {
        Self { time, amount, rate: Some(rate) }
    }

    /// Value of this payment seen from `at`, zero once it has been paid
    pub fn value_at(&self, at: f64, default_rate: f64) -> f64 {
        if self.time > at {
            let rate = self.rate.unwrap_or(default_rate);
            self.amount * (-rate * (self.time - at)).exp()
        } else {
            0.0
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(LatticeError::InvalidInput(format!(
                "payment time must be finite and >= 0, got {}",
                self.time
            )));
        }
        if !self.amount.is_finite() {
            return Err(LatticeError::InvalidInput(format!(
                "payment amount must be finite, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Full set of inputs for one lattice valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub specification: UpDownSpecification,
    pub kind: OptionKind,

    /// Quoted spot of the underlying
    pub spot: f64,
    pub strike: f64,

    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,

    /// Up multiplier (fixed-multiplier specification only)
    #[serde(default)]
    pub up: Option<f64>,

    /// Down multiplier (fixed-multiplier specification only)
    #[serde(default)]
    pub down: Option<f64>,

    /// Time to expiry in years
    pub tenure: f64,

    /// Number of lattice periods
    pub periods: usize,

    /// Continuous income / dividend yield
    #[serde(default = "default_income_rate")]
    pub income_rate: f64,

    pub volatility: f64,

    /// Discrete payments within the tenure
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl OptionContract {
    /// Contract with no income yield, no payments and volatility-derived multipliers
    pub fn new(
        specification: UpDownSpecification,
        kind: OptionKind,
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        tenure: f64,
        periods: usize,
        volatility: f64,
    ) -> Self {
        Self {
            specification,
            kind,
            spot,
            strike,
            risk_free_rate,
            up: None,
            down: None,
            tenure,
            periods,
            income_rate: 0.0,
            volatility,
            payments: Vec::new(),
        }
    }

    /// Set explicit up/down multipliers
    pub fn with_multipliers(mut self, up: f64, down: f64) -> Self {
        self.up = Some(up);
        self.down = Some(down);
        self
    }

    pub fn with_income_rate(mut self, income_rate: f64) -> Self {
        self.income_rate = income_rate;
        self
    }

    pub fn with_payments(mut self, payments: Vec<Payment>) -> Self {
        self.payments = payments;
        self
    }

    pub fn with_strike(mut self, strike: f64) -> Self {
        self.strike = strike;
        self
    }

    /// Length of one lattice period.
    ///
    /// A zero-period lattice has a single node; its step is taken as the whole
    /// tenure so calibration still sees a finite, positive interval.
    pub fn time_step(&self) -> f64 {
        if self.periods == 0 {
            self.tenure
        } else {
            self.tenure / self.periods as f64
        }
    }

    /// Check inputs that would otherwise produce meaningless prices
    pub fn validate(&self) -> Result<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(LatticeError::InvalidInput(format!(
                "spot must be finite and > 0, got {}",
                self.spot
            )));
        }
        if !self.strike.is_finite() || self.strike < 0.0 {
            return Err(LatticeError::InvalidInput(format!(
                "strike must be finite and >= 0, got {}",
                self.strike
            )));
        }
        if !self.tenure.is_finite() || self.tenure <= 0.0 {
            return Err(LatticeError::InvalidInput(format!(
                "tenure must be finite and > 0, got {}",
                self.tenure
            )));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(LatticeError::InvalidInput(format!(
                "volatility must be finite and >= 0, got {}",
                self.volatility
            )));
        }
        for payment in &self.payments {
            payment.validate()?;
        }
        Ok(())
    }
}

/// Actual/365 year fraction between two dates
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> Result<f64> {
    let days = (end - start).num_days();
    if days < 0 {
        return Err(LatticeError::InvalidInput(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(days as f64 / DAYS_PER_YEAR)
}
