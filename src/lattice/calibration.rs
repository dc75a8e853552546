//! Risk-neutral calibration of the up/down multipliers and transition probability

use crate::contract::{OptionContract, UpDownSpecification};
use crate::error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

/// Calibrated per-period lattice parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Up-move multiplier
    pub up: f64,

    /// Down-move multiplier
    pub down: f64,

    /// Risk-neutral probability of an up-move
    pub probability: f64,
}

impl Calibration {
    /// Calibrate from raw market inputs.
    ///
    /// `up`/`down` are only read under `FixedMultiplier`; when absent they default to
    /// `exp(±vol·√Δt)`. Returns `InvalidParameters` unless `up > down > 0`.
    pub fn calibrate(
        specification: UpDownSpecification,
        rate: f64,
        income_rate: f64,
        volatility: f64,
        time_step: f64,
        up: Option<f64>,
        down: Option<f64>,
    ) -> Result<Self> {
        let calibration = match specification {
            UpDownSpecification::FixedMultiplier => {
                let up = up.unwrap_or_else(|| (volatility * time_step.sqrt()).exp());
                let down = down.unwrap_or(1.0 / up);
                check_multipliers(up, down)?;
                let growth = ((rate - income_rate) * time_step).exp();
                Self {
                    up,
                    down,
                    probability: (growth - down) / (up - down),
                }
            }
            UpDownSpecification::CrrAlternative => {
                let drift = (rate - income_rate - volatility * volatility / 2.0) * time_step;
                let diffusion = volatility * time_step.sqrt();
                let up = (drift + diffusion).exp();
                let down = (drift - diffusion).exp();
                check_multipliers(up, down)?;
                Self {
                    up,
                    down,
                    probability: 0.5,
                }
            }
        };

        log::debug!(
            "calibrated {}: up={:.8} down={:.8} p={:.8}",
            specification,
            calibration.up,
            calibration.down,
            calibration.probability
        );

        Ok(calibration)
    }

    /// Calibrate from a contract's own inputs
    pub fn for_contract(contract: &OptionContract) -> Result<Self> {
        Self::calibrate(
            contract.specification,
            contract.risk_free_rate,
            contract.income_rate,
            contract.volatility,
            contract.time_step(),
            contract.up,
            contract.down,
        )
    }

    /// Whether the probability admits no arbitrage between the two moves
    pub fn is_arbitrage_free(&self) -> bool {
        (0.0..=1.0).contains(&self.probability)
    }
}

fn check_multipliers(up: f64, down: f64) -> Result<()> {
    if up.is_finite() && down.is_finite() && down > 0.0 && up > down {
        Ok(())
    } else {
        Err(LatticeError::InvalidParameters { up, down })
    }
}
