//! Batch pricing across many independent lattices
//!
//! Each contract gets its own tree, so batches run in parallel without sharing state.

use crate::contract::OptionContract;
use crate::error::Result;
use crate::pricer::{LatticeConfig, LatticePricer, PricingResult};
use rayon::prelude::*;

/// One rung of a strike ladder
#[derive(Debug)]
pub struct LadderPoint {
    pub strike: f64,
    pub result: Result<PricingResult>,
}

/// Pre-configured runner for batch pricing
///
/// # Example
/// ```ignore
/// let runner = PricingRunner::new(LatticeConfig::default().without_export());
/// let ladder = runner.strike_ladder(&contract, &[90.0, 100.0, 110.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PricingRunner {
    pricer: LatticePricer,
}

impl PricingRunner {
    pub fn new(config: LatticeConfig) -> Self {
        Self {
            pricer: LatticePricer::new(config),
        }
    }

    /// Price a single contract
    pub fn run(&self, contract: &OptionContract) -> Result<PricingResult> {
        self.pricer.price(contract)
    }

    /// Price contracts in parallel; results keep input order
    pub fn run_batch(&self, contracts: &[OptionContract]) -> Vec<Result<PricingResult>> {
        contracts
            .par_iter()
            .map(|contract| self.pricer.price(contract))
            .collect()
    }

    /// Reprice `contract` at each strike
    pub fn strike_ladder(&self, contract: &OptionContract, strikes: &[f64]) -> Vec<LadderPoint> {
        strikes
            .par_iter()
            .map(|&strike| LadderPoint {
                strike,
                result: self.pricer.price(&contract.clone().with_strike(strike)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{OptionKind, UpDownSpecification};

    fn test_contract(kind: OptionKind) -> OptionContract {
        OptionContract::new(
            UpDownSpecification::FixedMultiplier,
            kind,
            115.0,
            115.0,
            0.05,
            0.75,
            3,
            0.05,
        )
        .with_income_rate(0.06)
    }

    #[test]
    fn test_batch_keeps_order() {
        let runner = PricingRunner::new(LatticeConfig::default().without_export());
        let contracts: Vec<_> = OptionKind::ALL.iter().map(|&k| test_contract(k)).collect();

        let results = runner.run_batch(&contracts);
        assert_eq!(results.len(), 4);
        for (contract, result) in contracts.iter().zip(&results) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.kind, contract.kind);
            let single = runner.run(contract).unwrap();
            assert_eq!(single.price, result.price);
        }
    }

    #[test]
    fn test_strike_ladder_monotone() {
        let runner = PricingRunner::default();
        let strikes = [100.0, 105.0, 110.0, 115.0, 120.0, 125.0];
        let ladder = runner.strike_ladder(&test_contract(OptionKind::EuropeanCall), &strikes);

        assert_eq!(ladder.len(), strikes.len());
        let prices: Vec<f64> = ladder.iter().map(|p| p.result.as_ref().unwrap().price).collect();
        for pair in prices.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert_eq!(ladder[2].strike, 110.0);
    }

    #[test]
    fn test_batch_surfaces_errors() {
        let runner = PricingRunner::default();
        let bad = test_contract(OptionKind::EuropeanPut).with_multipliers(0.9, 1.1);
        let results = runner.run_batch(&[test_contract(OptionKind::EuropeanPut), bad]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
