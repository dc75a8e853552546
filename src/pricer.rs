//! Pricing pipeline: calibrate, build, value, then read Greeks and export the lattice

use crate::contract::{OptionContract, OptionKind};
use crate::error::{LatticeError, Result};
use crate::export::{export_records, ExportRecord, MAX_EXPORT_PERIODS};
use crate::lattice::{Calibration, Greeks, LatticeLayout, LatticeTree};
use serde::{Deserialize, Serialize};

/// Configuration for a pricing run
#[derive(Debug, Clone)]
pub struct LatticeConfig {
    /// Node sharing between paths
    pub layout: LatticeLayout,

    /// Whether to collect the per-node export records
    pub export_lattice: bool,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            layout: LatticeLayout::Recombining,
            export_lattice: true,
        }
    }
}

impl LatticeConfig {
    pub fn with_layout(mut self, layout: LatticeLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn without_export(mut self) -> Self {
        self.export_lattice = false;
        self
    }
}

/// Everything a pricing run produces
#[derive(Debug)]
pub struct PricingResult {
    pub kind: OptionKind,
    pub price: f64,
    pub calibration: Calibration,

    /// Greeks, or the reason they could not be read off the lattice
    pub greeks: Result<Greeks>,

    /// Export records (empty when export is disabled)
    pub records: Vec<ExportRecord>,
}

impl PricingResult {
    /// Serializable summary of the run
    pub fn summary(&self) -> PricingSummary {
        let (greeks, greeks_error) = match &self.greeks {
            Ok(greeks) => (Some(*greeks), None),
            Err(err) => (None, Some(err.to_string())),
        };

        PricingSummary {
            kind: self.kind,
            price: self.price,
            up: self.calibration.up,
            down: self.calibration.down,
            probability: self.calibration.probability,
            arbitrage_free: self.calibration.is_arbitrage_free(),
            greeks,
            greeks_error,
            exported_nodes: self.records.len(),
        }
    }
}

/// Summary of a pricing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSummary {
    pub kind: OptionKind,
    pub price: f64,
    pub up: f64,
    pub down: f64,
    pub probability: f64,
    /// False when the probability falls outside [0, 1]
    pub arbitrage_free: bool,
    pub greeks: Option<Greeks>,
    pub greeks_error: Option<String>,
    pub exported_nodes: usize,
}

/// Main pricing engine
#[derive(Debug, Clone, Default)]
pub struct LatticePricer {
    config: LatticeConfig,
}

impl LatticePricer {
    pub fn new(config: LatticeConfig) -> Self {
        Self { config }
    }

    /// Build the lattice for `contract` and value it for the contract's option kind
    pub fn build_and_value(&self, contract: &OptionContract) -> Result<(LatticeTree, f64)> {
        let mut tree = LatticeTree::build(contract, self.config.layout)?;
        let price = tree.value(contract.kind);
        Ok((tree, price))
    }

    /// Run the full pipeline for one contract
    pub fn price(&self, contract: &OptionContract) -> Result<PricingResult> {
        let (tree, price) = self.build_and_value(contract)?;

        let calibration = tree.calibration();
        if !calibration.is_arbitrage_free() {
            log::warn!(
                "risk-neutral probability {:.8} is outside [0, 1]; lattice admits arbitrage",
                calibration.probability
            );
        }

        let greeks = Greeks::estimate(&tree);
        match &greeks {
            Err(LatticeError::InsufficientDepth { .. }) => {
                log::debug!("greeks skipped for {}-period lattice", tree.periods());
            }
            Err(err) => log::warn!("greeks unavailable: {}", err),
            Ok(_) => {}
        }

        let records = if !self.config.export_lattice {
            Vec::new()
        } else if tree.periods() > MAX_EXPORT_PERIODS {
            log::warn!(
                "lattice export skipped: {} periods exceeds the export limit of {}",
                tree.periods(),
                MAX_EXPORT_PERIODS
            );
            Vec::new()
        } else {
            export_records(&tree)?
        };

        log::info!(
            "{} spot={} strike={} periods={} price={:.10}",
            contract.kind,
            contract.spot,
            contract.strike,
            contract.periods,
            price
        );

        Ok(PricingResult {
            kind: contract.kind,
            price,
            calibration,
            greeks,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Payment, UpDownSpecification};

    fn test_contract() -> OptionContract {
        OptionContract::new(
            UpDownSpecification::CrrAlternative,
            OptionKind::EuropeanPut,
            1.65,
            1.65,
            0.005,
            1.0,
            4,
            0.15,
        )
        .with_income_rate(0.02)
        .with_payments(vec![Payment::new(1.0, 0.03 * 1.65)])
    }

    #[test]
    fn test_pricing_runs() {
        let pricer = LatticePricer::default();
        let result = pricer.price(&test_contract()).unwrap();

        assert!(result.price > 0.0);
        assert_eq!(result.records.len(), 15);
        assert_eq!(result.calibration.probability, 0.5);

        let greeks = result.greeks.as_ref().unwrap();
        assert!(greeks.delta < 0.0 && greeks.delta > -1.0);
    }

    #[test]
    fn test_export_disabled() {
        let pricer = LatticePricer::new(LatticeConfig::default().without_export());
        let result = pricer.price(&test_contract()).unwrap();
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_summary_reports_greeks_error() {
        let contract = OptionContract { periods: 1, ..test_contract() };
        let result = LatticePricer::default().price(&contract).unwrap();
        let summary = result.summary();

        assert!(summary.greeks.is_none());
        assert!(summary.greeks_error.unwrap().contains("at least 2 periods"));
        assert_eq!(summary.exported_nodes, 1);
    }

    #[test]
    fn test_summary_serializes() {
        let result = LatticePricer::default().price(&test_contract()).unwrap();
        let json = serde_json::to_string(&result.summary()).unwrap();
        assert!(json.contains("\"kind\":\"european-put\""));
        assert!(json.contains("\"delta\""));
    }

    #[test]
    fn test_deep_lattice_prices_without_export() {
        let contract = OptionContract { periods: 40, ..test_contract() };
        let result = LatticePricer::default().price(&contract).unwrap();

        assert!(result.price > 0.0);
        assert!(result.records.is_empty());
        assert!(result.greeks.is_ok());
    }

    #[test]
    fn test_summary_flags_arbitrage() {
        assert!(LatticePricer::default()
            .price(&test_contract())
            .unwrap()
            .summary()
            .arbitrage_free);

        // Growth of exp(0.5 * 0.5) per period beats the 1.1 up move
        let contract = OptionContract::new(
            UpDownSpecification::FixedMultiplier,
            OptionKind::EuropeanCall,
            100.0,
            100.0,
            0.5,
            1.0,
            2,
            0.2,
        )
        .with_multipliers(1.1, 0.9);
        let summary = LatticePricer::default().price(&contract).unwrap().summary();

        assert!(summary.probability > 1.0);
        assert!(!summary.arbitrage_free);
    }

    #[test]
    fn test_invalid_contract_fails_without_result() {
        let contract = test_contract().with_payments(vec![Payment::new(f64::NAN, 1.0)]);
        assert!(LatticePricer::default().price(&contract).is_err());
    }
}
