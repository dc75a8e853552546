//! Finite-difference Greeks read off the first two levels of a valued lattice

use super::tree::{LatticeNode, LatticeTree};
use crate::error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

/// Levels below the root the estimator reads
const REQUIRED_PERIODS: usize = 2;

/// Spot and time sensitivities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
}

impl Greeks {
    /// Estimate Greeks from an already valued tree.
    ///
    /// Gamma scales by the root spot and the root multipliers. Theta compares the
    /// up-then-down node two periods ahead with the root; it is a lattice proxy, not a
    /// calendar-time derivative.
    pub fn estimate(tree: &LatticeTree) -> Result<Self> {
        if tree.periods() < REQUIRED_PERIODS {
            return Err(LatticeError::InsufficientDepth {
                required: REQUIRED_PERIODS,
                periods: tree.periods(),
            });
        }

        let root = tree.root();
        let up = tree.node_along(&[true]);
        let down = tree.node_along(&[false]);
        let up_up = tree.node_along(&[true, true]);
        let up_down = tree.node_along(&[true, false]);
        let down_up = tree.node_along(&[false, true]);
        let down_down = tree.node_along(&[false, false]);

        let delta = local_delta(up, down, "delta")?;
        let delta_up = local_delta(up_up, up_down, "up-branch delta")?;
        let delta_down = local_delta(down_up, down_down, "down-branch delta")?;

        let calibration = tree.calibration();
        let spread = 0.5
            * root.spot
            * (calibration.up * calibration.up - calibration.down * calibration.down);
        let gamma = finite_ratio(delta_up - delta_down, spread, "gamma")?;

        let theta = (value_of(up_down)? - value_of(root)?) / (2.0 * tree.time_step());

        Ok(Self { delta, gamma, theta })
    }
}

fn value_of(node: &LatticeNode) -> Result<f64> {
    node.option_value.ok_or(LatticeError::NotValued)
}

fn local_delta(up: &LatticeNode, down: &LatticeNode, what: &str) -> Result<f64> {
    finite_ratio(value_of(up)? - value_of(down)?, up.spot - down.spot, what)
}

fn finite_ratio(numerator: f64, denominator: f64, what: &str) -> Result<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(LatticeError::DegenerateLattice(format!(
            "{} denominator is {}",
            what, denominator
        )));
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(LatticeError::DegenerateLattice(format!("{} is {}", what, ratio)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{OptionContract, OptionKind, UpDownSpecification};
    use crate::lattice::{Calibration, LatticeLayout, LatticeShape, PriceLattice};
    use approx::assert_relative_eq;

    fn two_period_call() -> LatticeTree {
        let contract = OptionContract::new(
            UpDownSpecification::FixedMultiplier,
            OptionKind::EuropeanCall,
            100.0,
            100.0,
            0.0,
            2.0,
            2,
            0.2,
        )
        .with_multipliers(1.1, 0.9);
        let mut tree = LatticeTree::build(&contract, LatticeLayout::FullBinary).unwrap();
        tree.european_call();
        tree
    }

    #[test]
    fn test_two_period_greeks() {
        let greeks = Greeks::estimate(&two_period_call()).unwrap();

        // V_u = 10.5, V_d = 0, S_u - S_d = 20
        assert_relative_eq!(greeks.delta, 0.525, epsilon = 1e-12);
        // (21/22 - 0) / (0.5 * 100 * (1.21 - 0.81))
        assert_relative_eq!(greeks.gamma, (21.0 / 22.0) / 20.0, epsilon = 1e-12);
        // (V_ud - V_0) / (2 * dt) = (0 - 5.25) / 2
        assert_relative_eq!(greeks.theta, -2.625, epsilon = 1e-12);
    }

    #[test]
    fn test_layouts_agree_on_greeks() {
        let contract = OptionContract::new(
            UpDownSpecification::CrrAlternative,
            OptionKind::AmericanPut,
            1.65,
            1.65,
            0.005,
            1.0,
            4,
            0.15,
        )
        .with_income_rate(0.02);

        let mut full = LatticeTree::build(&contract, LatticeLayout::FullBinary).unwrap();
        let mut recombining = LatticeTree::build(&contract, LatticeLayout::Recombining).unwrap();
        full.american_put();
        recombining.american_put();

        let a = Greeks::estimate(&full).unwrap();
        let b = Greeks::estimate(&recombining).unwrap();
        assert_relative_eq!(a.delta, b.delta, epsilon = 1e-9);
        assert_relative_eq!(a.gamma, b.gamma, epsilon = 1e-9);
        assert_relative_eq!(a.theta, b.theta, epsilon = 1e-9);
        assert!(a.delta < 0.0);
    }

    #[test]
    fn test_degenerate_lattice() {
        let shape = LatticeShape::new(LatticeLayout::FullBinary, 2).unwrap();
        let lattice = PriceLattice::build(100.0, 1.0, 1.0, shape, None).unwrap();
        let calibration = Calibration {
            up: 1.0,
            down: 1.0,
            probability: 0.5,
        };
        let mut tree = LatticeTree::from_parts(lattice, calibration, 100.0, 0.0, 0.5);
        tree.european_call();

        let err = Greeks::estimate(&tree).unwrap_err();
        assert!(matches!(err, LatticeError::DegenerateLattice(_)));
    }

    #[test]
    fn test_insufficient_depth() {
        let contract = OptionContract::new(
            UpDownSpecification::FixedMultiplier,
            OptionKind::EuropeanCall,
            100.0,
            100.0,
            0.0,
            1.0,
            1,
            0.2,
        );
        let mut tree = LatticeTree::build(&contract, LatticeLayout::Recombining).unwrap();
        tree.european_call();

        let err = Greeks::estimate(&tree).unwrap_err();
        assert!(matches!(err, LatticeError::InsufficientDepth { required: 2, periods: 1 }));
    }

    #[test]
    fn test_requires_valuation() {
        let contract = OptionContract::new(
            UpDownSpecification::FixedMultiplier,
            OptionKind::EuropeanCall,
            100.0,
            100.0,
            0.0,
            2.0,
            2,
            0.2,
        );
        let tree = LatticeTree::build(&contract, LatticeLayout::Recombining).unwrap();
        assert!(matches!(Greeks::estimate(&tree), Err(LatticeError::NotValued)));
    }
}
