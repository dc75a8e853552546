//! Backward induction over the price lattice
//!
//! Each valuation writes `option_value` on every node and returns the root value.
//! Re-running any valuation on the same tree recomputes from the leaves, so repeated
//! calls give identical node values.

use super::tree::LatticeTree;
use crate::contract::{Exercise, OptionKind, Payoff};

impl LatticeTree {
    /// Value the tree for `kind`
    pub fn value(&mut self, kind: OptionKind) -> f64 {
        match kind {
            OptionKind::EuropeanCall => self.european_call(),
            OptionKind::AmericanCall => self.american_call(),
            OptionKind::EuropeanPut => self.european_put(),
            OptionKind::AmericanPut => self.american_put(),
        }
    }

    pub fn european_call(&mut self) -> f64 {
        self.backward_induction(Payoff::Call, Exercise::European)
    }

    pub fn american_call(&mut self) -> f64 {
        self.backward_induction(Payoff::Call, Exercise::American)
    }

    pub fn european_put(&mut self) -> f64 {
        self.backward_induction(Payoff::Put, Exercise::European)
    }

    pub fn american_put(&mut self) -> f64 {
        self.backward_induction(Payoff::Put, Exercise::American)
    }

    fn backward_induction(&mut self, payoff: Payoff, exercise: Exercise) -> f64 {
        let strike = self.strike();
        let p = self.calibration().probability;
        let discount = (-self.rate() * self.time_step()).exp();
        let nodes = self.nodes_mut();

        // Children always sit in later slots than their parents
        for slot in (0..nodes.len()).rev() {
            let node = &nodes[slot];
            let intrinsic = payoff.intrinsic(node.spot, strike);

            let value = match (node.up_child, node.down_child) {
                (Some(up), Some(down)) => {
                    let up_value = nodes[up].option_value.unwrap_or_default();
                    let down_value = nodes[down].option_value.unwrap_or_default();
                    let continuation = discount * (p * up_value + (1.0 - p) * down_value);
                    match exercise {
                        Exercise::European => continuation,
                        Exercise::American => continuation.max(intrinsic),
                    }
                }
                _ => intrinsic,
            };

            nodes[slot].option_value = Some(value);
        }

        let price = nodes[0].option_value.unwrap_or_default();
        log::debug!("{:?} {:?} valuation: {:.10}", exercise, payoff, price);
        price
    }
}
