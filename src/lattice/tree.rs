//! Price lattice construction and the valued-tree aggregate

use super::calibration::Calibration;
use super::payments::PaymentValueTree;
use super::shape::{LatticeLayout, LatticeShape};
use crate::contract::OptionContract;
use crate::error::{LatticeError, Result};

/// Full binary trees above this depth get a size warning
const LARGE_FULL_BINARY_PERIODS: usize = 20;

/// One state of the underlying
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeNode {
    /// Spot including the value of payments still to come
    pub spot: f64,

    /// Paired payment-tree value (zero without payments)
    pub payment_value: f64,

    /// Option value, set by valuation
    pub option_value: Option<f64>,

    /// Arena slot of the up child
    pub up_child: Option<usize>,

    /// Arena slot of the down child
    pub down_child: Option<usize>,
}

impl LatticeNode {
    fn unset() -> Self {
        Self {
            spot: f64::NAN,
            payment_value: 0.0,
            option_value: None,
            up_child: None,
            down_child: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.up_child.is_none() && self.down_child.is_none()
    }

    /// Spot net of future payments; the part the multipliers act on
    pub fn ex_payment_spot(&self) -> f64 {
        self.spot - self.payment_value
    }
}

/// Arena of lattice nodes; slot 0 is the root
#[derive(Debug, Clone)]
pub struct PriceLattice {
    shape: LatticeShape,
    nodes: Vec<LatticeNode>,
}

impl PriceLattice {
    /// Build the lattice top-down.
    ///
    /// With a payment tree, each node's spot is its base plus the paired payment value
    /// and children are based on `(spot - payment_value) * {up, down}`. Without one,
    /// children are simply `spot * {up, down}`.
    pub fn build(
        root_value: f64,
        up: f64,
        down: f64,
        shape: LatticeShape,
        payments: Option<&PaymentValueTree>,
    ) -> Result<Self> {
        if let Some(tree) = payments {
            if tree.shape() != shape {
                return Err(LatticeError::ShapeMismatch {
                    lattice: shape.to_string(),
                    payments: tree.shape().to_string(),
                });
            }
        }
        let payment_value =
            |level: usize, index: usize| payments.map_or(0.0, |tree| tree.node(level, index).value);

        let mut nodes = vec![LatticeNode::unset(); shape.node_count()];
        nodes[0].payment_value = payment_value(0, 0);
        nodes[0].spot = root_value + nodes[0].payment_value;

        for level in 0..shape.periods {
            for index in 0..shape.width(level) {
                let slot = shape.slot(level, index);
                let base = nodes[slot].ex_payment_spot();

                for (child_index, multiplier) in
                    [(shape.up_index(index), up), (shape.down_index(index), down)]
                {
                    let child_slot = shape.slot(level + 1, child_index);
                    let child_payment = payment_value(level + 1, child_index);
                    let child = &mut nodes[child_slot];
                    child.payment_value = child_payment;
                    child.spot = base * multiplier + child_payment;
                }

                let node = &mut nodes[slot];
                node.up_child = Some(shape.slot(level + 1, shape.up_index(index)));
                node.down_child = Some(shape.slot(level + 1, shape.down_index(index)));
            }
        }

        Ok(Self { shape, nodes })
    }

    pub fn shape(&self) -> LatticeShape {
        self.shape
    }

    pub fn nodes(&self) -> &[LatticeNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [LatticeNode] {
        &mut self.nodes
    }
}

/// A built lattice plus the model parameters every valuation uses
#[derive(Debug, Clone)]
pub struct LatticeTree {
    lattice: PriceLattice,
    calibration: Calibration,
    strike: f64,
    rate: f64,
    time_step: f64,
}

impl LatticeTree {
    /// Calibrate, build the payment tree, then build the price lattice.
    ///
    /// With payments the root is seeded with `spot - PV(payments)`, so the root spot
    /// equals the quoted spot either way.
    pub fn build(contract: &OptionContract, layout: LatticeLayout) -> Result<Self> {
        contract.validate()?;
        let calibration = Calibration::for_contract(contract)?;
        let shape = LatticeShape::new(layout, contract.periods)?;
        let time_step = contract.time_step();

        if layout == LatticeLayout::FullBinary && contract.periods > LARGE_FULL_BINARY_PERIODS {
            log::warn!(
                "full binary lattice with {} periods allocates {} nodes",
                contract.periods,
                shape.node_count()
            );
        }

        let payment_tree = if contract.payments.is_empty() {
            None
        } else {
            Some(PaymentValueTree::build(
                0.0,
                time_step,
                shape,
                contract.risk_free_rate,
                &contract.payments,
            ))
        };
        let root_value = match &payment_tree {
            Some(tree) => contract.spot - tree.root().value,
            None => contract.spot,
        };

        let lattice = PriceLattice::build(
            root_value,
            calibration.up,
            calibration.down,
            shape,
            payment_tree.as_ref(),
        )?;
        log::debug!("built {} lattice: {} nodes", shape, lattice.nodes().len());

        Ok(Self::from_parts(
            lattice,
            calibration,
            contract.strike,
            contract.risk_free_rate,
            time_step,
        ))
    }

    /// Assemble from an already built lattice
    pub fn from_parts(
        lattice: PriceLattice,
        calibration: Calibration,
        strike: f64,
        rate: f64,
        time_step: f64,
    ) -> Self {
        Self {
            lattice,
            calibration,
            strike,
            rate,
            time_step,
        }
    }

    pub fn root(&self) -> &LatticeNode {
        &self.lattice.nodes[0]
    }

    /// Node at `(level, index)` in the lattice's own addressing
    pub fn node(&self, level: usize, index: usize) -> &LatticeNode {
        &self.lattice.nodes[self.lattice.shape.slot(level, index)]
    }

    /// Node reached by following `moves` from the root (`true` = up)
    pub fn node_along(&self, moves: &[bool]) -> &LatticeNode {
        let shape = self.lattice.shape;
        self.node(moves.len(), shape.index_of_path(moves))
    }

    pub fn up_child(&self, node: &LatticeNode) -> Option<&LatticeNode> {
        node.up_child.map(|slot| &self.lattice.nodes[slot])
    }

    pub fn down_child(&self, node: &LatticeNode) -> Option<&LatticeNode> {
        node.down_child.map(|slot| &self.lattice.nodes[slot])
    }

    pub fn nodes(&self) -> &[LatticeNode] {
        self.lattice.nodes()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [LatticeNode] {
        self.lattice.nodes_mut()
    }

    pub fn shape(&self) -> LatticeShape {
        self.lattice.shape
    }

    pub fn periods(&self) -> usize {
        self.lattice.shape.periods
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Quoted spot at the root
    pub fn spot(&self) -> f64 {
        self.root().spot
    }

    pub fn is_valued(&self) -> bool {
        self.root().option_value.is_some()
    }
}
