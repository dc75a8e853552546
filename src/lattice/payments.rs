//! Present value of discrete future payments at every lattice coordinate

use super::shape::LatticeShape;
use crate::contract::Payment;

/// Value of all payments strictly after `time`, seen from `time`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentValueNode {
    pub time: f64,
    pub value: f64,
}

/// Payment values laid out in the same arena shape as the price lattice
#[derive(Debug, Clone)]
pub struct PaymentValueTree {
    shape: LatticeShape,
    nodes: Vec<PaymentValueNode>,
}

impl PaymentValueTree {
    /// Build the tree from `start_time`, one level per `time_step`.
    ///
    /// Payments are deterministic, so every node of a level carries the same value.
    /// Each payment is discounted at its own rate, falling back to `rate`.
    pub fn build(
        start_time: f64,
        time_step: f64,
        shape: LatticeShape,
        rate: f64,
        payments: &[Payment],
    ) -> Self {
        let mut nodes = Vec::with_capacity(shape.node_count());

        for level in 0..=shape.periods {
            let time = start_time + level as f64 * time_step;
            let value: f64 = payments.iter().map(|p| p.value_at(time, rate)).sum();
            let node = PaymentValueNode { time, value };
            nodes.extend(std::iter::repeat(node).take(shape.width(level)));
        }

        log::debug!(
            "payment tree: {} payments, {} nodes, root value {:.8}",
            payments.len(),
            nodes.len(),
            nodes[0].value
        );

        Self { shape, nodes }
    }

    pub fn shape(&self) -> LatticeShape {
        self.shape
    }

    pub fn root(&self) -> &PaymentValueNode {
        &self.nodes[0]
    }

    /// Node at `(level, index)`
    pub fn node(&self, level: usize, index: usize) -> &PaymentValueNode {
        &self.nodes[self.shape.slot(level, index)]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
