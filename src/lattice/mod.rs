//! Dividend-adjusted binomial lattice: calibration, construction, valuation and Greeks

mod calibration;
mod greeks;
mod payments;
mod shape;
mod tree;
mod valuation;

pub use calibration::Calibration;
pub use greeks::Greeks;
pub use payments::{PaymentValueNode, PaymentValueTree};
pub use shape::{LatticeLayout, LatticeShape, MAX_FULL_BINARY_PERIODS};
pub use tree::{LatticeNode, LatticeTree, PriceLattice};
