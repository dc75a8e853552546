//! Binomial Lattice - dividend-adjusted binomial tree pricer for vanilla options
//!
//! This library provides:
//! - Risk-neutral calibration (fixed multipliers or CRR-style alternative)
//! - Discrete payment (dividend) trees paired node-for-node with the price lattice
//! - European and American call/put valuation by backward induction
//! - Delta, gamma and theta read off the valued lattice
//! - A path-labelled export of every internal lattice node

pub mod contract;
pub mod error;
pub mod export;
pub mod lattice;
pub mod pricer;
pub mod runner;

// Re-export commonly used types
pub use contract::{OptionContract, OptionKind, Payment, UpDownSpecification};
pub use error::{LatticeError, Result};
pub use export::{export_records, ExportRecord};
pub use lattice::{Calibration, Greeks, LatticeLayout, LatticeTree};
pub use pricer::{LatticeConfig, LatticePricer, PricingResult, PricingSummary};
pub use runner::PricingRunner;
