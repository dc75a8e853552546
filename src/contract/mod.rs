//! Contract inputs: option variants, market parameters and discrete payments

mod data;
pub mod loader;

pub use data::{
    year_fraction, Exercise, OptionContract, OptionKind, Payment, Payoff, UpDownSpecification,
};
pub use loader::{load_contract, load_payments, load_payments_from_reader};
