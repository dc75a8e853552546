//! Binomial Lattice CLI
//!
//! Prices one option on a dividend-adjusted lattice, prints price and Greeks, and
//! writes the valued lattice to CSV.

use anyhow::{bail, Context};
use binomial_lattice::contract::{load_contract, load_payments, year_fraction};
use binomial_lattice::export::{write_csv_file, MAX_EXPORT_PERIODS};
use binomial_lattice::{
    LatticeConfig, LatticeLayout, LatticePricer, OptionContract, OptionKind, Payment,
    UpDownSpecification,
};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "binomial_lattice", version, about = "Dividend-adjusted binomial lattice pricer")]
struct Cli {
    /// JSON contract file; replaces all market flags below
    #[arg(long)]
    contract: Option<PathBuf>,

    /// fixed-multiplier (traditional) or crr-alternative
    #[arg(long, default_value = "crr-alternative")]
    specification: UpDownSpecification,

    /// european-call, american-call, european-put or american-put
    #[arg(long, default_value = "european-put")]
    kind: OptionKind,

    #[arg(long, default_value_t = 1.65)]
    spot: f64,

    #[arg(long, default_value_t = 1.65)]
    strike: f64,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value_t = 0.005)]
    rate: f64,

    /// Up multiplier (fixed-multiplier only; defaults to exp(vol * sqrt(dt)))
    #[arg(long)]
    up: Option<f64>,

    /// Down multiplier (fixed-multiplier only; defaults to 1 / up)
    #[arg(long)]
    down: Option<f64>,

    /// Tenure in years
    #[arg(long, default_value_t = 1.0, conflicts_with_all = ["start", "end"])]
    tenure: f64,

    /// Valuation date (YYYY-MM-DD); tenure becomes Actual/365 to --end
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,

    #[arg(long, default_value_t = 4)]
    periods: usize,

    /// Continuous income / dividend yield
    #[arg(long, default_value_t = 0.02)]
    income_rate: f64,

    #[arg(long, default_value_t = 0.15)]
    volatility: f64,

    /// CSV payment schedule with columns time,amount[,rate]
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Discrete payment as TIME:AMOUNT (repeatable)
    #[arg(long = "dividend", value_parser = parse_dividend)]
    dividends: Vec<Payment>,

    /// recombining or full-binary
    #[arg(long, default_value = "recombining")]
    layout: LatticeLayout,

    /// Lattice export path
    #[arg(long, default_value = "lattice-output.csv")]
    output: PathBuf,

    /// Skip the lattice export
    #[arg(long)]
    no_export: bool,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

fn parse_dividend(s: &str) -> Result<Payment, String> {
    let (time, amount) = s
        .split_once(':')
        .ok_or_else(|| format!("expected TIME:AMOUNT, got '{}'", s))?;
    let time: f64 = time.trim().parse().map_err(|e| format!("bad time '{}': {}", time, e))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|e| format!("bad amount '{}': {}", amount, e))?;
    Ok(Payment::new(time, amount))
}

impl Cli {
    fn contract(&self) -> anyhow::Result<OptionContract> {
        if let Some(path) = &self.contract {
            return load_contract(path)
                .with_context(|| format!("loading contract from {}", path.display()));
        }

        let tenure = match (self.start, self.end) {
            (Some(start), Some(end)) => year_fraction(start, end)?,
            _ => self.tenure,
        };

        let mut payments = self.dividends.clone();
        if let Some(path) = &self.payments {
            payments.extend(
                load_payments(path)
                    .with_context(|| format!("loading payments from {}", path.display()))?,
            );
        }

        Ok(OptionContract {
            specification: self.specification,
            kind: self.kind,
            spot: self.spot,
            strike: self.strike,
            risk_free_rate: self.rate,
            up: self.up,
            down: self.down,
            tenure,
            periods: self.periods,
            income_rate: self.income_rate,
            volatility: self.volatility,
            payments,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let contract = cli.contract()?;
    if contract.periods == 0 {
        bail!("--periods must be at least 1");
    }

    let export = !cli.no_export && contract.periods <= MAX_EXPORT_PERIODS;
    let mut config = LatticeConfig::default().with_layout(cli.layout);
    if !export {
        config = config.without_export();
    }

    let pricer = LatticePricer::new(config);
    let result = pricer.price(&contract).context("pricing failed")?;

    if export {
        write_csv_file(&result.records, &cli.output)
            .with_context(|| format!("writing {}", cli.output.display()))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result.summary())?);
        return Ok(());
    }

    println!("Binomial Lattice v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Contract: {} ({})", contract.kind, contract.specification);
    println!("  Spot:     {}", contract.spot);
    println!("  Strike:   {}", contract.strike);
    println!("  Tenure:   {:.6} years over {} periods", contract.tenure, contract.periods);
    println!("  Payments: {}", contract.payments.len());
    println!();
    println!(
        "Calibration: up={:.8} down={:.8} p={:.8}",
        result.calibration.up, result.calibration.down, result.calibration.probability
    );
    if !result.calibration.is_arbitrage_free() {
        println!("  warning: probability outside [0, 1], lattice admits arbitrage");
    }
    println!("\nPrice: {:.10}", result.price);

    match &result.greeks {
        Ok(greeks) => {
            println!("  delta: {:.10}", greeks.delta);
            println!("  gamma: {:.10}", greeks.gamma);
            println!("  theta: {:.10}", greeks.theta);
        }
        Err(err) => println!("  greeks unavailable: {}", err),
    }

    if export {
        println!(
            "\nLattice ({} nodes) written to: {}",
            result.records.len(),
            cli.output.display()
        );
    } else if !cli.no_export {
        println!(
            "\nLattice export skipped: {} periods exceeds the limit of {}",
            contract.periods, MAX_EXPORT_PERIODS
        );
    }

    Ok(())
}
