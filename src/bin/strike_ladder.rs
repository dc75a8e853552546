//! Price a strike ladder for one contract and write prices and Greeks per strike
//!
//! Usage: cargo run --bin strike_ladder -- --from 1.40 --to 1.90 --step 0.05

use anyhow::{ensure, Context};
use binomial_lattice::{
    LatticeConfig, LatticeLayout, OptionContract, OptionKind, PricingRunner, UpDownSpecification,
};
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "strike_ladder", about = "Strike ladder on a binomial lattice")]
struct Args {
    #[arg(long, default_value = "crr-alternative")]
    specification: UpDownSpecification,

    #[arg(long, default_value = "american-put")]
    kind: OptionKind,

    #[arg(long, default_value_t = 1.65)]
    spot: f64,

    #[arg(long, default_value_t = 0.005)]
    rate: f64,

    #[arg(long, default_value_t = 0.02)]
    income_rate: f64,

    #[arg(long, default_value_t = 0.15)]
    volatility: f64,

    #[arg(long, default_value_t = 1.0)]
    tenure: f64,

    #[arg(long, default_value_t = 50)]
    periods: usize,

    /// Lowest strike
    #[arg(long, default_value_t = 1.40)]
    from: f64,

    /// Highest strike
    #[arg(long, default_value_t = 1.90)]
    to: f64,

    #[arg(long, default_value_t = 0.05)]
    step: f64,

    #[arg(long, default_value = "recombining")]
    layout: LatticeLayout,

    #[arg(long, default_value = "strike_ladder.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    ensure!(args.step > 0.0, "--step must be positive");
    ensure!(args.to >= args.from, "--to must not be below --from");

    let contract = OptionContract::new(
        args.specification,
        args.kind,
        args.spot,
        args.from,
        args.rate,
        args.tenure,
        args.periods,
        args.volatility,
    )
    .with_income_rate(args.income_rate);

    let count = ((args.to - args.from) / args.step + 1e-9).floor() as usize + 1;
    let strikes: Vec<f64> = (0..count).map(|i| args.from + i as f64 * args.step).collect();

    let start = Instant::now();
    let runner = PricingRunner::new(LatticeConfig::default().with_layout(args.layout).without_export());
    let ladder = runner.strike_ladder(&contract, &strikes);
    println!("Priced {} strikes in {:?}", ladder.len(), start.elapsed());

    let mut file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writeln!(file, "Strike,Price,Delta,Gamma,Theta")?;

    for point in &ladder {
        let result = point
            .result
            .as_ref()
            .map_err(|e| anyhow::anyhow!("strike {}: {}", point.strike, e))?;
        match &result.greeks {
            Ok(g) => writeln!(
                file,
                "{:.6},{:.10},{:.10},{:.10},{:.10}",
                point.strike, result.price, g.delta, g.gamma, g.theta
            )?,
            Err(_) => writeln!(file, "{:.6},{:.10},,,", point.strike, result.price)?,
        }
    }

    println!("Output written to {}", args.output.display());
    Ok(())
}
