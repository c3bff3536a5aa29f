use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use rental_regime_core::capital_gains::CapitalGainInput;

use crate::input;

/// Arguments for taxing one resale gain
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML tax law (defaults to the law in force)
    #[arg(long)]
    pub law: Option<String>,

    /// Resale price minus corrected acquisition cost
    #[arg(long, allow_hyphen_values = true)]
    pub gain: Option<Decimal>,

    /// Amortization deducted during the holding period
    #[arg(long, default_value = "0")]
    pub reintegrated: Decimal,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_capital_gains(args: CapitalGainsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let law = input::file::load_law(args.law.as_deref())?;

    let gain_input: CapitalGainInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        CapitalGainInput {
            gain_before_reintegration: args
                .gain
                .ok_or("--gain is required (or provide --input)")?,
            reintegrated_amortization: args.reintegrated,
            holding_years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    let result = gain_input.tax(&law.capital_gains);
    Ok(json!({ "result": result }))
}
