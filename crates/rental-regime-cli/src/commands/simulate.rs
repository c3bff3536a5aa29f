use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use rental_regime_core::simulation::analyse_regimes;
use rental_regime_core::sweep::holding_period_sweep;
use rental_regime_core::{RegulatedTier, SimulationInputs};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TierArg {
    Intermediate,
    Social,
    VerySocial,
}

impl From<TierArg> for RegulatedTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Intermediate => RegulatedTier::Intermediate,
            TierArg::Social => RegulatedTier::Social,
            TierArg::VerySocial => RegulatedTier::VerySocial,
        }
    }
}

/// Scenario flags shared by `simulate` and `sweep`
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML tax law (defaults to the law in force)
    #[arg(long)]
    pub law: Option<String>,

    /// Purchase price excluding fees
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Existing build bought for renovation (default: new build)
    #[arg(long)]
    pub existing: bool,

    /// Renovation works (existing builds only)
    #[arg(long, default_value = "0")]
    pub renovation: Decimal,

    /// Market rent per month
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Regulated-rent tier
    #[arg(long, value_enum, default_value = "intermediate")]
    pub tier: TierArg,

    /// Household taxable income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Household quotient parts
    #[arg(long, default_value = "1")]
    pub parts: Decimal,

    /// Yearly charges
    #[arg(long, default_value = "0")]
    pub charges: Decimal,

    /// Furnished-rental amortization rate in percent
    #[arg(long, default_value = "3")]
    pub amortization_rate: Decimal,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<u32>,
}

impl ScenarioArgs {
    fn scenario(&self) -> Result<SimulationInputs, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(inputs) = input::stdin::read_stdin()? {
            return Ok(inputs);
        }

        Ok(SimulationInputs {
            acquisition_price: self.price.ok_or("--price is required (or provide --input)")?,
            property_is_new: !self.existing,
            renovation_cost: self.renovation,
            market_monthly_rent: self.rent.ok_or("--rent is required (or provide --input)")?,
            regime_level: self.tier.into(),
            household_taxable_income: self
                .income
                .ok_or("--income is required (or provide --input)")?,
            household_parts: self.parts,
            annual_charges: self.charges,
            furnished_amortization_rate_percent: self.amortization_rate,
            holding_years: self.years.ok_or("--years is required (or provide --input)")?,
        })
    }
}

/// Arguments for the regime comparison
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let law = input::file::load_law(args.scenario.law.as_deref())?;
    let inputs = args.scenario.scenario()?;
    let result = analyse_regimes(&inputs, &law)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a holding-period sweep
#[derive(Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// First holding period
    #[arg(long, default_value = "1")]
    pub from: u32,

    /// Last holding period (inclusive)
    #[arg(long, default_value = "30")]
    pub to: u32,
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let law = input::file::load_law(args.scenario.law.as_deref())?;
    let base = args.scenario.scenario()?;
    let points = holding_period_sweep(&law, &base, args.from, args.to)?;
    Ok(serde_json::json!({ "results": points }))
}
