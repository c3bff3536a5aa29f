use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::input;

/// Arguments for the household income tax
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Household taxable income
    #[arg(long)]
    pub income: Decimal,

    /// Household quotient parts
    #[arg(long, default_value = "1")]
    pub parts: Decimal,

    /// Path to a JSON or YAML tax law (defaults to the law in force)
    #[arg(long)]
    pub law: Option<String>,
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let law = input::file::load_law(args.law.as_deref())?;
    let schedule = &law.income_tax;

    let tax = schedule.tax(args.income, args.parts)?;
    let marginal_rate = schedule.marginal_rate(args.income, args.parts)?;
    let average_rate = if args.income > Decimal::ZERO {
        tax / args.income
    } else {
        Decimal::ZERO
    };

    Ok(json!({
        "result": {
            "income": args.income,
            "parts": args.parts,
            "tax": tax,
            "marginal_rate": marginal_rate,
            "average_rate": average_rate,
        }
    }))
}
