use clap::Args;
use serde_json::Value;

use crate::input;

/// Arguments for printing a tax law
#[derive(Args)]
pub struct LawArgs {
    /// Validate and echo this JSON or YAML law instead of the law in force
    #[arg(long)]
    pub law: Option<String>,
}

pub fn run_law(args: LawArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let law = input::file::load_law(args.law.as_deref())?;
    Ok(serde_json::to_value(law)?)
}
