mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::capital_gains::CapitalGainsArgs;
use commands::income_tax::IncomeTaxArgs;
use commands::law::LawArgs;
use commands::simulate::{SimulateArgs, SweepArgs};

/// Regulated-rent vs furnished-rental tax comparison
#[derive(Parser)]
#[command(
    name = "rrc",
    version,
    about = "Regulated-rent vs furnished-rental tax comparison",
    long_about = "A CLI comparing the after-tax outcome of renting a property under a \
                  regulated-rent amortization regime or as a furnished rental, including \
                  income tax, social levies and capital-gains tax at resale, with decimal \
                  precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter for stderr diagnostics (overrides RUST_LOG), e.g. "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare both regimes over a holding period and at resale
    Simulate(SimulateArgs),
    /// Household income tax and marginal rate
    IncomeTax(IncomeTaxArgs),
    /// Tax a single resale gain (abatements, levies, surtax)
    CapitalGains(CapitalGainsArgs),
    /// Re-run a scenario over a range of holding periods
    Sweep(SweepArgs),
    /// Print the tax law in force
    Law(LawArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::IncomeTax(args) => commands::income_tax::run_income_tax(args),
        Commands::CapitalGains(args) => commands::capital_gains::run_capital_gains(args),
        Commands::Sweep(args) => commands::simulate::run_sweep(args),
        Commands::Law(args) => commands::law::run_law(args),
        Commands::Version => {
            println!("rrc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
