pub mod cache;
pub mod capital_gains;
pub mod comparison;
pub mod error;
pub mod income_tax;
pub mod inputs;
pub mod law;
pub mod rental;
pub mod simulation;
pub mod sweep;
pub mod types;

pub use cache::SimulationCache;
pub use comparison::{ComparativeResult, PreferredRegime};
pub use error::RentalRegimeError;
pub use income_tax::IncomeTaxSchedule;
pub use inputs::SimulationInputs;
pub use law::{RegulatedTier, TaxLaw};
pub use simulation::{analyse_regimes, simulate, simulate_with_law, SimulationReport};
pub use types::*;

/// Standard result type for all rental-regime operations
pub type RentalRegimeResult<T> = Result<T, RentalRegimeError>;
