pub mod abatement;
pub mod sale;
pub mod surtax;

pub use abatement::{income_tax_abatement, social_levy_abatement, AbatementSchedule};
pub use sale::{capital_gains_tax, sale_basis, CapitalGainInput, CapitalGainResult, SaleBasis};
pub use surtax::{surtax, SurtaxSchedule};
