pub mod capital_gains;
pub mod income_tax;
pub mod law;
pub mod simulate;
