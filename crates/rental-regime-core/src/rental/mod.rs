pub mod regime;
pub mod simulator;

pub use regime::{
    annual_step, AmortizationPolicy, AnnualResult, Household, Regime, RegimeState, RegimeTerms,
};
pub use simulator::{
    cumulative_net_income, simulate_period, simulate_regime, PeriodSimulation, PeriodTotals,
    RegimeSchedule,
};
