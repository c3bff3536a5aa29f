//! What-if sweeps: independent simulations run side by side.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::comparison::PreferredRegime;
use crate::error::RentalRegimeError;
use crate::inputs::SimulationInputs;
use crate::law::TaxLaw;
use crate::simulation::{simulate_with_law, SimulationReport};
use crate::types::{Money, Years};
use crate::RentalRegimeResult;

/// Outcome of the comparison for one holding period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriodPoint {
    pub holding_years: Years,
    pub regime_a_total_balance: Money,
    pub regime_b_total_balance: Money,
    pub regime_a_capital_gains_tax: Money,
    pub regime_b_capital_gains_tax: Money,
    pub advantage: Money,
    pub preferred: PreferredRegime,
}

/// Simulate every scenario independently, in parallel when enabled.
/// Results keep the order of `scenarios`.
pub fn simulate_many(
    law: &TaxLaw,
    scenarios: &[SimulationInputs],
) -> RentalRegimeResult<Vec<RentalRegimeResult<SimulationReport>>> {
    law.validate()?;

    #[cfg(feature = "parallel")]
    let reports = scenarios
        .par_iter()
        .map(|inputs| simulate_with_law(inputs, law))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports = scenarios
        .iter()
        .map(|inputs| simulate_with_law(inputs, law))
        .collect();

    Ok(reports)
}

/// Re-run `base` for every holding period in `from..=to`.
pub fn holding_period_sweep(
    law: &TaxLaw,
    base: &SimulationInputs,
    from: Years,
    to: Years,
) -> RentalRegimeResult<Vec<HoldingPeriodPoint>> {
    if from == 0 {
        return Err(RentalRegimeError::InvalidInput {
            field: "from".into(),
            reason: "Sweep must start at a holding period of at least 1 year".into(),
        });
    }
    if from > to {
        return Err(RentalRegimeError::InvalidInput {
            field: "to".into(),
            reason: format!("Sweep end {to} is before its start {from}"),
        });
    }

    let scenarios: Vec<SimulationInputs> = (from..=to)
        .map(|holding_years| SimulationInputs {
            holding_years,
            ..base.clone()
        })
        .collect();

    tracing::info!(from, to, points = scenarios.len(), "starting holding period sweep");

    simulate_many(law, &scenarios)?
        .into_iter()
        .zip(scenarios.iter())
        .map(|(report, inputs)| {
            let report = report?;
            Ok(HoldingPeriodPoint {
                holding_years: inputs.holding_years,
                regime_a_total_balance: report.comparison.regime_a_total_balance,
                regime_b_total_balance: report.comparison.regime_b_total_balance,
                regime_a_capital_gains_tax: report.regulated_rent.capital_gain.total_tax_due,
                regime_b_capital_gains_tax: report.furnished_rental.capital_gain.total_tax_due,
                advantage: report.comparison.advantage,
                preferred: report.comparison.preferred,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law::RegulatedTier;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn scenario() -> SimulationInputs {
        SimulationInputs {
            acquisition_price: dec!(200000),
            property_is_new: true,
            renovation_cost: Decimal::ZERO,
            market_monthly_rent: dec!(800),
            regime_level: RegulatedTier::Intermediate,
            household_taxable_income: dec!(35000),
            household_parts: Decimal::ONE,
            annual_charges: dec!(2400),
            furnished_amortization_rate_percent: dec!(3.0),
            holding_years: 15,
        }
    }

    #[test]
    fn test_sweep_covers_range_in_order() {
        let points = holding_period_sweep(&TaxLaw::default(), &scenario(), 1, 30).unwrap();
        assert_eq!(points.len(), 30);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.holding_years, i as u32 + 1);
            assert_eq!(p.advantage, p.regime_b_total_balance - p.regime_a_total_balance);
        }
        // exempt from both capital-gains bases after 30 years
        assert_eq!(points[29].regime_a_capital_gains_tax, Decimal::ZERO);
        assert_eq!(points[29].regime_b_capital_gains_tax, Decimal::ZERO);
    }

    #[test]
    fn test_sweep_point_matches_single_run() {
        let points = holding_period_sweep(&TaxLaw::default(), &scenario(), 15, 15).unwrap();
        let single = simulate_with_law(&scenario(), &TaxLaw::default()).unwrap();
        assert_eq!(points[0].advantage, single.comparison.advantage);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let law = TaxLaw::default();
        assert!(holding_period_sweep(&law, &scenario(), 0, 10).is_err());
        assert!(holding_period_sweep(&law, &scenario(), 10, 5).is_err());
    }

    #[test]
    fn test_simulate_many_keeps_individual_errors() {
        let mut bad = scenario();
        bad.household_parts = Decimal::ZERO;
        let results = simulate_many(&TaxLaw::default(), &[scenario(), bad]).unwrap();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
