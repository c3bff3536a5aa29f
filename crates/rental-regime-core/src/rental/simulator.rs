use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inputs::SimulationInputs;
use crate::law::TaxLaw;
use crate::rental::regime::{annual_step, AnnualResult, Household, Regime, RegimeState, RegimeTerms};
use crate::types::{Money, Years};
use crate::RentalRegimeResult;

/// Sums over the holding period for one regime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub years: Years,
    pub total_rent: Money,
    pub total_charges: Money,
    /// Cumulative amortization deducted; reintegrated into the resale gain
    pub total_amortization: Money,
    pub total_imputed_deficit: Money,
    pub total_income_tax: Money,
    pub total_social_levy: Money,
    pub total_tax: Money,
    pub total_net_income: Money,
    /// Carry-forward balance at the end of each year
    pub carry_forward_history: Vec<Money>,
    pub final_carry_forward: Money,
    pub final_remaining_base: Money,
}

impl PeriodTotals {
    pub fn from_years(years: &[AnnualResult]) -> Self {
        let mut totals = years.iter().fold(PeriodTotals::default(), |mut acc, y| {
            acc.years += 1;
            acc.total_rent += y.gross_rent;
            acc.total_charges += y.charges;
            acc.total_amortization += y.amortization_deducted;
            acc.total_imputed_deficit += y.imputed_deficit;
            acc.total_income_tax += y.income_tax_delta;
            acc.total_social_levy += y.social_levy;
            acc.total_tax += y.total_tax;
            acc.total_net_income += y.net_income;
            acc.carry_forward_history.push(y.carry_forward_balance);
            acc
        });
        if let Some(last) = years.last() {
            totals.final_carry_forward = last.carry_forward_balance;
            totals.final_remaining_base = last.remaining_amortizable_base;
        }
        totals
    }
}

/// Year-by-year run of one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSchedule {
    pub terms: RegimeTerms,
    pub years: Vec<AnnualResult>,
    pub totals: PeriodTotals,
}

impl RegimeSchedule {
    pub fn first_year(&self) -> Option<&AnnualResult> {
        self.years.first()
    }
}

/// Both regimes over the same holding period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSimulation {
    pub regulated_rent: RegimeSchedule,
    pub furnished_rental: RegimeSchedule,
}

/// Run one regime for exactly `holding_years` years from its opening state.
pub fn simulate_regime(
    terms: RegimeTerms,
    household: &Household<'_>,
    holding_years: Years,
) -> RentalRegimeResult<RegimeSchedule> {
    let mut state = RegimeState::opening(&terms);
    let mut years = Vec::with_capacity(holding_years as usize);

    for year in 1..=holding_years {
        let result = annual_step(&terms, household, &mut state, year)?;
        tracing::trace!(
            regime = ?terms.regime,
            year,
            taxable = %result.taxable_net_income_or_deficit,
            total_tax = %result.total_tax,
            carry_forward = %result.carry_forward_balance,
            "simulated rental year"
        );
        years.push(result);
    }

    let totals = PeriodTotals::from_years(&years);
    Ok(RegimeSchedule {
        terms,
        years,
        totals,
    })
}

/// Run both regimes independently over the scenario's holding period.
pub fn simulate_period(
    law: &TaxLaw,
    inputs: &SimulationInputs,
) -> RentalRegimeResult<PeriodSimulation> {
    let household = Household::new(
        &law.income_tax,
        inputs.household_taxable_income,
        inputs.household_parts,
    )?;

    let regulated_rent = simulate_regime(
        RegimeTerms::for_regime(Regime::RegulatedRent, law, inputs),
        &household,
        inputs.holding_years,
    )?;
    let furnished_rental = simulate_regime(
        RegimeTerms::for_regime(Regime::FurnishedRental, law, inputs),
        &household,
        inputs.holding_years,
    )?;

    tracing::debug!(
        holding_years = inputs.holding_years,
        regulated_tax = %regulated_rent.totals.total_tax,
        furnished_tax = %furnished_rental.totals.total_tax,
        "rental period simulated"
    );

    Ok(PeriodSimulation {
        regulated_rent,
        furnished_rental,
    })
}

/// Cumulative rent collected net of charges and taxes over the period.
pub fn cumulative_net_income(totals: &PeriodTotals) -> Money {
    totals.total_rent - totals.total_charges - totals.total_tax
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law::RegulatedTier;
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    fn sample_inputs() -> SimulationInputs {
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
    fn test_runs_exactly_holding_years() {
        let sim = simulate_period(&TaxLaw::default(), &sample_inputs()).unwrap();
        assert_eq!(sim.regulated_rent.years.len(), 15);
        assert_eq!(sim.furnished_rental.years.len(), 15);
        assert_eq!(sim.regulated_rent.totals.years, 15);
        assert_eq!(sim.furnished_rental.totals.carry_forward_history.len(), 15);
    }

    #[test]
    fn test_scenario_totals() {
        let sim = simulate_period(&TaxLaw::default(), &sample_inputs()).unwrap();
        let a = &sim.regulated_rent.totals;
        let b = &sim.furnished_rental.totals;

        assert_eq!(a.total_rent, dec!(122400));
        assert_eq!(b.total_rent, dec!(144000));
        assert_eq!(a.total_amortization, dec!(84000));
        assert_eq!(b.total_amortization, dec!(90000));
        // 15 * (48 + 27.52) and 15 * (360 + 223.2)
        assert_eq!(a.total_tax, dec!(1132.80));
        assert_eq!(b.total_tax, dec!(8748.00));
        assert_eq!(a.final_remaining_base, dec!(76000));
        assert_eq!(b.final_remaining_base, dec!(110000));
    }

    #[test]
    fn test_zero_holding_years_is_empty() {
        let mut input = sample_inputs();
        input.holding_years = 0;
        let sim = simulate_period(&TaxLaw::default(), &input).unwrap();
        assert!(sim.regulated_rent.years.is_empty());
        assert_eq!(sim.regulated_rent.totals, PeriodTotals::default());
    }

    #[test]
    fn test_carried_deficit_history_grows_then_absorbs() {
        let mut input = sample_inputs();
        input.annual_charges = dec!(20000);
        input.holding_years = 3;
        let sim = simulate_period(&TaxLaw::default(), &input).unwrap();
        // -17440 each year: 6740 carried each year, never absorbed
        assert_eq!(
            sim.regulated_rent.totals.carry_forward_history,
            vec![dec!(6740), dec!(13480), dec!(20220)]
        );
        assert_eq!(sim.regulated_rent.totals.final_carry_forward, dec!(20220));
    }

    #[test]
    fn test_furnished_carry_forward_used_once_base_exhausted() {
        let mut input = sample_inputs();
        input.furnished_amortization_rate_percent = dec!(5);
        input.holding_years = 25;
        let sim = simulate_period(&TaxLaw::default(), &input).unwrap();
        let b = &sim.furnished_rental;
        // 10000/year for 20 years exhausts the base; 7200 deducted per year
        assert_eq!(b.totals.total_amortization, dec!(180000));
        assert_eq!(b.years[19].carry_forward_balance, dec!(56000));
        assert_eq!(b.years[20].amortization_deducted, dec!(7200));
        assert_eq!(b.totals.final_carry_forward, dec!(20000));
        assert_eq!(b.totals.final_remaining_base, Decimal::ZERO);
    }

    #[test]
    fn test_zero_parts_fails() {
        let mut input = sample_inputs();
        input.household_parts = Decimal::ZERO;
        assert!(simulate_period(&TaxLaw::default(), &input).is_err());
    }

    proptest! {
        #[test]
        fn prop_totals_match_year_sums(
            charges in 0u32..30_000,
            rent in 0u32..3_000,
            years in 1u32..35,
        ) {
            let mut input = sample_inputs();
            input.annual_charges = Decimal::from(charges);
            input.market_monthly_rent = Decimal::from(rent);
            input.holding_years = years;
            let sim = simulate_period(&TaxLaw::default(), &input).unwrap();
            for schedule in [&sim.regulated_rent, &sim.furnished_rental] {
                let tax: Decimal = schedule.years.iter().map(|y| y.total_tax).sum();
                let amort: Decimal = schedule.years.iter().map(|y| y.amortization_deducted).sum();
                prop_assert_eq!(tax, schedule.totals.total_tax);
                prop_assert_eq!(amort, schedule.totals.total_amortization);
                prop_assert_eq!(
                    cumulative_net_income(&schedule.totals),
                    schedule.totals.total_net_income
                );
            }
        }
    }
}
