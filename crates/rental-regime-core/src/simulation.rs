use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::capital_gains::{capital_gains_tax, sale_basis, CapitalGainResult, SaleBasis};
use crate::comparison::{compare, regime_balance, ComparativeResult};
use crate::inputs::SimulationInputs;
use crate::law::TaxLaw;
use crate::rental::{simulate_period, Household, RegimeSchedule};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentalRegimeResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything computed for one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeReport {
    #[serde(flatten)]
    pub schedule: RegimeSchedule,
    /// Household marginal rate once the first year's positive result is added
    pub marginal_rate_with_rent: Rate,
    pub capital_gain: CapitalGainResult,
    /// Resale price minus acquisition price minus capital-gains tax
    pub net_sale_gain: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Household marginal rate before any rental income
    pub household_marginal_rate: Rate,
    pub sale: SaleBasis,
    pub regulated_rent: RegimeReport,
    pub furnished_rental: RegimeReport,
    pub comparison: ComparativeResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare both regimes for `inputs` under the current law.
pub fn simulate(inputs: &SimulationInputs) -> RentalRegimeResult<ComparativeResult> {
    Ok(simulate_with_law(inputs, &TaxLaw::default())?.comparison)
}

/// Full year-by-year and resale report for `inputs` under `law`.
pub fn simulate_with_law(
    inputs: &SimulationInputs,
    law: &TaxLaw,
) -> RentalRegimeResult<SimulationReport> {
    law.validate()?;

    let sale = sale_basis(&law.capital_gains, inputs)?;
    let period = simulate_period(law, inputs)?;
    let household = Household::new(
        &law.income_tax,
        inputs.household_taxable_income,
        inputs.household_parts,
    )?;

    let regulated_rent = regime_report(law, inputs, &household, &sale, period.regulated_rent)?;
    let furnished_rental =
        regime_report(law, inputs, &household, &sale, period.furnished_rental)?;

    let comparison = compare(
        (&regulated_rent.schedule.totals, &regulated_rent.capital_gain),
        (&furnished_rental.schedule.totals, &furnished_rental.capital_gain),
    );

    tracing::debug!(
        holding_years = inputs.holding_years,
        advantage = %comparison.advantage,
        preferred = ?comparison.preferred,
        "regime comparison complete"
    );

    Ok(SimulationReport {
        household_marginal_rate: household.marginal_rate(Decimal::ZERO)?,
        sale,
        regulated_rent,
        furnished_rental,
        comparison,
    })
}

/// Run the comparison and wrap it with methodology, warnings and metadata.
pub fn analyse_regimes(
    inputs: &SimulationInputs,
    law: &TaxLaw,
) -> RentalRegimeResult<ComputationOutput<SimulationReport>> {
    let start = Instant::now();
    let mut warnings = inputs.warnings();

    let report = simulate_with_law(inputs, law)?;
    warnings.extend(report_warnings(&report));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Regulated-rent vs furnished-rental comparison: year-by-year rental \
         taxation with amortization carry-forward, then resale capital-gains \
         tax with amortization reintegration, abatements and surtax",
        &serde_json::json!({
            "inputs": inputs,
            "law": law.label,
        }),
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn regime_report(
    law: &TaxLaw,
    inputs: &SimulationInputs,
    household: &Household<'_>,
    sale: &SaleBasis,
    schedule: RegimeSchedule,
) -> RentalRegimeResult<RegimeReport> {
    let first_year_result = schedule
        .first_year()
        .map_or(Decimal::ZERO, |y| y.taxable_net_income_or_deficit);
    let marginal_rate_with_rent = household.marginal_rate(first_year_result)?;

    let capital_gain = capital_gains_tax(
        &law.capital_gains,
        sale.gain_before_reintegration,
        schedule.totals.total_amortization,
        inputs.holding_years,
    );
    let net_sale_gain = sale.resale_price - sale.acquisition_price - capital_gain.total_tax_due;
    let balance = regime_balance(&schedule.totals, &capital_gain);

    Ok(RegimeReport {
        schedule,
        marginal_rate_with_rent,
        capital_gain,
        net_sale_gain,
        balance,
    })
}

fn report_warnings(report: &SimulationReport) -> Vec<String> {
    let mut warnings = Vec::new();

    let carried_deficit = report.regulated_rent.schedule.totals.final_carry_forward;
    if carried_deficit > Decimal::ZERO {
        warnings.push(format!(
            "Regulated rent: {carried_deficit} of property deficit is still carried forward at resale \
             (carry-forward is modelled without expiry)"
        ));
    }

    let unused = report.furnished_rental.schedule.totals.final_carry_forward;
    if unused > Decimal::ZERO {
        warnings.push(format!(
            "Furnished rental: {unused} of amortization was never deducted and is lost at resale"
        ));
    }

    if report.regulated_rent.schedule.terms.cap_binds() {
        warnings.push(format!(
            "Regulated rent: yearly amortization capped at {} (computed {})",
            report.regulated_rent.schedule.terms.annual_amortization,
            report.regulated_rent.schedule.terms.computed_amortization
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
