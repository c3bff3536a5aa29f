use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inputs::SimulationInputs;
use crate::law::CapitalGainsLaw;
use crate::types::{compound, round_to_unit, Money, Rate, Years};
use crate::RentalRegimeResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Resale figures shared by both regimes (same property, same sale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBasis {
    pub resale_price: Money,
    pub acquisition_price: Money,
    pub notarial_fee_allowance: Money,
    pub renovation_allowance: Money,
    pub corrected_acquisition_cost: Money,
    /// Resale price minus corrected acquisition cost, before any amortization
    /// is added back
    pub gain_before_reintegration: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainResult {
    pub gross_gain_before_reintegration: Money,
    pub reintegrated_amortization: Money,
    pub gross_gain: Money,
    pub abatement_income_tax_fraction: Rate,
    pub abatement_social_fraction: Rate,
    pub taxable_gain_income_tax_base: Money,
    pub taxable_gain_social_base: Money,
    pub income_tax_due: Money,
    pub social_levy_due: Money,
    pub surtax_due: Money,
    pub total_tax_due: Money,
}

/// A single resale gain to tax, independent of any rental simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainInput {
    pub gain_before_reintegration: Money,
    #[serde(default)]
    pub reintegrated_amortization: Money,
    pub holding_years: Years,
}

impl CapitalGainInput {
    pub fn tax(&self, law: &CapitalGainsLaw) -> CapitalGainResult {
        capital_gains_tax(
            law,
            self.gain_before_reintegration,
            self.reintegrated_amortization,
            self.holding_years,
        )
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the resale price and the corrected acquisition cost.
///
/// The property appreciates at a fixed yearly rate from its acquisition basis.
/// The acquisition cost is increased by a flat fee allowance and by
/// renovation: actual works, or beyond the threshold holding period the
/// greater of actual works and a flat allowance.
pub fn sale_basis(
    law: &CapitalGainsLaw,
    inputs: &SimulationInputs,
) -> RentalRegimeResult<SaleBasis> {
    let resale_price = round_to_unit(compound(
        inputs.acquisition_basis(),
        law.annual_appreciation,
        inputs.holding_years,
    )?);

    let price = inputs.acquisition_price;
    let notarial_fee_allowance = price * law.notarial_fee_allowance;
    let actual_works = inputs.effective_renovation_cost();
    let renovation_allowance = if inputs.holding_years > law.renovation_allowance_after_years {
        actual_works.max(price * law.renovation_flat_allowance)
    } else {
        actual_works
    };
    let corrected_acquisition_cost = price + notarial_fee_allowance + renovation_allowance;

    Ok(SaleBasis {
        resale_price,
        acquisition_price: price,
        notarial_fee_allowance,
        renovation_allowance,
        corrected_acquisition_cost,
        gain_before_reintegration: resale_price - corrected_acquisition_cost,
    })
}

/// Tax the resale gain of one regime.
///
/// Amortization deducted during the holding period is added back to the
/// gain. Each base is reduced by its holding-duration abatement, then taxed
/// at its flat rate; the surtax applies to the income-tax base. A gain that
/// is not positive owes nothing.
pub fn capital_gains_tax(
    law: &CapitalGainsLaw,
    gain_before_reintegration: Money,
    reintegrated_amortization: Money,
    holding_years: Years,
) -> CapitalGainResult {
    let gross_gain = gain_before_reintegration + reintegrated_amortization;
    let abatement_ir = law.income_tax_abatement.fraction(holding_years);
    let abatement_ps = law.social_levy_abatement.fraction(holding_years);

    if gross_gain <= Decimal::ZERO {
        return CapitalGainResult {
            gross_gain_before_reintegration: gain_before_reintegration,
            reintegrated_amortization,
            gross_gain,
            abatement_income_tax_fraction: abatement_ir,
            abatement_social_fraction: abatement_ps,
            taxable_gain_income_tax_base: Decimal::ZERO,
            taxable_gain_social_base: Decimal::ZERO,
            income_tax_due: Decimal::ZERO,
            social_levy_due: Decimal::ZERO,
            surtax_due: Decimal::ZERO,
            total_tax_due: Decimal::ZERO,
        };
    }

    let ir_base = gross_gain * (Decimal::ONE - abatement_ir);
    let ps_base = gross_gain * (Decimal::ONE - abatement_ps);
    let income_tax_due = ir_base * law.income_tax_rate;
    let social_levy_due = ps_base * law.social_levy_rate;
    let surtax_due = law.surtax.surtax(ir_base);

    CapitalGainResult {
        gross_gain_before_reintegration: gain_before_reintegration,
        reintegrated_amortization,
        gross_gain,
        abatement_income_tax_fraction: abatement_ir,
        abatement_social_fraction: abatement_ps,
        taxable_gain_income_tax_base: ir_base,
        taxable_gain_social_base: ps_base,
        income_tax_due,
        social_levy_due,
        surtax_due,
        total_tax_due: income_tax_due + social_levy_due + surtax_due,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
