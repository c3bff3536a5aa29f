use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RentalRegimeError;
use crate::income_tax::IncomeTaxSchedule;
use crate::inputs::SimulationInputs;
use crate::law::TaxLaw;
use crate::types::{round_to_unit, Money, Rate, Years};
use crate::RentalRegimeResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Unfurnished letting at a regulated rent, amortizing the property
    RegulatedRent,
    /// Furnished letting at market rent, accounting amortization
    FurnishedRental,
}

/// How a year's amortization interacts with the operating result and what
/// is carried into the next year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmortizationPolicy {
    /// Amortization may push the result below zero. Up to
    /// `annual_deficit_cap` of the deficit offsets general income; the rest
    /// is carried forward against later positive results, without expiry.
    CapWithDeficitCarryforward { annual_deficit_cap: Money },
    /// Amortization is deducted only up to a positive operating result; the
    /// unused part is carried forward indefinitely.
    CapByOperatingResultWithAmortizationCarryforward,
}

/// Static terms of one regime for a given scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTerms {
    pub regime: Regime,
    pub annual_rent: Money,
    /// Discount applied to market rent (0 for furnished rental)
    pub rent_discount_fraction: Rate,
    pub annual_charges: Money,
    pub amortizable_base: Money,
    pub amortization_rate: Rate,
    /// `amortizable_base * amortization_rate`, before any cap
    pub computed_amortization: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_amortization_cap: Option<Money>,
    /// Yearly amortization once the cap is applied
    pub annual_amortization: Money,
    pub social_levy_rate: Rate,
    pub policy: AmortizationPolicy,
}

impl RegimeTerms {
    /// Regulated rent: discounted rent, tier rate on a share of the basis,
    /// yearly ceiling, deficit offset against general income.
    pub fn regulated_rent(law: &TaxLaw, inputs: &SimulationInputs) -> Self {
        let tier = law.tiers.get(inputs.regime_level);
        let monthly =
            round_to_unit(inputs.market_monthly_rent * (Decimal::ONE - tier.rent_discount_fraction));
        let amortizable_base = inputs.acquisition_basis() * law.rental.regulated_amortizable_share;
        let amortization_rate = tier.amortization_rate(inputs.property_is_new);
        let computed_amortization = amortizable_base * amortization_rate;

        Self {
            regime: Regime::RegulatedRent,
            annual_rent: monthly * Decimal::from(12),
            rent_discount_fraction: tier.rent_discount_fraction,
            annual_charges: inputs.annual_charges,
            amortizable_base,
            amortization_rate,
            computed_amortization,
            annual_amortization_cap: Some(tier.annual_amortization_cap),
            annual_amortization: computed_amortization.min(tier.annual_amortization_cap),
            social_levy_rate: law.rental.property_income_social_levy,
            policy: AmortizationPolicy::CapWithDeficitCarryforward {
                annual_deficit_cap: law.rental.annual_deficit_cap,
            },
        }
    }

    /// Furnished rental: market rent, free amortization rate on the full
    /// basis, amortization limited to the operating result.
    pub fn furnished_rental(law: &TaxLaw, inputs: &SimulationInputs) -> Self {
        let amortizable_base = inputs.acquisition_basis();
        let amortization_rate = inputs.furnished_amortization_rate_percent / Decimal::ONE_HUNDRED;
        let computed_amortization = amortizable_base * amortization_rate;

        Self {
            regime: Regime::FurnishedRental,
            annual_rent: inputs.market_monthly_rent * Decimal::from(12),
            rent_discount_fraction: Decimal::ZERO,
            annual_charges: inputs.annual_charges,
            amortizable_base,
            amortization_rate,
            computed_amortization,
            annual_amortization_cap: None,
            annual_amortization: computed_amortization,
            social_levy_rate: law.rental.furnished_social_levy,
            policy: AmortizationPolicy::CapByOperatingResultWithAmortizationCarryforward,
        }
    }

    pub fn for_regime(regime: Regime, law: &TaxLaw, inputs: &SimulationInputs) -> Self {
        match regime {
            Regime::RegulatedRent => Self::regulated_rent(law, inputs),
            Regime::FurnishedRental => Self::furnished_rental(law, inputs),
        }
    }

    pub fn monthly_rent(&self) -> Money {
        self.annual_rent / Decimal::from(12)
    }

    /// True when the yearly ceiling, not the rate, sets the amortization.
    pub fn cap_binds(&self) -> bool {
        self.annual_amortization < self.computed_amortization
    }

    /// Rent minus charges, before amortization.
    pub fn operating_result(&self) -> Money {
        self.annual_rent - self.annual_charges
    }
}

/// Household the rental result is stacked onto.
#[derive(Debug, Clone, Copy)]
pub struct Household<'a> {
    pub schedule: &'a IncomeTaxSchedule,
    pub taxable_income: Money,
    pub parts: Decimal,
}

impl<'a> Household<'a> {
    pub fn new(
        schedule: &'a IncomeTaxSchedule,
        taxable_income: Money,
        parts: Decimal,
    ) -> RentalRegimeResult<Self> {
        if parts <= Decimal::ZERO {
            return Err(RentalRegimeError::DivisionByZero {
                context: format!("household quotient (household_parts = {parts})"),
            });
        }
        Ok(Self {
            schedule,
            taxable_income,
            parts,
        })
    }

    /// Income-tax change from adding `extra` to the household income.
    pub fn tax_delta(&self, extra: Money) -> RentalRegimeResult<Money> {
        self.schedule
            .tax_delta(self.taxable_income, extra, self.parts)
    }

    pub fn marginal_rate(&self, extra: Money) -> RentalRegimeResult<Rate> {
        self.schedule
            .marginal_rate(self.taxable_income + extra.max(Decimal::ZERO), self.parts)
    }
}

/// State threaded from one year to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeState {
    pub remaining_amortizable_base: Money,
    /// Carried deficit (regulated rent) or unused amortization (furnished)
    pub carry_forward: Money,
}

impl RegimeState {
    pub fn opening(terms: &RegimeTerms) -> Self {
        Self {
            remaining_amortizable_base: terms.amortizable_base,
            carry_forward: Decimal::ZERO,
        }
    }
}

/// One regime, one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualResult {
    pub year: Years,
    pub gross_rent: Money,
    pub charges: Money,
    pub amortization_deducted: Money,
    /// Negative in a regulated-rent deficit year
    pub taxable_net_income_or_deficit: Money,
    /// Deficit offset against general income this year
    pub imputed_deficit: Money,
    /// Earlier deficit absorbed by this year's positive result
    pub deficit_absorbed: Money,
    /// Negative when the year produces a tax saving
    pub income_tax_delta: Money,
    pub social_levy: Money,
    pub total_tax: Money,
    pub net_income: Money,
    /// Balance carried into next year after this one
    pub carry_forward_balance: Money,
    pub remaining_amortizable_base: Money,
}

// ---------------------------------------------------------------------------
// Annual step
// ---------------------------------------------------------------------------

/// Tax outcome of the policy-specific part of the step.
struct PolicyOutcome {
    amortization_deducted: Money,
    taxable: Money,
    imputed_deficit: Money,
    deficit_absorbed: Money,
    income_tax_delta: Money,
    social_levy: Money,
}

/// Advance `state` by one year under `terms` and return that year's result.
pub fn annual_step(
    terms: &RegimeTerms,
    household: &Household<'_>,
    state: &mut RegimeState,
    year: Years,
) -> RentalRegimeResult<AnnualResult> {
    let amortization = terms
        .annual_amortization
        .min(state.remaining_amortizable_base)
        .max(Decimal::ZERO);
    state.remaining_amortizable_base =
        (state.remaining_amortizable_base - amortization).max(Decimal::ZERO);

    let outcome = match &terms.policy {
        AmortizationPolicy::CapWithDeficitCarryforward { annual_deficit_cap } => {
            regulated_rent_year(terms, household, state, amortization, *annual_deficit_cap)?
        }
        AmortizationPolicy::CapByOperatingResultWithAmortizationCarryforward => {
            furnished_rental_year(terms, household, state, amortization)?
        }
    };

    let total_tax = outcome.income_tax_delta + outcome.social_levy;

    Ok(AnnualResult {
        year,
        gross_rent: terms.annual_rent,
        charges: terms.annual_charges,
        amortization_deducted: outcome.amortization_deducted,
        taxable_net_income_or_deficit: outcome.taxable,
        imputed_deficit: outcome.imputed_deficit,
        deficit_absorbed: outcome.deficit_absorbed,
        income_tax_delta: outcome.income_tax_delta,
        social_levy: outcome.social_levy,
        total_tax,
        net_income: terms.operating_result() - total_tax,
        carry_forward_balance: state.carry_forward,
        remaining_amortizable_base: state.remaining_amortizable_base,
    })
}

/// Regulated rent: the full year's amortization is deducted, a positive net
/// first absorbs the carried deficit, a negative net is offset against
/// general income up to the yearly cap and the excess carried forward.
fn regulated_rent_year(
    terms: &RegimeTerms,
    household: &Household<'_>,
    state: &mut RegimeState,
    amortization: Money,
    annual_deficit_cap: Money,
) -> RentalRegimeResult<PolicyOutcome> {
    let mut net = terms.operating_result() - amortization;

    let mut deficit_absorbed = Decimal::ZERO;
    if net > Decimal::ZERO && state.carry_forward > Decimal::ZERO {
        deficit_absorbed = net.min(state.carry_forward);
        net -= deficit_absorbed;
        state.carry_forward -= deficit_absorbed;
    }

    if net >= Decimal::ZERO {
        return Ok(PolicyOutcome {
            amortization_deducted: amortization,
            taxable: net,
            imputed_deficit: Decimal::ZERO,
            deficit_absorbed,
            income_tax_delta: household.tax_delta(net)?,
            social_levy: net * terms.social_levy_rate,
        });
    }

    let deficit = net.abs();
    let imputed = deficit.min(annual_deficit_cap);
    state.carry_forward += deficit - imputed;

    Ok(PolicyOutcome {
        amortization_deducted: amortization,
        taxable: net,
        imputed_deficit: imputed,
        deficit_absorbed,
        income_tax_delta: household.tax_delta(-imputed)?,
        social_levy: Decimal::ZERO,
    })
}

/// Furnished rental: this year's amortization joins the carried-forward
/// balance and is deducted only up to a positive operating result.
fn furnished_rental_year(
    terms: &RegimeTerms,
    household: &Household<'_>,
    state: &mut RegimeState,
    amortization: Money,
) -> RentalRegimeResult<PolicyOutcome> {
    let available = amortization + state.carry_forward;
    let operating = terms.operating_result();

    let deducted = if operating > Decimal::ZERO {
        available.min(operating)
    } else {
        Decimal::ZERO
    };
    state.carry_forward = available - deducted;

    let taxable = (operating - deducted).max(Decimal::ZERO);
    let (income_tax_delta, social_levy) = if taxable > Decimal::ZERO {
        (household.tax_delta(taxable)?, taxable * terms.social_levy_rate)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    Ok(PolicyOutcome {
        amortization_deducted: deducted,
        taxable,
        imputed_deficit: Decimal::ZERO,
        deficit_absorbed: Decimal::ZERO,
        income_tax_delta,
        social_levy,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
