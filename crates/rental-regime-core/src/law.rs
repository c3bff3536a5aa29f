//! Tax-law parameters for one fiscal year.
//!
//! Every statutory constant the engine relies on lives here so that a new
//! year's law can be swapped in (or loaded from JSON) without touching the
//! algorithms. `TaxLaw::default()` is the current schedule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::capital_gains::abatement::AbatementSchedule;
use crate::capital_gains::surtax::SurtaxSchedule;
use crate::error::RentalRegimeError;
use crate::income_tax::IncomeTaxSchedule;
use crate::types::{Money, Rate, Years};
use crate::RentalRegimeResult;

// ---------------------------------------------------------------------------
// Statutory constants
// ---------------------------------------------------------------------------

pub const PROPERTY_INCOME_SOCIAL_LEVY: Rate = dec!(0.172);
pub const FURNISHED_SOCIAL_LEVY: Rate = dec!(0.186);
pub const ANNUAL_DEFICIT_CAP: Money = dec!(10700);
pub const REGULATED_AMORTIZABLE_SHARE: Rate = dec!(0.80);

pub const CAPITAL_GAINS_INCOME_TAX_RATE: Rate = dec!(0.19);
pub const CAPITAL_GAINS_SOCIAL_LEVY: Rate = dec!(0.172);
pub const ANNUAL_APPRECIATION: Rate = dec!(0.016);
pub const NOTARIAL_FEE_ALLOWANCE: Rate = dec!(0.075);
pub const RENOVATION_FLAT_ALLOWANCE: Rate = dec!(0.15);
pub const RENOVATION_ALLOWANCE_AFTER_YEARS: Years = 5;

// ---------------------------------------------------------------------------
// Regulated-rent tiers
// ---------------------------------------------------------------------------

/// Rent-control commitment chosen for the regulated-rent regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatedTier {
    Intermediate,
    Social,
    VerySocial,
}

impl RegulatedTier {
    pub const ALL: [RegulatedTier; 3] = [
        RegulatedTier::Intermediate,
        RegulatedTier::Social,
        RegulatedTier::VerySocial,
    ];
}

/// Amortization and rent-discount terms of one regulated tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeLevelConfig {
    pub label: String,
    /// Annual amortization rate on the amortizable base, new build
    pub new_build_rate: Rate,
    /// Annual amortization rate on the amortizable base, existing build
    pub existing_build_rate: Rate,
    /// Ceiling on one year's amortization
    pub annual_amortization_cap: Money,
    /// Discount below market rent the landlord commits to
    pub rent_discount_fraction: Rate,
}

impl RegimeLevelConfig {
    pub fn amortization_rate(&self, property_is_new: bool) -> Rate {
        if property_is_new {
            self.new_build_rate
        } else {
            self.existing_build_rate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub intermediate: RegimeLevelConfig,
    pub social: RegimeLevelConfig,
    pub very_social: RegimeLevelConfig,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            intermediate: RegimeLevelConfig {
                label: "Intermediate".into(),
                new_build_rate: dec!(0.035),
                existing_build_rate: dec!(0.03),
                annual_amortization_cap: dec!(8000),
                rent_discount_fraction: dec!(0.15),
            },
            social: RegimeLevelConfig {
                label: "Social".into(),
                new_build_rate: dec!(0.045),
                existing_build_rate: dec!(0.035),
                annual_amortization_cap: dec!(10000),
                rent_discount_fraction: dec!(0.30),
            },
            very_social: RegimeLevelConfig {
                label: "Very social".into(),
                new_build_rate: dec!(0.055),
                existing_build_rate: dec!(0.04),
                annual_amortization_cap: dec!(12000),
                rent_discount_fraction: dec!(0.45),
            },
        }
    }
}

impl TierTable {
    pub fn get(&self, tier: RegulatedTier) -> &RegimeLevelConfig {
        match tier {
            RegulatedTier::Intermediate => &self.intermediate,
            RegulatedTier::Social => &self.social,
            RegulatedTier::VerySocial => &self.very_social,
        }
    }

    fn validate(&self) -> RentalRegimeResult<()> {
        for tier in RegulatedTier::ALL {
            let cfg = self.get(tier);
            let rates = [
                cfg.new_build_rate,
                cfg.existing_build_rate,
                cfg.rent_discount_fraction,
            ];
            if rates.iter().any(|r| *r < Decimal::ZERO || *r > Decimal::ONE) {
                return Err(RentalRegimeError::InvalidSchedule(format!(
                    "tier '{}' has a rate outside [0, 1]",
                    cfg.label
                )));
            }
            if cfg.annual_amortization_cap < Decimal::ZERO {
                return Err(RentalRegimeError::InvalidSchedule(format!(
                    "tier '{}' has a negative amortization cap",
                    cfg.label
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rental income levies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalLevies {
    /// Social levy on positive unfurnished property income
    pub property_income_social_levy: Rate,
    /// Social levy on positive furnished-rental profit
    pub furnished_social_levy: Rate,
    /// Yearly ceiling on a property deficit offset against general income
    pub annual_deficit_cap: Money,
    /// Share of the acquisition basis amortizable under regulated rent
    pub regulated_amortizable_share: Rate,
}

impl Default for RentalLevies {
    fn default() -> Self {
        Self {
            property_income_social_levy: PROPERTY_INCOME_SOCIAL_LEVY,
            furnished_social_levy: FURNISHED_SOCIAL_LEVY,
            annual_deficit_cap: ANNUAL_DEFICIT_CAP,
            regulated_amortizable_share: REGULATED_AMORTIZABLE_SHARE,
        }
    }
}

// ---------------------------------------------------------------------------
// Capital gains
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsLaw {
    pub income_tax_rate: Rate,
    pub social_levy_rate: Rate,
    pub income_tax_abatement: AbatementSchedule,
    pub social_levy_abatement: AbatementSchedule,
    pub surtax: SurtaxSchedule,
    /// Assumed yearly appreciation of the property up to resale
    pub annual_appreciation: Rate,
    /// Flat acquisition-fee allowance, as a share of the price
    pub notarial_fee_allowance: Rate,
    /// Flat renovation allowance, as a share of the price
    pub renovation_flat_allowance: Rate,
    /// The flat renovation allowance is only available beyond this many years
    pub renovation_allowance_after_years: Years,
}

impl Default for CapitalGainsLaw {
    fn default() -> Self {
        Self {
            income_tax_rate: CAPITAL_GAINS_INCOME_TAX_RATE,
            social_levy_rate: CAPITAL_GAINS_SOCIAL_LEVY,
            income_tax_abatement: AbatementSchedule::income_tax(),
            social_levy_abatement: AbatementSchedule::social_levy(),
            surtax: SurtaxSchedule::statutory(),
            annual_appreciation: ANNUAL_APPRECIATION,
            notarial_fee_allowance: NOTARIAL_FEE_ALLOWANCE,
            renovation_flat_allowance: RENOVATION_FLAT_ALLOWANCE,
            renovation_allowance_after_years: RENOVATION_ALLOWANCE_AFTER_YEARS,
        }
    }
}

// ---------------------------------------------------------------------------
// Full law
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLaw {
    pub label: String,
    pub income_tax: IncomeTaxSchedule,
    pub tiers: TierTable,
    pub rental: RentalLevies,
    pub capital_gains: CapitalGainsLaw,
}

impl Default for TaxLaw {
    fn default() -> Self {
        Self {
            label: "Current schedule".into(),
            income_tax: IncomeTaxSchedule::default(),
            tiers: TierTable::default(),
            rental: RentalLevies::default(),
            capital_gains: CapitalGainsLaw::default(),
        }
    }
}

impl TaxLaw {
    /// Check every table for internal consistency. A law that fails here is a
    /// configuration bug, not something a simulation can recover from.
    pub fn validate(&self) -> RentalRegimeResult<()> {
        self.income_tax.validate()?;
        self.tiers.validate()?;
        self.capital_gains.surtax.validate()?;
        self.capital_gains
            .income_tax_abatement
            .validate("income tax")?;
        self.capital_gains
            .social_levy_abatement
            .validate("social levy")?;

        let rates = [
            ("property_income_social_levy", self.rental.property_income_social_levy),
            ("furnished_social_levy", self.rental.furnished_social_levy),
            ("regulated_amortizable_share", self.rental.regulated_amortizable_share),
            ("income_tax_rate", self.capital_gains.income_tax_rate),
            ("social_levy_rate", self.capital_gains.social_levy_rate),
            ("notarial_fee_allowance", self.capital_gains.notarial_fee_allowance),
            ("renovation_flat_allowance", self.capital_gains.renovation_flat_allowance),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(RentalRegimeError::InvalidSchedule(format!(
                    "{name} = {rate} is outside [0, 1]"
                )));
            }
        }
        if self.rental.annual_deficit_cap < Decimal::ZERO {
            return Err(RentalRegimeError::InvalidSchedule(
                "annual_deficit_cap must be non-negative".into(),
            ));
        }
        if self.capital_gains.annual_appreciation <= dec!(-1) {
            return Err(RentalRegimeError::InvalidSchedule(
                "annual_appreciation must be greater than -100%".into(),
            ));
        }
        Ok(())
    }
}
