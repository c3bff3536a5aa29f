use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::law::RegulatedTier;
use crate::types::{Money, Rate, Years};

/// One what-if scenario: a property, a household and a holding period.
///
/// Inputs are assumed validated by the caller. The engine only refuses a
/// non-positive `household_parts` (it divides by it) and otherwise reports
/// oddities as warnings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationInputs {
    /// Purchase price excluding acquisition fees
    pub acquisition_price: Money,
    /// New build (true) or existing build bought for renovation (false)
    pub property_is_new: bool,
    /// Renovation works; only counted for existing builds
    #[serde(default)]
    pub renovation_cost: Money,
    /// Unregulated market rent per month
    pub market_monthly_rent: Money,
    /// Regulated-rent commitment tier
    pub regime_level: RegulatedTier,
    /// Household taxable income before any rental result
    pub household_taxable_income: Money,
    /// Household quotient divisor
    #[serde(default = "default_parts")]
    pub household_parts: Decimal,
    /// Yearly charges (property tax, insurance, management)
    pub annual_charges: Money,
    /// Furnished-rental accounting amortization rate in percent (3.0 = 3 %)
    pub furnished_amortization_rate_percent: Rate,
    pub holding_years: Years,
}

fn default_parts() -> Decimal {
    Decimal::ONE
}

impl SimulationInputs {
    /// Value the property is carried at: price, plus renovation for an
    /// existing build.
    pub fn acquisition_basis(&self) -> Money {
        if self.property_is_new {
            self.acquisition_price
        } else {
            self.acquisition_price + self.renovation_cost
        }
    }

    /// Renovation cost actually attributable to the property.
    pub fn effective_renovation_cost(&self) -> Money {
        if self.property_is_new {
            Decimal::ZERO
        } else {
            self.renovation_cost
        }
    }

    /// Non-fatal oddities worth surfacing to the caller.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let amounts = [
            ("acquisition_price", self.acquisition_price),
            ("renovation_cost", self.renovation_cost),
            ("market_monthly_rent", self.market_monthly_rent),
            ("household_taxable_income", self.household_taxable_income),
            ("annual_charges", self.annual_charges),
            (
                "furnished_amortization_rate_percent",
                self.furnished_amortization_rate_percent,
            ),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                warnings.push(format!(
                    "{field} is negative ({value}); results are not meaningful"
                ));
            }
        }
        if self.holding_years == 0 {
            warnings.push(
                "holding_years is 0: no rental year is simulated and the resale happens immediately"
                    .into(),
            );
        }
        if self.property_is_new && self.renovation_cost > Decimal::ZERO {
            warnings.push(format!(
                "renovation_cost {} is ignored for a new build",
                self.renovation_cost
            ));
        }
        warnings
    }
}
