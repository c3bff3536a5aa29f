use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RentalRegimeError;
use crate::types::{Rate, Years};
use crate::RentalRegimeResult;

/// Linear accrual of `rate_per_year` for every full year held beyond
/// `after_year`, counted for at most `max_years` years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualTier {
    pub after_year: Years,
    pub max_years: Years,
    pub rate_per_year: Rate,
}

/// One-off abatement granted once the holding period reaches `from_year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatAbatement {
    pub from_year: Years,
    pub amount: Rate,
}

/// Holding-duration abatement for one tax base (income tax or social levies).
///
/// The fraction is the sum of all accrual tiers and reached flat steps,
/// clamped to 1. From `full_exemption_year` on the gain is exempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbatementSchedule {
    pub full_exemption_year: Years,
    pub tiers: Vec<AccrualTier>,
    #[serde(default)]
    pub flat_steps: Vec<FlatAbatement>,
}

impl AbatementSchedule {
    /// Income-tax base: 6 % per year from year 6 to 21, exempt at 22 years.
    pub fn income_tax() -> Self {
        Self {
            full_exemption_year: 22,
            tiers: vec![AccrualTier {
                after_year: 5,
                max_years: 16,
                rate_per_year: dec!(0.06),
            }],
            flat_steps: Vec::new(),
        }
    }

    /// Social-levy base: 1.65 % per year from year 6 to 21, 1.6 % at year 22,
    /// 9 % per year beyond 22, exempt at 30 years.
    pub fn social_levy() -> Self {
        Self {
            full_exemption_year: 30,
            tiers: vec![
                AccrualTier {
                    after_year: 5,
                    max_years: 16,
                    rate_per_year: dec!(0.0165),
                },
                AccrualTier {
                    after_year: 22,
                    max_years: 8,
                    rate_per_year: dec!(0.09),
                },
            ],
            flat_steps: vec![FlatAbatement {
                from_year: 22,
                amount: dec!(0.016),
            }],
        }
    }

    pub fn validate(&self, name: &str) -> RentalRegimeResult<()> {
        if self.full_exemption_year == 0 {
            return Err(RentalRegimeError::InvalidSchedule(format!(
                "{name} abatement exemption year must be positive"
            )));
        }
        let negative_tier = self.tiers.iter().any(|t| t.rate_per_year < Decimal::ZERO);
        let negative_step = self.flat_steps.iter().any(|s| s.amount < Decimal::ZERO);
        if negative_tier || negative_step {
            return Err(RentalRegimeError::InvalidSchedule(format!(
                "{name} abatement rates must be non-negative"
            )));
        }
        Ok(())
    }

    /// Fraction of the gain exempted after `holding_years` full years.
    pub fn fraction(&self, holding_years: Years) -> Rate {
        if holding_years >= self.full_exemption_year {
            return Decimal::ONE;
        }

        let accrued: Decimal = self
            .tiers
            .iter()
            .map(|tier| {
                let years = holding_years.saturating_sub(tier.after_year).min(tier.max_years);
                Decimal::from(years) * tier.rate_per_year
            })
            .sum();

        let flat: Decimal = self
            .flat_steps
            .iter()
            .filter(|step| holding_years >= step.from_year)
            .map(|step| step.amount)
            .sum();

        (accrued + flat).min(Decimal::ONE)
    }
}

/// Income-tax abatement under the statutory schedule.
pub fn income_tax_abatement(holding_years: Years) -> Rate {
    AbatementSchedule::income_tax().fraction(holding_years)
}

/// Social-levy abatement under the statutory schedule.
pub fn social_levy_abatement(holding_years: Years) -> Rate {
    AbatementSchedule::social_levy().fraction(holding_years)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_abatement_up_to_five_years() {
        for y in 0..=5 {
            assert_eq!(income_tax_abatement(y), Decimal::ZERO);
            assert_eq!(social_levy_abatement(y), Decimal::ZERO);
        }
    }

    #[test]
    fn test_income_tax_accrual() {
        assert_eq!(income_tax_abatement(6), dec!(0.06));
        assert_eq!(income_tax_abatement(15), dec!(0.60));
        assert_eq!(income_tax_abatement(21), dec!(0.96));
    }

    #[test]
    fn test_income_tax_exempt_at_22() {
        assert_eq!(income_tax_abatement(22), Decimal::ONE);
        assert_eq!(income_tax_abatement(40), Decimal::ONE);
    }

    #[test]
    fn test_social_levy_accrual() {
        assert_eq!(social_levy_abatement(15), dec!(0.165));
        assert_eq!(social_levy_abatement(21), dec!(0.264));
        // 16 * 1.65 % + 1.6 %
        assert_eq!(social_levy_abatement(22), dec!(0.28));
        // 0.28 + 7 * 9 %
        assert_eq!(social_levy_abatement(29), dec!(0.91));
    }

    #[test]
    fn test_social_levy_exempt_at_30() {
        assert_eq!(social_levy_abatement(30), Decimal::ONE);
        assert_eq!(social_levy_abatement(35), Decimal::ONE);
    }

    #[test]
    fn test_22_years_exempts_income_tax_only() {
        assert_eq!(income_tax_abatement(22), Decimal::ONE);
        assert!(social_levy_abatement(22) < Decimal::ONE);
    }

    #[test]
    fn test_abatements_never_decrease() {
        let mut prev_ir = Decimal::ZERO;
        let mut prev_ps = Decimal::ZERO;
        for y in 0..=35 {
            let ir = income_tax_abatement(y);
            let ps = social_levy_abatement(y);
            assert!(ir >= prev_ir && ps >= prev_ps, "decrease at year {y}");
            prev_ir = ir;
            prev_ps = ps;
        }
    }

    #[test]
    fn test_fraction_is_clamped() {
        let generous = AbatementSchedule {
            full_exemption_year: 50,
            tiers: vec![AccrualTier {
                after_year: 0,
                max_years: 40,
                rate_per_year: dec!(0.5),
            }],
            flat_steps: Vec::new(),
        };
        assert_eq!(generous.fraction(10), Decimal::ONE);
    }

    #[test]
    fn test_zero_exemption_year_rejected() {
        let mut schedule = AbatementSchedule::income_tax();
        schedule.full_exemption_year = 0;
        assert!(schedule.validate("income tax").is_err());
        assert!(AbatementSchedule::social_levy().validate("social").is_ok());
    }
}
