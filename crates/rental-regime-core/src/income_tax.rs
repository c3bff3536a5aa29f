use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RentalRegimeError;
use crate::types::{Money, Rate};
use crate::RentalRegimeResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One slice of the progressive scale. `upper_bound: None` is the open-ended
/// top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

impl TaxBracket {
    pub fn bounded(upper_bound: Money, rate: Rate) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn open(rate: Rate) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// Progressive income-tax scale applied to the household quotient
/// (income divided by the number of parts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxSchedule {
    pub brackets: Vec<TaxBracket>,
}

impl Default for IncomeTaxSchedule {
    /// Five-bracket scale: 0% / 11% / 30% / 41% / 45%.
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::bounded(dec!(11497), dec!(0)),
                TaxBracket::bounded(dec!(29315), dec!(0.11)),
                TaxBracket::bounded(dec!(83823), dec!(0.30)),
                TaxBracket::bounded(dec!(180294), dec!(0.41)),
                TaxBracket::open(dec!(0.45)),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl IncomeTaxSchedule {
    /// Build a schedule, rejecting tables that are unsorted, have decreasing
    /// rates, or do not end with an open bracket.
    pub fn new(brackets: Vec<TaxBracket>) -> RentalRegimeResult<Self> {
        let schedule = Self { brackets };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> RentalRegimeResult<()> {
        let last = self.brackets.last().ok_or_else(|| {
            RentalRegimeError::InvalidSchedule("income tax schedule has no brackets".into())
        })?;
        if last.upper_bound.is_some() {
            return Err(RentalRegimeError::InvalidSchedule(
                "last income tax bracket must be unbounded".into(),
            ));
        }

        let mut floor = Decimal::ZERO;
        let mut previous_rate = Decimal::ZERO;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(RentalRegimeError::InvalidSchedule(format!(
                    "bracket {i} rate {} is outside [0, 1]",
                    bracket.rate
                )));
            }
            if bracket.rate < previous_rate {
                return Err(RentalRegimeError::InvalidSchedule(format!(
                    "bracket {i} rate {} is lower than the previous rate {previous_rate}",
                    bracket.rate
                )));
            }
            match bracket.upper_bound {
                Some(bound) if bound <= floor => {
                    return Err(RentalRegimeError::InvalidSchedule(format!(
                        "bracket {i} upper bound {bound} does not exceed {floor}"
                    )));
                }
                Some(bound) => floor = bound,
                None if i + 1 != self.brackets.len() => {
                    return Err(RentalRegimeError::InvalidSchedule(format!(
                        "bracket {i} is unbounded but not last"
                    )));
                }
                None => {}
            }
            previous_rate = bracket.rate;
        }
        Ok(())
    }

    /// Progressive tax on `income` for a household of `parts` parts.
    ///
    /// The quotient `income / parts` is taxed slice by slice, and the per-part
    /// tax is multiplied back by `parts`. Non-positive income owes nothing.
    pub fn tax(&self, income: Money, parts: Decimal) -> RentalRegimeResult<Money> {
        check_parts(parts)?;
        if income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let quotient = income / parts;
        let mut tax = Decimal::ZERO;
        let mut floor = Decimal::ZERO;

        for bracket in &self.brackets {
            if quotient > floor {
                let ceiling = bracket
                    .upper_bound
                    .map_or(quotient, |bound| quotient.min(bound));
                tax += (ceiling - floor) * bracket.rate;
            }
            match bracket.upper_bound {
                Some(bound) => floor = bound,
                None => break,
            }
        }

        Ok(tax * parts)
    }

    /// Rate of the bracket the quotient `income / parts` falls into.
    pub fn marginal_rate(&self, income: Money, parts: Decimal) -> RentalRegimeResult<Rate> {
        check_parts(parts)?;
        if income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let quotient = income / parts;
        let rate = self
            .brackets
            .iter()
            .find(|b| b.upper_bound.is_none_or(|bound| quotient <= bound))
            .or_else(|| self.brackets.last())
            .map_or(Decimal::ZERO, |b| b.rate);
        Ok(rate)
    }

    /// Additional tax caused by stacking `extra` on top of `base_income`.
    /// Negative `extra` yields a (negative) saving.
    pub fn tax_delta(
        &self,
        base_income: Money,
        extra: Money,
        parts: Decimal,
    ) -> RentalRegimeResult<Money> {
        let with_extra = (base_income + extra).max(Decimal::ZERO);
        Ok(self.tax(with_extra, parts)? - self.tax(base_income, parts)?)
    }
}

fn check_parts(parts: Decimal) -> RentalRegimeResult<()> {
    if parts <= Decimal::ZERO {
        return Err(RentalRegimeError::DivisionByZero {
            context: format!("income tax quotient (household parts = {parts})"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
