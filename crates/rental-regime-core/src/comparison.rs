use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::capital_gains::CapitalGainResult;
use crate::rental::{cumulative_net_income, PeriodTotals};
use crate::types::Money;

/// Which regime comes out ahead on a given line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredRegime {
    RegulatedRent,
    FurnishedRental,
    Equivalent,
}

impl PreferredRegime {
    /// Positive `delta` favours furnished rental, negative favours regulated rent.
    pub fn from_delta(delta: Money) -> Self {
        if delta > Decimal::ZERO {
            PreferredRegime::FurnishedRental
        } else if delta < Decimal::ZERO {
            PreferredRegime::RegulatedRent
        } else {
            PreferredRegime::Equivalent
        }
    }
}

/// A difference between the regimes, signed so that positive favours
/// furnished rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonLine {
    pub amount: Money,
    pub favours: PreferredRegime,
}

impl ComparisonLine {
    fn new(amount: Money) -> Self {
        Self {
            amount,
            favours: PreferredRegime::from_delta(amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparativeResult {
    pub regime_a_total_balance: Money,
    pub regime_b_total_balance: Money,
    /// `regime_b_total_balance - regime_a_total_balance`
    pub advantage: Money,
    pub preferred: PreferredRegime,
    /// Extra rent collected under furnished rental
    pub rent_gap: ComparisonLine,
    /// Rental-income tax saved by furnished rental (A tax - B tax)
    pub rental_tax_gap: ComparisonLine,
    /// Capital-gains tax saved by furnished rental (A tax - B tax)
    pub capital_gains_tax_gap: ComparisonLine,
    /// Rental tax (savings floored at zero) plus capital-gains tax
    pub regime_a_fiscal_burden: Money,
    pub regime_b_fiscal_burden: Money,
}

/// Balance of one regime: cumulative net rental income minus the resale tax.
pub fn regime_balance(totals: &PeriodTotals, capital_gain: &CapitalGainResult) -> Money {
    cumulative_net_income(totals) - capital_gain.total_tax_due
}

fn fiscal_burden(totals: &PeriodTotals, capital_gain: &CapitalGainResult) -> Money {
    totals.total_tax.max(Decimal::ZERO) + capital_gain.total_tax_due
}

/// Combine both regimes' period totals and resale taxes.
pub fn compare(
    regime_a: (&PeriodTotals, &CapitalGainResult),
    regime_b: (&PeriodTotals, &CapitalGainResult),
) -> ComparativeResult {
    let (a_totals, a_gain) = regime_a;
    let (b_totals, b_gain) = regime_b;

    let a_balance = regime_balance(a_totals, a_gain);
    let b_balance = regime_balance(b_totals, b_gain);
    let advantage = b_balance - a_balance;

    ComparativeResult {
        regime_a_total_balance: a_balance,
        regime_b_total_balance: b_balance,
        advantage,
        preferred: PreferredRegime::from_delta(advantage),
        rent_gap: ComparisonLine::new(b_totals.total_rent - a_totals.total_rent),
        rental_tax_gap: ComparisonLine::new(a_totals.total_tax - b_totals.total_tax),
        capital_gains_tax_gap: ComparisonLine::new(a_gain.total_tax_due - b_gain.total_tax_due),
        regime_a_fiscal_burden: fiscal_burden(a_totals, a_gain),
        regime_b_fiscal_burden: fiscal_burden(b_totals, b_gain),
    }
}
