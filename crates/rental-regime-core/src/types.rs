use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::RentalRegimeError;
use crate::RentalRegimeResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.172 = 17.2%). Never as percentages.
pub type Rate = Decimal;

/// Whole holding years. Abatements and projections have yearly granularity.
pub type Years = u32;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_to_unit(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Compound a value forward by `years` periods via iterative multiplication
/// (avoids powd precision drift). Fails instead of overflowing the 96-bit
/// mantissa on very long horizons.
pub fn compound(initial: Money, annual_rate: Rate, years: Years) -> RentalRegimeResult<Money> {
    let factor = Decimal::ONE + annual_rate;
    let mut value = initial;
    for _ in 0..years {
        value = value
            .checked_mul(factor)
            .ok_or_else(|| RentalRegimeError::InvalidInput {
                field: "holding_years".into(),
                reason: format!("projecting {initial} over {years} years overflows"),
            })?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_unit_half_goes_up() {
        assert_eq!(round_to_unit(dec!(679.5)), dec!(680));
        assert_eq!(round_to_unit(dec!(680.5)), dec!(681));
        assert_eq!(round_to_unit(dec!(679.49)), dec!(679));
    }

    #[test]
    fn test_compound_zero_years_is_identity() {
        assert_eq!(compound(dec!(200000), dec!(0.016), 0).unwrap(), dec!(200000));
    }

    #[test]
    fn test_compound_two_years() {
        // 1000 * 1.1 * 1.1 = 1210
        assert_eq!(compound(dec!(1000), dec!(0.1), 2).unwrap(), dec!(1210));
    }

    #[test]
    fn test_compound_overflow_is_an_error() {
        let err = compound(dec!(200000), dec!(0.016), 5000).unwrap_err();
        assert!(matches!(err, RentalRegimeError::InvalidInput { ref field, .. } if field == "holding_years"));
    }
}
