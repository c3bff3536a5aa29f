use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RentalRegimeError;
use crate::types::{Money, Rate};
use crate::RentalRegimeResult;

/// One segment of the surtax ladder.
///
/// A gain `g` falling in the band owes `rate * g - smoothing * (upper_bound - g)`.
/// The smoothing term only applies to bounded bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurtaxBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Money>,
    pub rate: Rate,
    #[serde(default)]
    pub smoothing: Rate,
}

impl SurtaxBand {
    fn flat(upper_bound: Money, rate: Rate) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
            smoothing: Decimal::ZERO,
        }
    }

    fn transition(upper_bound: Money, rate: Rate, smoothing: Rate) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
            smoothing,
        }
    }

    fn levy(&self, gain: Money) -> Money {
        match self.upper_bound {
            Some(bound) => self.rate * gain - self.smoothing * (bound - gain),
            None => self.rate * gain,
        }
    }
}

/// Additional levy on large taxable capital gains, evaluated on the
/// income-tax base after abatement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurtaxSchedule {
    pub bands: Vec<SurtaxBand>,
}

impl Default for SurtaxSchedule {
    fn default() -> Self {
        Self::statutory()
    }
}

impl SurtaxSchedule {
    /// Statutory ladder: nothing up to 50 000, then 2 % to 6 % with a
    /// smoothing discount in each transition band.
    pub fn statutory() -> Self {
        Self {
            bands: vec![
                SurtaxBand::flat(dec!(50000), dec!(0)),
                SurtaxBand::transition(dec!(60000), dec!(0.02), dec!(0.05)),
                SurtaxBand::flat(dec!(100000), dec!(0.02)),
                SurtaxBand::transition(dec!(110000), dec!(0.03), dec!(0.10)),
                SurtaxBand::flat(dec!(150000), dec!(0.03)),
                SurtaxBand::transition(dec!(160000), dec!(0.04), dec!(0.15)),
                SurtaxBand::flat(dec!(200000), dec!(0.04)),
                SurtaxBand::transition(dec!(210000), dec!(0.05), dec!(0.20)),
                SurtaxBand::flat(dec!(250000), dec!(0.05)),
                SurtaxBand::transition(dec!(260000), dec!(0.06), dec!(0.25)),
                SurtaxBand {
                    upper_bound: None,
                    rate: dec!(0.06),
                    smoothing: Decimal::ZERO,
                },
            ],
        }
    }

    pub fn validate(&self) -> RentalRegimeResult<()> {
        let last = self.bands.last().ok_or_else(|| {
            RentalRegimeError::InvalidSchedule("surtax schedule has no bands".into())
        })?;
        if last.upper_bound.is_some() {
            return Err(RentalRegimeError::InvalidSchedule(
                "last surtax band must be unbounded".into(),
            ));
        }
        let mut floor = Decimal::ZERO;
        for (i, band) in self.bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.smoothing < Decimal::ZERO {
                return Err(RentalRegimeError::InvalidSchedule(format!(
                    "surtax band {i} has a negative coefficient"
                )));
            }
            match band.upper_bound {
                Some(bound) if bound <= floor => {
                    return Err(RentalRegimeError::InvalidSchedule(format!(
                        "surtax band {i} upper bound {bound} does not exceed {floor}"
                    )));
                }
                Some(bound) => floor = bound,
                None if i + 1 != self.bands.len() => {
                    return Err(RentalRegimeError::InvalidSchedule(format!(
                        "surtax band {i} is unbounded but not last"
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Surtax owed on `taxable_gain`. Non-positive gains owe nothing.
    pub fn surtax(&self, taxable_gain: Money) -> Money {
        if taxable_gain <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.bands
            .iter()
            .find(|band| band.upper_bound.is_none_or(|bound| taxable_gain <= bound))
            .map_or(Decimal::ZERO, |band| band.levy(taxable_gain))
    }
}

/// Surtax under the statutory ladder.
pub fn surtax(taxable_gain: Money) -> Money {
    SurtaxSchedule::statutory().surtax(taxable_gain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statutory_ladder_is_valid() {
        let schedule = SurtaxSchedule::statutory();
        assert!(schedule.validate().is_ok());
        assert_eq!(schedule.bands.len(), 11);
    }

    #[test]
    fn test_nothing_up_to_threshold() {
        assert_eq!(surtax(dec!(-1000)), Decimal::ZERO);
        assert_eq!(surtax(dec!(30000)), Decimal::ZERO);
        assert_eq!(surtax(dec!(50000)), Decimal::ZERO);
    }

    #[test]
    fn test_entry_band_smoothing() {
        // 2 % * 55000 - (60000 - 55000) / 20 = 1100 - 250
        assert_eq!(surtax(dec!(55000)), dec!(850));
        // threshold crossing lands at 2 % * 50000 - 10000 / 20
        assert_eq!(surtax(dec!(50000.01)), dec!(500.0007));
    }

    #[test]
    fn test_flat_bands() {
        assert_eq!(surtax(dec!(80000)), dec!(1600));
        assert_eq!(surtax(dec!(120000)), dec!(3600));
        assert_eq!(surtax(dec!(300000)), dec!(18000));
    }

    #[test]
    fn test_transition_bands() {
        // 3 % * 105000 - 5000 / 10
        assert_eq!(surtax(dec!(105000)), dec!(2650));
        // 4 % * 155000 - 5000 * 0.15
        assert_eq!(surtax(dec!(155000)), dec!(5450));
        // 5 % * 205000 - 5000 * 0.20
        assert_eq!(surtax(dec!(205000)), dec!(9250));
        // 6 % * 255000 - 5000 * 0.25
        assert_eq!(surtax(dec!(255000)), dec!(14050));
    }

    #[test]
    fn test_continuous_above_threshold() {
        let schedule = SurtaxSchedule::statutory();
        let bounds: Vec<Money> = schedule
            .bands
            .iter()
            .filter_map(|b| b.upper_bound)
            .filter(|b| *b > dec!(50000))
            .collect();
        assert_eq!(bounds.len(), 9);
        for bound in bounds {
            let at = schedule.surtax(bound);
            let above = schedule.surtax(bound + dec!(0.0001));
            assert!(
                (above - at).abs() < dec!(0.001),
                "jump at {bound}: {at} -> {above}"
            );
        }
    }

    #[test]
    fn test_unordered_bands_rejected() {
        let mut schedule = SurtaxSchedule::statutory();
        schedule.bands.swap(1, 2);
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_bounded_last_band_rejected() {
        let mut schedule = SurtaxSchedule::statutory();
        schedule.bands.pop();
        assert!(schedule.validate().is_err());
    }
}
