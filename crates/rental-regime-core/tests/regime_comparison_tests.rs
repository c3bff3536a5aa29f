use pretty_assertions::assert_eq;
use rental_regime_core::capital_gains::{income_tax_abatement, social_levy_abatement, surtax};
use rental_regime_core::income_tax::IncomeTaxSchedule;
use rental_regime_core::rental::Regime;
use rental_regime_core::sweep::holding_period_sweep;
use rental_regime_core::{
    analyse_regimes, simulate, simulate_with_law, PreferredRegime, RegulatedTier, RentalRegimeError,
    SimulationCache, SimulationInputs, TaxLaw,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn new_build_intermediate() -> SimulationInputs {
    SimulationInputs {
        acquisition_price: dec!(200000),
        property_is_new: true,
        renovation_cost: Decimal::ZERO,
        market_monthly_rent: dec!(800),
        regime_level: RegulatedTier::Intermediate,
        household_taxable_income: dec!(35000),
        household_parts: Decimal::ONE,
        annual_charges: dec!(2400),
        furnished_amortization_rate_percent: dec!(3.0),
        holding_years: 15,
    }
}

// ===========================================================================
// End-to-end scenario
// ===========================================================================

#[test]
fn test_scenario_rents() {
    let report = simulate_with_law(&new_build_intermediate(), &TaxLaw::default()).unwrap();
    let a = &report.regulated_rent.schedule;
    let b = &report.furnished_rental.schedule;

    assert_eq!(a.terms.regime, Regime::RegulatedRent);
    assert_eq!(a.terms.monthly_rent(), dec!(680));
    assert_eq!(a.terms.annual_rent, dec!(8160));
    assert_eq!(b.terms.annual_rent, dec!(9600));
    assert!(a.years.iter().all(|y| y.gross_rent == dec!(8160)));
}

#[test]
fn test_scenario_reintegration_favours_regulated_rent() {
    let report = simulate_with_law(&new_build_intermediate(), &TaxLaw::default()).unwrap();
    let a = &report.regulated_rent.capital_gain;
    let b = &report.furnished_rental.capital_gain;

    // 5600/year under the 8000 ceiling versus an uncapped 6000/year
    assert_eq!(a.reintegrated_amortization, dec!(84000));
    assert_eq!(b.reintegrated_amortization, dec!(90000));
    assert!(a.gross_gain > Decimal::ZERO);
    assert!(b.taxable_gain_income_tax_base > a.taxable_gain_income_tax_base);
    assert!(b.taxable_gain_social_base > a.taxable_gain_social_base);
    assert!(b.total_tax_due > a.total_tax_due);

    assert_eq!(a.total_tax_due, dec!(20373.48854));
    assert_eq!(b.total_tax_due, dec!(21691.20854));
}

#[test]
fn test_scenario_balances_and_verdict() {
    let result = simulate(&new_build_intermediate()).unwrap();
    // 122400 - 36000 - 1132.80 - 20373.48854
    assert_eq!(result.regime_a_total_balance, dec!(64893.71146));
    // 144000 - 36000 - 8748 - 21691.20854
    assert_eq!(result.regime_b_total_balance, dec!(77560.79146));
    assert_eq!(result.advantage, dec!(12667.08));
    assert_eq!(result.preferred, PreferredRegime::FurnishedRental);
    assert_eq!(result.rent_gap.amount, dec!(21600));
    assert_eq!(result.rental_tax_gap.favours, PreferredRegime::RegulatedRent);
}

#[test]
fn test_year_totals_sum_to_period_totals() {
    let report = simulate_with_law(&new_build_intermediate(), &TaxLaw::default()).unwrap();
    for regime in [&report.regulated_rent, &report.furnished_rental] {
        let summed: Decimal = regime.schedule.years.iter().map(|y| y.total_tax).sum();
        assert_eq!(summed, regime.schedule.totals.total_tax);
    }
}

// ===========================================================================
// Holding-period boundaries
// ===========================================================================

#[test]
fn test_five_year_hold_fully_taxable() {
    let mut input = new_build_intermediate();
    input.holding_years = 5;
    let report = simulate_with_law(&input, &TaxLaw::default()).unwrap();

    // 200000 * 1.016^5 = 216520.26, no flat renovation allowance yet
    assert_eq!(report.sale.resale_price, dec!(216520));
    assert_eq!(report.sale.renovation_allowance, Decimal::ZERO);
    assert_eq!(report.sale.gain_before_reintegration, dec!(1520));

    let a = &report.regulated_rent.capital_gain;
    assert_eq!(a.abatement_income_tax_fraction, Decimal::ZERO);
    assert_eq!(a.abatement_social_fraction, Decimal::ZERO);
    assert_eq!(a.gross_gain, dec!(29520));
    assert_eq!(a.total_tax_due, dec!(5608.8) + dec!(5077.44));
}

#[test]
fn test_twenty_two_year_hold() {
    let mut input = new_build_intermediate();
    input.holding_years = 22;
    let report = simulate_with_law(&input, &TaxLaw::default()).unwrap();

    for regime in [&report.regulated_rent, &report.furnished_rental] {
        let gain = &regime.capital_gain;
        assert_eq!(gain.abatement_income_tax_fraction, Decimal::ONE);
        assert!(gain.abatement_social_fraction < Decimal::ONE);
        assert_eq!(gain.income_tax_due, Decimal::ZERO);
        assert_eq!(gain.surtax_due, Decimal::ZERO);
    }
}

#[test]
fn test_abatement_boundaries() {
    assert_eq!(income_tax_abatement(5), Decimal::ZERO);
    assert_eq!(social_levy_abatement(5), Decimal::ZERO);
    assert_eq!(income_tax_abatement(22), Decimal::ONE);
    assert_eq!(social_levy_abatement(30), Decimal::ONE);
    assert_eq!(surtax(dec!(50000)), Decimal::ZERO);
}

// ===========================================================================
// Household and inputs
// ===========================================================================

#[test]
fn test_zero_parts_rejected() {
    let mut input = new_build_intermediate();
    input.household_parts = Decimal::ZERO;
    assert!(simulate(&input).is_err());
    assert!(IncomeTaxSchedule::default().tax(dec!(35000), Decimal::ZERO).is_err());
}

#[test]
fn test_inputs_from_json_with_defaults() {
    let input: SimulationInputs = serde_json::from_str(
        r#"{
            "acquisition_price": "200000",
            "property_is_new": true,
            "market_monthly_rent": "800",
            "regime_level": "intermediate",
            "household_taxable_income": "35000",
            "annual_charges": "2400",
            "furnished_amortization_rate_percent": "3.0",
            "holding_years": 15
        }"#,
    )
    .unwrap();
    assert_eq!(input, new_build_intermediate());
}

#[test]
fn test_higher_tier_discounts_more() {
    let mut input = new_build_intermediate();
    input.regime_level = RegulatedTier::VerySocial;
    let report = simulate_with_law(&input, &TaxLaw::default()).unwrap();
    // round(800 * 0.55) = 440
    assert_eq!(report.regulated_rent.schedule.terms.annual_rent, dec!(5280));
    // 200000 * 0.8 * 0.055 = 8800, under the 12000 ceiling
    assert_eq!(report.regulated_rent.schedule.terms.annual_amortization, dec!(8800));
}

// ===========================================================================
// Envelope, cache and sweep
// ===========================================================================

#[test]
fn test_analyse_wraps_report() {
    let output = analyse_regimes(&new_build_intermediate(), &TaxLaw::default()).unwrap();
    assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    assert_eq!(
        output.result.comparison,
        simulate(&new_build_intermediate()).unwrap()
    );
}

#[test]
fn test_cache_and_sweep_agree() {
    let mut cache = SimulationCache::new(TaxLaw::default()).unwrap();
    let cached = cache.get_or_simulate(&new_build_intermediate()).unwrap();
    let points =
        holding_period_sweep(&TaxLaw::default(), &new_build_intermediate(), 14, 16).unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[1].holding_years, 15);
    assert_eq!(points[1].advantage, cached.comparison.advantage);
}

#[test]
fn test_law_round_trips_through_json() {
    let law = TaxLaw::default();
    let json = serde_json::to_string(&law).unwrap();
    let parsed: TaxLaw = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, law);
    let report = simulate_with_law(&new_build_intermediate(), &parsed).unwrap();
    assert_eq!(report.comparison.advantage, dec!(12667.08));
}

// ===========================================================================
// Very long holding periods
// ===========================================================================

#[test]
fn test_overflowing_horizon_is_an_error() {
    let mut input = new_build_intermediate();
    input.holding_years = 5000;
    let outcome = std::panic::catch_unwind(|| simulate(&input));
    let result = outcome.expect("simulate must not panic on a long horizon");
    assert!(matches!(
        result,
        Err(RentalRegimeError::InvalidInput { ref field, .. }) if field == "holding_years"
    ));
}

#[test]
fn test_sweep_past_overflow_is_an_error() {
    let result = holding_period_sweep(&TaxLaw::default(), &new_build_intermediate(), 4990, 5000);
    assert!(result.is_err());
}
