use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rental_regime_core::capital_gains::CapitalGainInput;
use rental_regime_core::{SimulationInputs, TaxLaw};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional law override, falling back to the law in force.
fn load_law(law_json: Option<String>) -> NapiResult<TaxLaw> {
    let law = match law_json {
        Some(json) => serde_json::from_str::<TaxLaw>(&json).map_err(to_napi_error)?,
        None => TaxLaw::default(),
    };
    law.validate().map_err(to_napi_error)?;
    Ok(law)
}

// ---------------------------------------------------------------------------
// Regime comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_regimes(input_json: String, law_json: Option<String>) -> NapiResult<String> {
    let input: SimulationInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let law = load_law(law_json)?;
    let output =
        rental_regime_core::simulation::analyse_regimes(&input, &law).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_regimes(input_json: String, law_json: Option<String>) -> NapiResult<String> {
    let input: SimulationInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let law = load_law(law_json)?;
    let report =
        rental_regime_core::simulation::simulate_with_law(&input, &law).map_err(to_napi_error)?;
    serde_json::to_string(&report.comparison).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SweepRequest {
    #[serde(flatten)]
    inputs: SimulationInputs,
    from: u32,
    to: u32,
}

#[napi]
pub fn holding_period_sweep(input_json: String, law_json: Option<String>) -> NapiResult<String> {
    let request: SweepRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let law = load_law(law_json)?;
    let points = rental_regime_core::sweep::holding_period_sweep(
        &law,
        &request.inputs,
        request.from,
        request.to,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&points).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Individual taxes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IncomeTaxRequest {
    income: Decimal,
    #[serde(default = "one_part")]
    parts: Decimal,
}

fn one_part() -> Decimal {
    Decimal::ONE
}

#[derive(Serialize)]
struct IncomeTaxResponse {
    tax: Decimal,
    marginal_rate: Decimal,
}

#[napi]
pub fn income_tax(input_json: String, law_json: Option<String>) -> NapiResult<String> {
    let request: IncomeTaxRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let law = load_law(law_json)?;
    let response = IncomeTaxResponse {
        tax: law
            .income_tax
            .tax(request.income, request.parts)
            .map_err(to_napi_error)?,
        marginal_rate: law
            .income_tax
            .marginal_rate(request.income, request.parts)
            .map_err(to_napi_error)?,
    };
    serde_json::to_string(&response).map_err(to_napi_error)
}

#[napi]
pub fn capital_gains_tax(input_json: String, law_json: Option<String>) -> NapiResult<String> {
    let input: CapitalGainInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let law = load_law(law_json)?;
    serde_json::to_string(&input.tax(&law.capital_gains)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Law
// ---------------------------------------------------------------------------

#[napi]
pub fn default_tax_law() -> NapiResult<String> {
    serde_json::to_string(&TaxLaw::default()).map_err(to_napi_error)
}
