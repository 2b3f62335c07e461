//! Annual fuel costs of the hydrogen and diesel fleets, and the benefit of switching.
use super::lcoh::calculate_lcoh;
use crate::demand::calculate_demand;
use crate::emissions::calculate_emissions;
use crate::parameters::ParameterSet;
use crate::units::{
    LitresPerYear, MoneyPerKg, MoneyPerLitre, MoneyPerMWh, MoneyPerTonne, MoneyPerYear,
    TonnesPerYear,
};
use anyhow::{Result, ensure};
use serde::Serialize;

/// Annual operating cost comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualCostResult {
    /// Dispensed LCOH used to cost hydrogen
    pub lcoh: MoneyPerKg,
    /// Hydrogen fuel cost of the full fleet
    pub h2_cost: MoneyPerYear,
    /// Diesel consumed by an equivalent diesel fleet
    pub diesel_litres: LitresPerYear,
    /// Diesel fuel cost of an equivalent fleet
    pub diesel_cost: MoneyPerYear,
    /// Diesel cost minus hydrogen cost (positive when hydrogen is cheaper)
    pub fuel_saving: MoneyPerYear,
    /// Emissions avoided by switching
    pub co2_saving: TonnesPerYear,
    /// Monetised value of the avoided emissions
    pub carbon_value: MoneyPerYear,
    /// Fuel saving plus carbon value. May be negative.
    pub total_benefit: MoneyPerYear,
}

/// Annual diesel consumption of a fleet covering `annual_mileage_km`
pub(crate) fn diesel_litres(params: &ParameterSet, annual_mileage_km: f64) -> Result<LitresPerYear> {
    ensure!(
        params.diesel_fuel_economy_km_per_litre > 0.0,
        "Diesel fuel economy must be greater than zero"
    );

    Ok(LitresPerYear(
        annual_mileage_km / params.diesel_fuel_economy_km_per_litre,
    ))
}

/// Calculate annual fuel costs for both fleets.
///
/// Hydrogen is costed at the dispensed LCOH for `electricity_price`, with electrolyser capex
/// annualised at the parameter set's discount rate.
pub fn calculate_annual_costs(
    params: &ParameterSet,
    electricity_price: MoneyPerMWh,
    carbon_price: MoneyPerTonne,
    diesel_price: MoneyPerLitre,
) -> Result<AnnualCostResult> {
    let demand = calculate_demand(params)?;
    let emissions = calculate_emissions(params, &demand);
    let lcoh = calculate_lcoh(params, electricity_price, params.discount_rate)?.total;

    let h2_cost = lcoh * demand.annual_total;
    let diesel_litres = diesel_litres(params, demand.annual_fleet_mileage_km)?;
    let diesel_cost = diesel_price * diesel_litres;
    let fuel_saving = diesel_cost - h2_cost;
    let carbon_value = carbon_price * emissions.saving;

    Ok(AnnualCostResult {
        lcoh,
        h2_cost,
        diesel_litres,
        diesel_cost,
        fuel_saving,
        co2_saving: emissions.saving,
        carbon_value,
        total_benefit: fuel_saving + carbon_value,
    })
}
