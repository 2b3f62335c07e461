//! The diesel price at which the two fleets cost the same to run.
use super::annual_costs::diesel_litres;
use super::lcoh::calculate_lcoh;
use crate::demand::calculate_demand;
use crate::emissions::calculate_emissions;
use crate::parameters::ParameterSet;
use crate::units::{LitresPerYear, MoneyPerLitre, MoneyPerMWh, MoneyPerTonne, MoneyPerYear};
use anyhow::Result;

/// Solve for the diesel price at which the annual diesel bill equals the annual hydrogen bill.
///
/// If `carbon_price` is given, the carbon penalty on diesel emissions is credited against the
/// hydrogen bill, lowering the breakeven price. Diesel cost is linear in price, so this is solved
/// directly.
///
/// # Returns
///
/// `None` if the diesel fleet would consume no fuel, in which case no price balances the costs.
pub fn diesel_breakeven_price(
    params: &ParameterSet,
    electricity_price: MoneyPerMWh,
    carbon_price: Option<MoneyPerTonne>,
) -> Result<Option<MoneyPerLitre>> {
    let demand = calculate_demand(params)?;
    let lcoh = calculate_lcoh(params, electricity_price, params.discount_rate)?.total;
    let h2_cost = lcoh * demand.annual_total;

    let carbon_penalty = carbon_price.map_or(MoneyPerYear(0.0), |carbon_price| {
        carbon_price * calculate_emissions(params, &demand).diesel_annual
    });

    let litres = diesel_litres(params, demand.annual_fleet_mileage_km)?;
    if litres <= LitresPerYear(0.0) {
        return Ok(None);
    }

    Ok(Some((h2_cost - carbon_penalty) / litres))
}
