//! Levelised cost of hydrogen (LCOH), broken down by component.
use crate::finance::annual_capital_cost;
use crate::infrastructure::calculate_capex;
use crate::parameters::ParameterSet;
use crate::units::{Dimensionless, KilogramsPerYear, MoneyPerKg, MoneyPerMWh, Year};
use anyhow::{Result, ensure};
use serde::Serialize;

/// Interval between electrolyser stack replacements.
///
/// Fixed rather than derived from the electrolyser lifetime.
pub const STACK_REPLACEMENT_INTERVAL: Year = Year(10.0);

/// Cost of dispensed hydrogen, per component (£/kg)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LcohResult {
    /// Electricity consumed by electrolysis
    pub electricity: MoneyPerKg,
    /// Annualised electrolyser capital cost
    pub capex: MoneyPerKg,
    /// Fixed non-energy operating cost of the electrolyser
    pub opex: MoneyPerKg,
    /// Annualised stack replacement
    pub stack_replacement: MoneyPerKg,
    /// Cost at the electrolyser gate (sum of the four components above)
    pub production: MoneyPerKg,
    /// Delivery to the refuelling stations
    pub transport: MoneyPerKg,
    /// Operation of the refuelling stations
    pub hrs_opex: MoneyPerKg,
    /// Total dispensed cost
    pub total: MoneyPerKg,
}

impl LcohResult {
    /// The six components making up the total, with display names
    pub fn components(&self) -> [(&'static str, MoneyPerKg); 6] {
        [
            ("Electricity", self.electricity),
            ("Electrolyser capex", self.capex),
            ("Electrolyser opex", self.opex),
            ("Stack replacement", self.stack_replacement),
            ("Transport", self.transport),
            ("HRS opex", self.hrs_opex),
        ]
    }
}

/// Annual output of the new electrolyser capacity
fn annual_production(params: &ParameterSet) -> Result<KilogramsPerYear> {
    let production = KilogramsPerYear(
        params.new_electrolyser_mw
            * params.electrolyser_yield_kg_per_day_per_mw
            * params.days_per_year,
    );
    ensure!(
        production.is_finite() && production > KilogramsPerYear(0.0),
        "Annual hydrogen production must be greater than zero"
    );

    Ok(production)
}

/// Calculate the levelised cost of hydrogen.
///
/// Capital-related components are spread over the output of the new electrolyser capacity only.
/// Refuelling station capex is not included.
///
/// # Arguments
///
/// * `params` - Resolved parameters (see [`crate::parameters::LcohOverrides`])
/// * `electricity_price` - Price paid for electricity
/// * `discount_rate` - Rate used to annualise electrolyser capex
pub fn calculate_lcoh(
    params: &ParameterSet,
    electricity_price: MoneyPerMWh,
    discount_rate: Dimensionless,
) -> Result<LcohResult> {
    let production = annual_production(params)?;
    let electrolyser_capex = calculate_capex(params).electrolyser_total;

    let electricity = params.electrolyser_efficiency * electricity_price;
    let capex = annual_capital_cost(
        electrolyser_capex,
        params.electrolyser_lifetime_years,
        discount_rate,
    )? / production;
    let opex = electrolyser_capex * params.electrolyser_opex_fraction / Year(1.0) / production;
    let stack_replacement = electrolyser_capex * params.stack_replacement_fraction
        / STACK_REPLACEMENT_INTERVAL
        / production;
    let production_cost = electricity + capex + opex + stack_replacement;

    Ok(LcohResult {
        electricity,
        capex,
        opex,
        stack_replacement,
        production: production_cost,
        transport: params.transport_cost,
        hrs_opex: params.hrs_opex,
        total: production_cost + params.transport_cost + params.hrs_opex,
    })
}
