//! Capital cost and capacity of the electrolyser expansion and refuelling station network.
use crate::parameters::ParameterSet;
use crate::units::{Dimensionless, Kilowatts, Money};
use serde::Serialize;

/// Capital expenditure and resulting capacities of the infrastructure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapexResult {
    /// Electrolyser equipment
    pub electrolyser_equipment: Money,
    /// Balance of plant and installation
    pub electrolyser_bop: Money,
    /// Electrolyser equipment plus balance of plant
    pub electrolyser_total: Money,
    /// One refuelling station
    pub hrs_per_station: Money,
    /// All new refuelling stations
    pub hrs_total: Money,
    /// Electrolyser plus refuelling stations
    pub total_capex: Money,
    /// Production from the new electrolyser capacity (kg/day)
    pub new_production_kg_per_day: f64,
    /// Existing plus new production (kg/day)
    pub total_production_kg_per_day: f64,
    /// Combined dispensing capacity of the station network (kg/day)
    pub network_dispensing_kg_per_day: f64,
}

/// Calculate the capital cost of the infrastructure expansion
pub fn calculate_capex(params: &ParameterSet) -> CapexResult {
    let capacity = Kilowatts(params.new_electrolyser_mw * 1000.0);
    let equipment = params.electrolyser_cost * capacity;
    let bop = equipment * params.bop_fraction;
    let electrolyser_total = equipment + bop;

    let hrs_per_station = Money(params.hrs_capex_eur_per_station / params.eur_per_gbp);
    let hrs_total = hrs_per_station * Dimensionless(f64::from(params.new_hrs_stations));

    let new_production = params.new_electrolyser_mw * params.electrolyser_yield_kg_per_day_per_mw;

    CapexResult {
        electrolyser_equipment: equipment,
        electrolyser_bop: bop,
        electrolyser_total,
        hrs_per_station,
        hrs_total,
        total_capex: electrolyser_total + hrs_total,
        new_production_kg_per_day: new_production,
        total_production_kg_per_day: params.existing_production_kg_per_day + new_production,
        network_dispensing_kg_per_day: params.dispensing_capacity_kg_per_day.values().sum(),
    }
}
