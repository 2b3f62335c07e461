//! Well-to-wheel CO2-equivalent emissions of the hydrogen and diesel pathways.
use crate::demand::DemandResult;
use crate::parameters::ParameterSet;
use crate::units::TonnesPerYear;
use serde::Serialize;

/// Emission factors (kgCO2e per kg H2) and annual totals for both pathways
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionsResult {
    /// Electrolysis
    pub production_ef: f64,
    /// Compression and cooling at the refuelling station
    pub hrs_ef: f64,
    /// Delivery by tube trailer
    pub transport_ef: f64,
    /// Sum of the three legs
    pub total_ef: f64,
    /// Annual emissions of the hydrogen fleet
    pub h2_annual: TonnesPerYear,
    /// Annual emissions of an equivalent diesel fleet
    pub diesel_annual: TonnesPerYear,
    /// Diesel minus hydrogen emissions
    pub saving: TonnesPerYear,
    /// Saving as a percentage of diesel emissions. `None` if diesel emissions are zero.
    pub reduction_pct: Option<f64>,
}

/// Calculate emissions for both pathways
pub fn calculate_emissions(params: &ParameterSet, demand: &DemandResult) -> EmissionsResult {
    let intensity = params.grid_carbon_intensity_g_per_kwh;
    let production_ef = params.electrolyser_efficiency.value() * intensity / 1000.0;
    let hrs_ef = params.hrs_energy_kwh_per_kg * intensity / 1000.0;
    let transport_ef = params.transport_emission_kg_per_kg;
    let total_ef = production_ef + hrs_ef + transport_ef;

    let h2_annual = TonnesPerYear(demand.annual_total.value() * total_ef / 1000.0);
    let diesel_annual =
        TonnesPerYear(demand.annual_fleet_mileage_km * params.diesel_emission_kg_per_km / 1000.0);
    let saving = diesel_annual - h2_annual;
    let reduction_pct = (diesel_annual > TonnesPerYear(0.0))
        .then(|| (saving / diesel_annual).value() * 100.0);

    EmissionsResult {
        production_ef,
        hrs_ef,
        transport_ef,
        total_ef,
        h2_annual,
        diesel_annual,
        saving,
        reduction_pct,
    }
}
