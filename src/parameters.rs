//! Defines the `ParameterSet` struct, holding every named constant used by the model.
//!
//! A parameter set is never mutated once built. Sensitivity analysis constructs a new, fully
//! resolved set for every point it evaluates (see [`LcohOverrides`]).
use crate::units::{
    Dimensionless, KilowattHoursPerKg, MoneyPerKg, MoneyPerKw, MoneyPerLitre, MoneyPerMWh,
    MoneyPerTonne,
};
use anyhow::{Result, ensure};
use indexmap::{IndexMap, indexmap};
use log::warn;
use serde::{Deserialize, Serialize};

/// The techno-economic parameters of the fleet conversion.
///
/// Fields missing from a scenario file take their baseline value from [`ParameterSet::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSet {
    /// Buses already in service
    pub existing_buses: u32,
    /// Size of the full planned fleet
    pub total_buses: u32,
    /// Hydrogen consumption (kg per 100 km)
    pub fuel_economy_kg_per_100km: f64,
    /// Distance covered by each bus per day (km)
    pub daily_mileage_km: f64,
    /// Operating days per year
    pub days_per_year: f64,
    /// Production capacity available before expansion (kg/day)
    pub existing_production_kg_per_day: f64,
    /// Electrolyser capacity to be added (MWe)
    pub new_electrolyser_mw: f64,
    /// Hydrogen yield of electrolyser capacity (kg/day per MWe)
    pub electrolyser_yield_kg_per_day_per_mw: f64,
    /// Electrolyser equipment cost (£/kW)
    pub electrolyser_cost: MoneyPerKw,
    /// Balance of plant and installation, as a fraction of equipment cost
    pub bop_fraction: Dimensionless,
    /// Electrolyser design life (years)
    pub electrolyser_lifetime_years: u32,
    /// Electricity consumed per kg of hydrogen produced (kWh/kg)
    pub electrolyser_efficiency: KilowattHoursPerKg,
    /// Cost of one stack replacement, as a fraction of electrolyser capex
    pub stack_replacement_fraction: Dimensionless,
    /// Non-energy operating cost per year, as a fraction of electrolyser capex
    pub electrolyser_opex_fraction: Dimensionless,
    /// Baseline electricity price (£/MWh)
    pub electricity_price: MoneyPerMWh,
    /// Tube-trailer delivery cost (£/kg)
    pub transport_cost: MoneyPerKg,
    /// Refuelling station operating cost (£/kg)
    pub hrs_opex: MoneyPerKg,
    /// Capital cost of one refuelling station (€)
    pub hrs_capex_eur_per_station: f64,
    /// Exchange rate (€ per £)
    pub eur_per_gbp: f64,
    /// Number of refuelling stations to be built
    pub new_hrs_stations: u32,
    /// Dispensing capacity of each station in the network (kg/day)
    pub dispensing_capacity_kg_per_day: IndexMap<String, f64>,
    /// Baseline discount rate (WACC)
    pub discount_rate: Dimensionless,
    /// Appraisal period (years)
    pub project_life_years: u32,
    /// Carbon intensity of electricity supply (gCO2e/kWh)
    pub grid_carbon_intensity_g_per_kwh: f64,
    /// Compression and cooling energy at the refuelling station (kWh/kg)
    pub hrs_energy_kwh_per_kg: f64,
    /// Emissions from hydrogen delivery (kgCO2e per kg H2)
    pub transport_emission_kg_per_kg: f64,
    /// Tailpipe emissions of a diesel bus (kgCO2e/km)
    pub diesel_emission_kg_per_km: f64,
    /// Baseline diesel price (£/litre)
    pub diesel_price: MoneyPerLitre,
    /// Diesel bus fuel economy (km/litre)
    pub diesel_fuel_economy_km_per_litre: f64,
    /// Baseline carbon price (£/tCO2e)
    pub carbon_price: MoneyPerTonne,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            existing_buses: 20,
            total_buses: 140,
            fuel_economy_kg_per_100km: 8.5,
            daily_mileage_km: 300.0,
            days_per_year: 365.0,
            existing_production_kg_per_day: 1000.0,
            new_electrolyser_mw: 12.0,
            electrolyser_yield_kg_per_day_per_mw: 267.0,
            electrolyser_cost: MoneyPerKw(750.0),
            bop_fraction: Dimensionless(0.75),
            electrolyser_lifetime_years: 25,
            electrolyser_efficiency: KilowattHoursPerKg(55.0),
            stack_replacement_fraction: Dimensionless(0.15),
            electrolyser_opex_fraction: Dimensionless(0.02),
            electricity_price: MoneyPerMWh(57.0),
            transport_cost: MoneyPerKg(0.85),
            hrs_opex: MoneyPerKg(1.04),
            hrs_capex_eur_per_station: 2_850_000.0,
            eur_per_gbp: 1.18,
            new_hrs_stations: 3,
            dispensing_capacity_kg_per_day: indexmap! {
                "Tyseley".to_string() => 800.0,
                "Perry Barr".to_string() => 1000.0,
                "Yardley Wood".to_string() => 1000.0,
                "Acocks Green".to_string() => 800.0,
            },
            discount_rate: Dimensionless(0.08),
            project_life_years: 20,
            grid_carbon_intensity_g_per_kwh: 35.0,
            hrs_energy_kwh_per_kg: 4.21,
            transport_emission_kg_per_kg: 0.027,
            diesel_emission_kg_per_km: 0.90,
            diesel_price: MoneyPerLitre(1.40),
            diesel_fuel_economy_km_per_litre: 300.0 / 184.04,
            carbon_price: MoneyPerTonne(50.0),
        }
    }
}

/// Check that a parameter is a finite number greater than zero
fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that a parameter is a finite number which is not negative
fn check_non_negative(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number which is not negative"
    );

    Ok(())
}

/// Check that a count of years is non-zero
fn check_years(name: &str, value: u32) -> Result<()> {
    ensure!(value > 0, "{name} cannot be zero");

    Ok(())
}

impl ParameterSet {
    /// Validate parameters, e.g. after reading in a scenario file
    pub fn validate(&self) -> Result<()> {
        check_positive("fuel_economy_kg_per_100km", self.fuel_economy_kg_per_100km)?;
        check_positive(
            "diesel_fuel_economy_km_per_litre",
            self.diesel_fuel_economy_km_per_litre,
        )?;
        check_positive("daily_mileage_km", self.daily_mileage_km)?;
        check_positive("days_per_year", self.days_per_year)?;
        check_positive("new_electrolyser_mw", self.new_electrolyser_mw)?;
        check_positive(
            "electrolyser_yield_kg_per_day_per_mw",
            self.electrolyser_yield_kg_per_day_per_mw,
        )?;
        check_positive("electrolyser_efficiency", self.electrolyser_efficiency.value())?;
        check_positive("eur_per_gbp", self.eur_per_gbp)?;
        check_years("electrolyser_lifetime_years", self.electrolyser_lifetime_years)?;
        check_years("project_life_years", self.project_life_years)?;

        for (name, value) in [
            ("existing_production_kg_per_day", self.existing_production_kg_per_day),
            ("electrolyser_cost", self.electrolyser_cost.value()),
            ("bop_fraction", self.bop_fraction.value()),
            ("stack_replacement_fraction", self.stack_replacement_fraction.value()),
            ("electrolyser_opex_fraction", self.electrolyser_opex_fraction.value()),
            ("electricity_price", self.electricity_price.value()),
            ("transport_cost", self.transport_cost.value()),
            ("hrs_opex", self.hrs_opex.value()),
            ("hrs_capex_eur_per_station", self.hrs_capex_eur_per_station),
            ("discount_rate", self.discount_rate.value()),
            ("grid_carbon_intensity_g_per_kwh", self.grid_carbon_intensity_g_per_kwh),
            ("hrs_energy_kwh_per_kg", self.hrs_energy_kwh_per_kg),
            ("transport_emission_kg_per_kg", self.transport_emission_kg_per_kg),
            ("diesel_emission_kg_per_km", self.diesel_emission_kg_per_km),
            ("diesel_price", self.diesel_price.value()),
            ("carbon_price", self.carbon_price.value()),
        ] {
            check_non_negative(name, value)?;
        }

        for (station, capacity) in &self.dispensing_capacity_kg_per_day {
            check_non_negative(&format!("Dispensing capacity for {station}"), *capacity)?;
        }

        if self.existing_buses > self.total_buses {
            warn!(
                "existing_buses ({}) is greater than total_buses ({})",
                self.existing_buses, self.total_buses
            );
        }

        Ok(())
    }
}

/// Optional replacements for the parameters which feed the levelised cost of hydrogen.
///
/// Each override is independent of the others. Absent overrides keep the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LcohOverrides {
    /// Replacement electrolyser efficiency (kWh/kg)
    pub electrolyser_efficiency: Option<KilowattHoursPerKg>,
    /// Replacement electrolyser equipment cost (£/kW)
    pub electrolyser_cost: Option<MoneyPerKw>,
    /// Replacement balance of plant fraction
    pub bop_fraction: Option<Dimensionless>,
    /// Replacement delivery cost (£/kg)
    pub transport_cost: Option<MoneyPerKg>,
    /// Replacement refuelling station operating cost (£/kg)
    pub hrs_opex: Option<MoneyPerKg>,
}

impl LcohOverrides {
    /// Resolve the overrides against `base`, returning a new parameter set
    pub fn apply(&self, base: &ParameterSet) -> ParameterSet {
        ParameterSet {
            electrolyser_efficiency: self
                .electrolyser_efficiency
                .unwrap_or(base.electrolyser_efficiency),
            electrolyser_cost: self.electrolyser_cost.unwrap_or(base.electrolyser_cost),
            bop_fraction: self.bop_fraction.unwrap_or(base.bop_fraction),
            transport_cost: self.transport_cost.unwrap_or(base.transport_cost),
            hrs_opex: self.hrs_opex.unwrap_or(base.hrs_opex),
            ..base.clone()
        }
    }
}
