//! Hydrogen demand of the bus fleet, derived from mileage and fuel economy.
use crate::parameters::ParameterSet;
use crate::units::KilogramsPerYear;
use anyhow::{Result, ensure};
use serde::Serialize;

/// Daily and annual hydrogen consumption of the fleet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandResult {
    /// Consumption of a single bus (kg/day)
    pub daily_per_bus_kg: f64,
    /// Consumption of the buses already in service (kg/day)
    pub existing_fleet_daily_kg: f64,
    /// Consumption of the full fleet (kg/day)
    pub full_fleet_daily_kg: f64,
    /// Full-fleet demand not covered by existing production (kg/day)
    pub supply_gap_kg_per_day: f64,
    /// Consumption of the full fleet over a year
    pub annual_total: KilogramsPerYear,
    /// Distance covered by the full fleet over a year (km)
    pub annual_fleet_mileage_km: f64,
}

impl DemandResult {
    /// Annual demand in tonnes
    pub fn annual_total_tonnes(&self) -> f64 {
        self.annual_total.value() / 1000.0
    }
}

/// Calculate the hydrogen demand of the fleet
pub fn calculate_demand(params: &ParameterSet) -> Result<DemandResult> {
    ensure!(
        params.fuel_economy_kg_per_100km > 0.0,
        "Fuel economy must be greater than zero"
    );

    let daily_per_bus = params.daily_mileage_km / 100.0 * params.fuel_economy_kg_per_100km;
    let full_fleet_daily = f64::from(params.total_buses) * daily_per_bus;
    let annual_mileage =
        f64::from(params.total_buses) * params.daily_mileage_km * params.days_per_year;

    Ok(DemandResult {
        daily_per_bus_kg: daily_per_bus,
        existing_fleet_daily_kg: f64::from(params.existing_buses) * daily_per_bus,
        full_fleet_daily_kg: full_fleet_daily,
        supply_gap_kg_per_day: full_fleet_daily - params.existing_production_kg_per_day,
        annual_total: KilogramsPerYear(full_fleet_daily * params.days_per_year),
        annual_fleet_mileage_km: annual_mileage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, params};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_baseline_demand(params: ParameterSet) {
        let demand = calculate_demand(&params).unwrap();

        assert_approx_eq!(f64, demand.daily_per_bus_kg, 25.5);
        assert_approx_eq!(f64, demand.existing_fleet_daily_kg, 510.0);
        assert_approx_eq!(f64, demand.full_fleet_daily_kg, 3570.0);
        assert_approx_eq!(f64, demand.supply_gap_kg_per_day, 2570.0);
        assert_approx_eq!(
            KilogramsPerYear,
            demand.annual_total,
            KilogramsPerYear(1_303_050.0)
        );
        assert_approx_eq!(f64, demand.annual_total_tonnes(), 1303.05);
        assert_approx_eq!(f64, demand.annual_fleet_mileage_km, 15_330_000.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    fn test_invalid_fuel_economy(params: ParameterSet, #[case] fuel_economy: f64) {
        let params = ParameterSet {
            fuel_economy_kg_per_100km: fuel_economy,
            ..params
        };
        assert_error!(
            calculate_demand(&params),
            "Fuel economy must be greater than zero"
        );
    }

    #[rstest]
    fn test_demand_scales_with_fleet(params: ParameterSet) {
        let half = ParameterSet {
            total_buses: 70,
            ..params.clone()
        };
        let full = calculate_demand(&params).unwrap();
        let half = calculate_demand(&half).unwrap();
        assert_approx_eq!(
            f64,
            half.annual_total.value() * 2.0,
            full.annual_total.value()
        );
        assert_approx_eq!(f64, half.daily_per_bus_kg, full.daily_per_bus_kg);
    }
}
