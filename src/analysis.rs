//! Evaluation of every model component at a scenario's baseline values.
use crate::demand::{DemandResult, calculate_demand};
use crate::economics::{
    AnnualCostResult, FinancialResult, LcohResult, calculate_annual_costs, calculate_financials,
    calculate_lcoh, diesel_breakeven_price,
};
use crate::emissions::{EmissionsResult, calculate_emissions};
use crate::infrastructure::{CapexResult, calculate_capex};
use crate::parameters::ParameterSet;
use crate::units::MoneyPerLitre;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

/// Results of every component at the baseline electricity price, carbon price, diesel price,
/// discount rate and project life
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineAnalysis {
    /// Diesel price at which the fleets cost the same, with the baseline carbon price
    pub breakeven_diesel_price: Option<MoneyPerLitre>,
    /// Hydrogen demand
    pub demand: DemandResult,
    /// Infrastructure capex
    pub capex: CapexResult,
    /// Well-to-wheel emissions
    pub emissions: EmissionsResult,
    /// Levelised cost of hydrogen
    pub lcoh: LcohResult,
    /// Annual operating cost comparison
    pub annual_costs: AnnualCostResult,
    /// NPV, IRR and related measures
    pub financials: FinancialResult,
}

impl BaselineAnalysis {
    /// Run every calculation for `params`.
    ///
    /// Either all results are produced or an error is returned.
    pub fn run(params: &ParameterSet) -> Result<Self> {
        params.validate().context("Invalid parameters")?;

        let demand = calculate_demand(params)?;
        let capex = calculate_capex(params);
        if capex.total_production_kg_per_day < demand.full_fleet_daily_kg {
            warn!(
                "Production capacity ({:.0} kg/day) is below full-fleet demand ({:.0} kg/day)",
                capex.total_production_kg_per_day, demand.full_fleet_daily_kg
            );
        }

        let emissions = calculate_emissions(params, &demand);
        let lcoh = calculate_lcoh(params, params.electricity_price, params.discount_rate)?;
        let annual_costs = calculate_annual_costs(
            params,
            params.electricity_price,
            params.carbon_price,
            params.diesel_price,
        )?;
        let financials = calculate_financials(
            params,
            params.electricity_price,
            params.carbon_price,
            params.discount_rate,
            params.project_life_years,
        )?;
        let breakeven_diesel_price =
            diesel_breakeven_price(params, params.electricity_price, Some(params.carbon_price))?;
        info!("Baseline analysis complete");

        Ok(Self {
            breakeven_diesel_price,
            demand,
            capex,
            emissions,
            lcoh,
            annual_costs,
            financials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, params};
    use crate::units::{Dimensionless, Money, MoneyPerKg, MoneyPerYear};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_baseline_analysis(params: ParameterSet) {
        let analysis = BaselineAnalysis::run(&params).unwrap();

        assert_approx_eq!(
            MoneyPerKg,
            analysis.lcoh.total,
            MoneyPerKg(6.758014186093152),
            epsilon = 1e-10
        );
        assert_eq!(analysis.annual_costs.lcoh, analysis.lcoh.total);
        assert_eq!(
            analysis.financials.annual_benefit,
            analysis.annual_costs.total_benefit
        );
        assert_eq!(analysis.financials.total_capex, analysis.capex.total_capex);
        assert_eq!(analysis.annual_costs.co2_saving, analysis.emissions.saving);
        assert_approx_eq!(
            MoneyPerLitre,
            analysis.breakeven_diesel_price.unwrap(),
            MoneyPerLitre(0.8630154409116245),
            epsilon = 1e-12
        );
        assert!(analysis.financials.npv > Money(0.0));
        assert!(analysis.annual_costs.total_benefit > MoneyPerYear(0.0));
    }

    #[rstest]
    fn test_baseline_analysis_tiny_discount_rate(params: ParameterSet) {
        let params = ParameterSet {
            discount_rate: Dimensionless(1e-17),
            ..params
        };
        let analysis = BaselineAnalysis::run(&params).unwrap();

        // Indistinguishable from an undiscounted appraisal
        assert_approx_eq!(
            MoneyPerKg,
            analysis.lcoh.total,
            MoneyPerKg(6.035081576112051),
            epsilon = 1e-9
        );
        assert!(analysis.financials.npv.is_finite());
        assert!(analysis.financials.benefit_cost_ratio.is_finite());
    }

    #[rstest]
    fn test_invalid_parameters(params: ParameterSet) {
        let params = ParameterSet {
            project_life_years: 0,
            ..params
        };
        assert_error!(BaselineAnalysis::run(&params), "Invalid parameters");
    }
}
