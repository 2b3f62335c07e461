//! Whole-project appraisal: NPV, IRR, payback and benefit-cost ratio.
use super::annual_costs::calculate_annual_costs;
use crate::finance::{CashFlowSeries, annuity_present_value};
use crate::infrastructure::calculate_capex;
use crate::parameters::ParameterSet;
use crate::units::{Dimensionless, Money, MoneyPerMWh, MoneyPerTonne, MoneyPerYear, Year};
use anyhow::{Result, ensure};
use log::debug;
use serde::Serialize;

/// Financial return of the project
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialResult {
    /// Upfront capital cost (electrolyser and refuelling stations)
    pub total_capex: Money,
    /// Benefit received in each year of the project
    pub annual_benefit: MoneyPerYear,
    /// Net present value
    pub npv: Money,
    /// Internal rate of return, if one exists in the search range
    pub irr: Option<Dimensionless>,
    /// Years to recover capex. Infinite if the annual benefit is not positive.
    pub simple_payback: Year,
    /// Present value of benefits over capex
    pub benefit_cost_ratio: Dimensionless,
}

/// Years taken for `annual_benefit` to repay `capex`, ignoring discounting
fn simple_payback(capex: Money, annual_benefit: MoneyPerYear) -> Year {
    if annual_benefit > MoneyPerYear(0.0) {
        capex / annual_benefit
    } else {
        Year(f64::INFINITY)
    }
}

/// Appraise the project over `project_life` years.
///
/// The cash flows are the total capex in year 0 followed by a constant annual benefit (see
/// [`calculate_annual_costs`]), costed at the parameter set's diesel price. `discount_rate` is the
/// appraisal rate; electrolyser capex within the LCOH is annualised at the parameter set's own
/// discount rate.
///
/// An absent IRR is not an error: the remaining figures are still reported.
pub fn calculate_financials(
    params: &ParameterSet,
    electricity_price: MoneyPerMWh,
    carbon_price: MoneyPerTonne,
    discount_rate: Dimensionless,
    project_life: u32,
) -> Result<FinancialResult> {
    let total_capex = calculate_capex(params).total_capex;
    ensure!(
        total_capex > Money(0.0),
        "Total capital cost must be greater than zero"
    );

    let annual_benefit =
        calculate_annual_costs(params, electricity_price, carbon_price, params.diesel_price)?
            .total_benefit;
    let cash_flows = CashFlowSeries::new(total_capex, annual_benefit, project_life)?;
    let npv = cash_flows.npv(discount_rate);
    let irr = cash_flows.irr()?;
    if irr.is_none() {
        debug!(
            "No IRR for electricity at {electricity_price:?} and carbon at {carbon_price:?} \
            (annual benefit {annual_benefit:?})"
        );
    }

    let benefit_pv = annuity_present_value(annual_benefit, project_life, discount_rate)?;

    Ok(FinancialResult {
        total_capex,
        annual_benefit,
        npv,
        irr,
        simple_payback: simple_payback(total_capex, annual_benefit),
        benefit_cost_ratio: benefit_pv / total_capex,
    })
}
