//! Sensitivity analysis: one- and two-factor sweeps over the economics functions.
//!
//! Each grid point is evaluated on its own resolved inputs. Nothing is shared or mutated between
//! points.
use crate::economics::{
    AnnualCostResult, FinancialResult, LcohResult, calculate_annual_costs, calculate_financials,
    calculate_lcoh, diesel_breakeven_price,
};
use crate::parameters::{LcohOverrides, ParameterSet};
use crate::units::{Dimensionless, MoneyPerKg, MoneyPerLitre, MoneyPerMWh, MoneyPerTonne};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Ranges and resolution of the sweeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Lowest electricity price swept
    pub electricity_price_min: MoneyPerMWh,
    /// Highest electricity price swept
    pub electricity_price_max: MoneyPerMWh,
    /// Number of electricity prices in one-factor sweeps
    pub electricity_steps: u32,
    /// Lowest carbon price on the heatmap
    pub carbon_price_min: MoneyPerTonne,
    /// Highest carbon price on the heatmap
    pub carbon_price_max: MoneyPerTonne,
    /// Number of points along each axis of the heatmap
    pub heatmap_steps: u32,
    /// Carbon prices compared in the breakeven diesel price sweep
    pub breakeven_carbon_scenarios: Vec<MoneyPerTonne>,
    /// Carbon prices compared in the NPV and IRR sweep
    pub financial_carbon_scenarios: Vec<MoneyPerTonne>,
    /// Fractional change applied either side of each parameter in the tornado
    pub tornado_variation: Dimensionless,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            electricity_price_min: MoneyPerMWh(20.0),
            electricity_price_max: MoneyPerMWh(120.0),
            electricity_steps: 80,
            carbon_price_min: MoneyPerTonne(20.0),
            carbon_price_max: MoneyPerTonne(200.0),
            heatmap_steps: 50,
            breakeven_carbon_scenarios: carbon_prices(&[0.0, 50.0, 100.0, 150.0]),
            financial_carbon_scenarios: carbon_prices(&[0.0, 50.0, 100.0, 150.0, 200.0]),
            tornado_variation: Dimensionless(0.2),
        }
    }
}

impl SweepConfig {
    /// Check that the ranges are well formed
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.electricity_price_min >= MoneyPerMWh(0.0)
                && self.electricity_price_min <= self.electricity_price_max
                && self.electricity_price_max.is_finite(),
            "Electricity price range must be finite, non-negative and have min <= max"
        );
        ensure!(
            self.carbon_price_min >= MoneyPerTonne(0.0)
                && self.carbon_price_min <= self.carbon_price_max
                && self.carbon_price_max.is_finite(),
            "Carbon price range must be finite, non-negative and have min <= max"
        );
        ensure!(
            self.electricity_steps > 0 && self.heatmap_steps > 0,
            "Number of sweep steps must be greater than zero"
        );
        ensure!(
            self.breakeven_carbon_scenarios
                .iter()
                .chain(&self.financial_carbon_scenarios)
                .all(|price| price.is_finite() && *price >= MoneyPerTonne(0.0)),
            "Carbon scenarios must be finite and non-negative"
        );
        ensure!(
            (0.0..1.0).contains(&self.tornado_variation.value()),
            "Tornado variation must be at least zero and less than one"
        );

        Ok(())
    }

    /// Electricity prices for one-factor sweeps
    pub fn electricity_prices(&self) -> Result<Vec<MoneyPerMWh>> {
        Ok(linspace(
            self.electricity_price_min.value(),
            self.electricity_price_max.value(),
            self.electricity_steps,
        )?
        .into_iter()
        .map(MoneyPerMWh)
        .collect())
    }
}

fn carbon_prices(values: &[f64]) -> Vec<MoneyPerTonne> {
    values.iter().copied().map(MoneyPerTonne).collect()
}

/// Generate `n` evenly spaced values from `min` to `max` inclusive.
///
/// A single point is just `min`.
pub fn linspace(min: f64, max: f64, n: u32) -> Result<Vec<f64>> {
    ensure!(n > 0, "Number of points must be greater than zero");
    if n == 1 {
        return Ok(vec![min]);
    }

    let step = (max - min) / f64::from(n - 1);
    Ok((0..n)
        .map(|i| if i == n - 1 { max } else { min + step * f64::from(i) })
        .collect())
}

/// LCOH at one electricity price
#[derive(Debug, Clone, PartialEq)]
pub struct LcohPoint {
    /// Electricity price
    pub electricity_price: MoneyPerMWh,
    /// LCOH breakdown
    pub lcoh: LcohResult,
}

/// Annual fuel costs at one electricity price
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualCostPoint {
    /// Electricity price
    pub electricity_price: MoneyPerMWh,
    /// Annual costs at the baseline carbon and diesel prices
    pub costs: AnnualCostResult,
}

/// Breakeven diesel price at one combination of electricity and carbon price
#[derive(Debug, Clone, PartialEq)]
pub struct BreakevenPoint {
    /// Electricity price
    pub electricity_price: MoneyPerMWh,
    /// Carbon price
    pub carbon_price: MoneyPerTonne,
    /// Breakeven diesel price, if defined
    pub diesel_price: Option<MoneyPerLitre>,
}

/// Project appraisal at one combination of electricity and carbon price
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialPoint {
    /// Electricity price
    pub electricity_price: MoneyPerMWh,
    /// Carbon price
    pub carbon_price: MoneyPerTonne,
    /// Appraisal at the baseline discount rate and project life
    pub result: FinancialResult,
}

/// LCOH across the electricity price range
pub fn lcoh_vs_electricity(params: &ParameterSet, config: &SweepConfig) -> Result<Vec<LcohPoint>> {
    config
        .electricity_prices()?
        .into_iter()
        .map(|electricity_price| {
            Ok(LcohPoint {
                electricity_price,
                lcoh: calculate_lcoh(params, electricity_price, params.discount_rate)?,
            })
        })
        .collect()
}

/// Annual H2 and diesel fuel costs across the electricity price range
pub fn annual_cost_vs_electricity(
    params: &ParameterSet,
    config: &SweepConfig,
) -> Result<Vec<AnnualCostPoint>> {
    config
        .electricity_prices()?
        .into_iter()
        .map(|electricity_price| {
            Ok(AnnualCostPoint {
                electricity_price,
                costs: calculate_annual_costs(
                    params,
                    electricity_price,
                    params.carbon_price,
                    params.diesel_price,
                )?,
            })
        })
        .collect()
}

/// Breakeven diesel price for each carbon scenario across the electricity price range
pub fn breakeven_vs_electricity(
    params: &ParameterSet,
    config: &SweepConfig,
) -> Result<Vec<BreakevenPoint>> {
    config
        .breakeven_carbon_scenarios
        .iter()
        .cartesian_product(config.electricity_prices()?)
        .map(|(&carbon_price, electricity_price)| {
            Ok(BreakevenPoint {
                electricity_price,
                carbon_price,
                diesel_price: diesel_breakeven_price(
                    params,
                    electricity_price,
                    Some(carbon_price),
                )?,
            })
        })
        .collect()
}

fn financial_point(
    params: &ParameterSet,
    electricity_price: MoneyPerMWh,
    carbon_price: MoneyPerTonne,
) -> Result<FinancialPoint> {
    let result = calculate_financials(
        params,
        electricity_price,
        carbon_price,
        params.discount_rate,
        params.project_life_years,
    )
    .with_context(|| {
        format!("Appraisal failed for electricity at {electricity_price:?}, carbon at {carbon_price:?}")
    })?;

    Ok(FinancialPoint {
        electricity_price,
        carbon_price,
        result,
    })
}

/// NPV and IRR for each carbon scenario across the electricity price range
pub fn financials_vs_electricity(
    params: &ParameterSet,
    config: &SweepConfig,
) -> Result<Vec<FinancialPoint>> {
    config
        .financial_carbon_scenarios
        .iter()
        .cartesian_product(config.electricity_prices()?)
        .map(|(&carbon_price, electricity_price)| {
            financial_point(params, electricity_price, carbon_price)
        })
        .collect()
}

/// Project appraisal over the electricity × carbon price grid
pub fn npv_heatmap(params: &ParameterSet, config: &SweepConfig) -> Result<Vec<FinancialPoint>> {
    let electricity_prices = linspace(
        config.electricity_price_min.value(),
        config.electricity_price_max.value(),
        config.heatmap_steps,
    )?;
    let carbon_prices = linspace(
        config.carbon_price_min.value(),
        config.carbon_price_max.value(),
        config.heatmap_steps,
    )?;

    carbon_prices
        .into_iter()
        .cartesian_product(electricity_prices)
        .map(|(carbon_price, electricity_price)| {
            financial_point(
                params,
                MoneyPerMWh(electricity_price),
                MoneyPerTonne(carbon_price),
            )
        })
        .collect()
}

/// Inputs varied in the LCOH tornado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SweepParameter {
    /// Price paid for electricity
    #[strum(to_string = "Electricity price")]
    ElectricityPrice,
    /// Electricity consumed per kg
    #[strum(to_string = "Electrolyser efficiency")]
    ElectrolyserEfficiency,
    /// Electrolyser equipment cost
    #[strum(to_string = "Electrolyser cost")]
    ElectrolyserCost,
    /// Balance of plant fraction
    #[strum(to_string = "Balance of plant")]
    BopFraction,
    /// Delivery cost
    #[strum(to_string = "Transport cost")]
    TransportCost,
    /// Refuelling station operating cost
    #[strum(to_string = "HRS opex")]
    HrsOpex,
    /// Rate used to annualise capex
    #[strum(to_string = "Discount rate")]
    DiscountRate,
}

impl SweepParameter {
    /// Total LCOH with this parameter scaled by `factor` and everything else at baseline
    fn scaled_lcoh(self, params: &ParameterSet, factor: Dimensionless) -> Result<MoneyPerKg> {
        let mut overrides = LcohOverrides::default();
        let mut electricity_price = params.electricity_price;
        let mut discount_rate = params.discount_rate;
        match self {
            Self::ElectricityPrice => electricity_price = electricity_price * factor,
            Self::ElectrolyserEfficiency => {
                overrides.electrolyser_efficiency = Some(params.electrolyser_efficiency * factor);
            }
            Self::ElectrolyserCost => {
                overrides.electrolyser_cost = Some(params.electrolyser_cost * factor);
            }
            Self::BopFraction => overrides.bop_fraction = Some(params.bop_fraction * factor),
            Self::TransportCost => overrides.transport_cost = Some(params.transport_cost * factor),
            Self::HrsOpex => overrides.hrs_opex = Some(params.hrs_opex * factor),
            Self::DiscountRate => discount_rate = discount_rate * factor,
        }

        let resolved = overrides.apply(params);
        Ok(calculate_lcoh(&resolved, electricity_price, discount_rate)?.total)
    }
}

/// Change in LCOH when one parameter is moved down and up
#[derive(Debug, Clone, PartialEq)]
pub struct TornadoBar {
    /// The parameter varied
    pub parameter: SweepParameter,
    /// LCOH change with the parameter reduced
    pub low: MoneyPerKg,
    /// LCOH change with the parameter increased
    pub high: MoneyPerKg,
}

impl TornadoBar {
    /// Width of the bar
    pub fn swing(&self) -> MoneyPerKg {
        MoneyPerKg((self.high - self.low).value().abs())
    }
}

/// One-at-a-time LCOH sensitivity, widest bar first
pub fn lcoh_tornado(params: &ParameterSet, config: &SweepConfig) -> Result<Vec<TornadoBar>> {
    let baseline = calculate_lcoh(params, params.electricity_price, params.discount_rate)?.total;
    let down = Dimensionless(1.0) - config.tornado_variation;
    let up = Dimensionless(1.0) + config.tornado_variation;

    let mut bars = SweepParameter::iter()
        .map(|parameter| {
            Ok(TornadoBar {
                parameter,
                low: parameter.scaled_lcoh(params, down)? - baseline,
                high: parameter.scaled_lcoh(params, up)? - baseline,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    bars.sort_by(|a, b| b.swing().value().total_cmp(&a.swing().value()));

    Ok(bars)
}

/// The output of every sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityResults {
    /// LCOH against electricity price
    pub lcoh: Vec<LcohPoint>,
    /// Annual costs against electricity price
    pub annual_costs: Vec<AnnualCostPoint>,
    /// Breakeven diesel price against electricity price, per carbon scenario
    pub breakeven: Vec<BreakevenPoint>,
    /// NPV and IRR against electricity price, per carbon scenario
    pub financials: Vec<FinancialPoint>,
    /// NPV over the electricity × carbon grid
    pub heatmap: Vec<FinancialPoint>,
    /// LCOH tornado
    pub tornado: Vec<TornadoBar>,
}

impl SensitivityResults {
    /// Run every sweep
    pub fn run(params: &ParameterSet, config: &SweepConfig) -> Result<Self> {
        config.validate()?;

        info!("Sweeping LCOH and annual costs against electricity price...");
        let lcoh = lcoh_vs_electricity(params, config)?;
        let annual_costs = annual_cost_vs_electricity(params, config)?;

        info!(
            "Sweeping breakeven diesel price for {} carbon scenarios...",
            config.breakeven_carbon_scenarios.len()
        );
        let breakeven = breakeven_vs_electricity(params, config)?;
        info!(
            "Sweeping NPV and IRR for {} carbon scenarios...",
            config.financial_carbon_scenarios.len()
        );
        let financials = financials_vs_electricity(params, config)?;

        info!("Calculating {0}x{0} NPV heatmap...", config.heatmap_steps);
        let heatmap = npv_heatmap(params, config)?;

        info!("Calculating LCOH tornado...");
        let tornado = lcoh_tornado(params, config)?;

        Ok(Self {
            lcoh,
            annual_costs,
            breakeven,
            financials,
            heatmap,
            tornado,
        })
    }
}
