//! The console summary of a baseline analysis.
use crate::analysis::BaselineAnalysis;
use crate::parameters::ParameterSet;
use anyhow::Result;
use itertools::Itertools;
use std::fmt::Write;

/// Width of the section rules
const RULE_WIDTH: usize = 60;

/// Format a value rounded to an integer, with thousands separators
fn with_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let digits: Vec<char> = rounded.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",");

    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format an amount of money in millions of pounds
fn millions(value: f64) -> String {
    format!("£{:.2}M", value / 1e6)
}

fn write_section(out: &mut String, title: &str) -> Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    write!(out, "\n{rule}\n  {title}\n{rule}\n")?;
    Ok(())
}

fn write_line(out: &mut String, label: &str, value: &str) -> Result<()> {
    writeln!(out, "  {label:<33}: {value}")?;
    Ok(())
}

/// Render the results of a baseline analysis as a plain-text report.
///
/// All rounding happens here; the results themselves are unrounded.
pub fn format_summary(params: &ParameterSet, analysis: &BaselineAnalysis) -> Result<String> {
    let BaselineAnalysis {
        breakeven_diesel_price,
        demand,
        capex,
        emissions,
        lcoh,
        annual_costs,
        financials,
    } = analysis;
    let mut out = String::new();

    write_section(&mut out, "1. HYDROGEN DEMAND")?;
    write_line(
        &mut out,
        "Daily consumption per bus",
        &format!("{:.1} kg/bus/day", demand.daily_per_bus_kg),
    )?;
    write_line(
        &mut out,
        &format!("Existing fleet ({} buses)", params.existing_buses),
        &format!("{:.0} kg/day", demand.existing_fleet_daily_kg),
    )?;
    write_line(
        &mut out,
        &format!("Full fleet ({} buses)", params.total_buses),
        &format!("{:.0} kg/day", demand.full_fleet_daily_kg),
    )?;
    write_line(
        &mut out,
        "Supply gap to cover",
        &format!("{:.0} kg/day", demand.supply_gap_kg_per_day),
    )?;
    write_line(
        &mut out,
        "Annual demand",
        &format!("{:.0} tonnes/yr", demand.annual_total_tonnes()),
    )?;
    write_line(
        &mut out,
        "Annual fleet mileage",
        &format!("{} km/yr", with_thousands(demand.annual_fleet_mileage_km)),
    )?;

    write_section(&mut out, "2. INFRASTRUCTURE & CAPEX")?;
    write_line(
        &mut out,
        "New electrolyser capacity",
        &format!(
            "{} MWe -> {:.0} kg/day",
            params.new_electrolyser_mw, capex.new_production_kg_per_day
        ),
    )?;
    write_line(
        &mut out,
        "Total network production",
        &format!("{:.0} kg/day", capex.total_production_kg_per_day),
    )?;
    write_line(
        &mut out,
        "Network dispensing capacity",
        &format!("{:.0} kg/day", capex.network_dispensing_kg_per_day),
    )?;
    write_line(
        &mut out,
        "Electrolyser equipment",
        &millions(capex.electrolyser_equipment.value()),
    )?;
    write_line(
        &mut out,
        "BoP & installation",
        &millions(capex.electrolyser_bop.value()),
    )?;
    write_line(
        &mut out,
        "Electrolyser CAPEX total",
        &millions(capex.electrolyser_total.value()),
    )?;
    write_line(
        &mut out,
        &format!("{} x HRS stations", params.new_hrs_stations),
        &millions(capex.hrs_total.value()),
    )?;
    write_line(&mut out, "TOTAL CAPEX", &millions(capex.total_capex.value()))?;

    write_section(&mut out, "3. LEVELISED COST OF HYDROGEN")?;
    write_line(
        &mut out,
        "Electricity price assumption",
        &format!("£{:.0}/MWh", params.electricity_price.value()),
    )?;
    for (label, cost) in [
        ("Electricity cost component", lcoh.electricity),
        ("CAPEX amortised", lcoh.capex),
        ("Non-energy OPEX", lcoh.opex),
        ("Stack replacement", lcoh.stack_replacement),
        ("Production LCOH", lcoh.production),
        ("Transport", lcoh.transport),
        ("HRS operations", lcoh.hrs_opex),
    ] {
        write_line(&mut out, label, &format!("£{:.3}/kg", cost.value()))?;
    }
    write_line(
        &mut out,
        "TOTAL DISPENSED COST",
        &format!("£{:.2}/kg", lcoh.total.value()),
    )?;

    write_section(&mut out, "4. ANNUAL FLEET OPERATING COSTS")?;
    write_line(
        &mut out,
        "H2 fleet annual fuel cost",
        &millions(annual_costs.h2_cost.value()),
    )?;
    write_line(
        &mut out,
        "Diesel fleet annual fuel cost",
        &millions(annual_costs.diesel_cost.value()),
    )?;
    write_line(
        &mut out,
        "Fuel cost saving (H2 vs diesel)",
        &format!("{}/yr", millions(annual_costs.fuel_saving.value())),
    )?;
    write_line(
        &mut out,
        &format!("CO2 saved (@ £{}/t)", params.carbon_price.value()),
        &format!("{}/yr", millions(annual_costs.carbon_value.value())),
    )?;
    write_line(
        &mut out,
        "Total annual benefit",
        &format!("{}/yr", millions(annual_costs.total_benefit.value())),
    )?;
    let breakeven = breakeven_diesel_price.map_or_else(
        || "undefined".to_string(),
        |price| format!("£{:.3}/L", price.value()),
    );
    write_line(&mut out, "Breakeven diesel price", &breakeven)?;

    write_section(&mut out, "5. WELL-TO-WHEEL CO2 ANALYSIS")?;
    write_line(
        &mut out,
        "H2 emission factor",
        &format!("{:.3} kg CO2e/kg H2", emissions.total_ef),
    )?;
    write_line(
        &mut out,
        "  of which: production",
        &format!("{:.3}", emissions.production_ef),
    )?;
    write_line(
        &mut out,
        "            HRS operations",
        &format!("{:.4}", emissions.hrs_ef),
    )?;
    write_line(
        &mut out,
        "            transport",
        &format!("{:.3}", emissions.transport_ef),
    )?;
    write_line(
        &mut out,
        "H2 fleet annual CO2",
        &format!("{} t/yr", with_thousands(emissions.h2_annual.value())),
    )?;
    write_line(
        &mut out,
        "Diesel fleet annual CO2",
        &format!("{} t/yr", with_thousands(emissions.diesel_annual.value())),
    )?;
    write_line(
        &mut out,
        "Annual CO2 saving",
        &format!("{} t/yr", with_thousands(emissions.saving.value())),
    )?;
    let reduction = emissions
        .reduction_pct
        .map_or_else(|| "undefined".to_string(), |pct| format!("{pct:.1}%"));
    write_line(&mut out, "CO2 reduction", &reduction)?;

    write_section(&mut out, "6. FINANCIAL ANALYSIS (NPV / IRR)")?;
    write_line(
        &mut out,
        "Discount rate (WACC)",
        &format!("{:.0}%", params.discount_rate.value() * 100.0),
    )?;
    write_line(
        &mut out,
        "Project life",
        &format!("{} years", params.project_life_years),
    )?;
    write_line(
        &mut out,
        "Total CAPEX",
        &millions(financials.total_capex.value()),
    )?;
    write_line(
        &mut out,
        "Annual benefit (fuel + carbon)",
        &format!("{}/yr", millions(financials.annual_benefit.value())),
    )?;
    write_line(&mut out, "NPV", &millions(financials.npv.value()))?;
    let irr = financials.irr.map_or_else(
        || "not found (no sign change in NPV)".to_string(),
        |irr| format!("{:.1}%", irr.value() * 100.0),
    );
    write_line(&mut out, "IRR", &irr)?;
    let payback = if financials.simple_payback.is_finite() {
        format!("{:.1} years", financials.simple_payback.value())
    } else {
        "never".to_string()
    };
    write_line(&mut out, "Simple payback", &payback)?;
    write_line(
        &mut out,
        "Benefit-cost ratio",
        &format!("{:.3}", financials.benefit_cost_ratio.value()),
    )?;

    Ok(out)
}
