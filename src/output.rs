//! The module responsible for writing output data to disk.
use crate::analysis::BaselineAnalysis;
use crate::sensitivity::{FinancialPoint, SensitivityResults};
use crate::units::{
    Dimensionless, Money, MoneyPerKg, MoneyPerLitre, MoneyPerMWh, MoneyPerTonne, MoneyPerYear,
    TonnesPerYear, Year,
};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The default folder in which scenario-specific output folders are created
pub const DEFAULT_OUTPUT_ROOT: &str = "h2fleet_results";

/// The output file name for the LCOH breakdown against electricity price
pub const LCOH_FILE_NAME: &str = "lcoh_vs_electricity.csv";

/// The output file name for annual fuel costs against electricity price
pub const ANNUAL_COST_FILE_NAME: &str = "annual_cost_vs_electricity.csv";

/// The output file name for breakeven diesel prices
pub const BREAKEVEN_FILE_NAME: &str = "breakeven_diesel.csv";

/// The output file name for NPV and IRR against electricity price
pub const FINANCIALS_FILE_NAME: &str = "npv_irr_vs_electricity.csv";

/// The output file name for the NPV heatmap
pub const HEATMAP_FILE_NAME: &str = "npv_heatmap.csv";

/// The output file name for the LCOH tornado
pub const TORNADO_FILE_NAME: &str = "lcoh_tornado.csv";

/// The output file name for the emissions of each pathway
pub const EMISSIONS_FILE_NAME: &str = "emissions_comparison.csv";

/// The output file name for the capex breakdown
pub const CAPEX_FILE_NAME: &str = "capex_breakdown.csv";

/// The output file name for the baseline results
pub const BASELINE_FILE_NAME: &str = "baseline_results.toml";

/// Get the default output directory for the named scenario, under `results_root`
pub fn get_output_dir(results_root: &Path, scenario_name: &str) -> PathBuf {
    results_root.join(scenario_name)
}

/// Get the scenario name from the path to a scenario file
pub fn get_scenario_name(scenario_path: &Path) -> Result<&str> {
    scenario_path
        .file_stem()
        .context("Scenario path has no file name")?
        .to_str()
        .context("Invalid chars in scenario file name")
}

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only replaced when `allow_overwrite`
/// is set.
///
/// # Returns
///
/// Whether an existing directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please change the output path or use --overwrite."
        );
        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the LCOH output file
#[derive(Serialize)]
struct LcohRow {
    electricity_price: MoneyPerMWh,
    electricity: MoneyPerKg,
    capex: MoneyPerKg,
    opex: MoneyPerKg,
    stack_replacement: MoneyPerKg,
    transport: MoneyPerKg,
    hrs_opex: MoneyPerKg,
    production: MoneyPerKg,
    total: MoneyPerKg,
}

/// Represents a row in the annual costs output file
#[derive(Serialize)]
struct AnnualCostRow {
    electricity_price: MoneyPerMWh,
    h2_cost: MoneyPerYear,
    diesel_cost: MoneyPerYear,
    fuel_saving: MoneyPerYear,
    carbon_value: MoneyPerYear,
    total_benefit: MoneyPerYear,
}

/// Represents a row in the breakeven output file. An empty price means undefined.
#[derive(Serialize)]
struct BreakevenRow {
    carbon_price: MoneyPerTonne,
    electricity_price: MoneyPerMWh,
    breakeven_diesel_price: Option<MoneyPerLitre>,
}

/// Represents a row in the NPV/IRR and heatmap output files. An empty IRR means none was found.
#[derive(Serialize)]
struct FinancialRow {
    carbon_price: MoneyPerTonne,
    electricity_price: MoneyPerMWh,
    annual_benefit: MoneyPerYear,
    npv: Money,
    irr: Option<Dimensionless>,
    simple_payback: Year,
    benefit_cost_ratio: Dimensionless,
}

impl From<&FinancialPoint> for FinancialRow {
    fn from(point: &FinancialPoint) -> Self {
        Self {
            carbon_price: point.carbon_price,
            electricity_price: point.electricity_price,
            annual_benefit: point.result.annual_benefit,
            npv: point.result.npv,
            irr: point.result.irr,
            simple_payback: point.result.simple_payback,
            benefit_cost_ratio: point.result.benefit_cost_ratio,
        }
    }
}

/// Represents a row in the tornado output file
#[derive(Serialize)]
struct TornadoRow {
    parameter: String,
    low: MoneyPerKg,
    high: MoneyPerKg,
    swing: MoneyPerKg,
}

/// Represents a row in the emissions output file
#[derive(Serialize)]
struct EmissionsRow {
    pathway: &'static str,
    annual_emissions: TonnesPerYear,
}

/// Represents a row in the capex output file
#[derive(Serialize)]
struct CapexRow {
    item: &'static str,
    cost: Money,
}

/// Write all rows to a new CSV file in `output_dir`
fn write_csv<T, I>(output_dir: &Path, file_name: &str, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file_path = output_dir.join(file_name);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the output of every sweep to CSV files
pub fn write_sensitivity_results(output_dir: &Path, results: &SensitivityResults) -> Result<()> {
    write_csv(
        output_dir,
        LCOH_FILE_NAME,
        results.lcoh.iter().map(|point| LcohRow {
            electricity_price: point.electricity_price,
            electricity: point.lcoh.electricity,
            capex: point.lcoh.capex,
            opex: point.lcoh.opex,
            stack_replacement: point.lcoh.stack_replacement,
            transport: point.lcoh.transport,
            hrs_opex: point.lcoh.hrs_opex,
            production: point.lcoh.production,
            total: point.lcoh.total,
        }),
    )?;
    write_csv(
        output_dir,
        ANNUAL_COST_FILE_NAME,
        results.annual_costs.iter().map(|point| AnnualCostRow {
            electricity_price: point.electricity_price,
            h2_cost: point.costs.h2_cost,
            diesel_cost: point.costs.diesel_cost,
            fuel_saving: point.costs.fuel_saving,
            carbon_value: point.costs.carbon_value,
            total_benefit: point.costs.total_benefit,
        }),
    )?;
    write_csv(
        output_dir,
        BREAKEVEN_FILE_NAME,
        results.breakeven.iter().map(|point| BreakevenRow {
            carbon_price: point.carbon_price,
            electricity_price: point.electricity_price,
            breakeven_diesel_price: point.diesel_price,
        }),
    )?;
    write_csv(
        output_dir,
        FINANCIALS_FILE_NAME,
        results.financials.iter().map(FinancialRow::from),
    )?;
    write_csv(
        output_dir,
        HEATMAP_FILE_NAME,
        results.heatmap.iter().map(FinancialRow::from),
    )?;
    write_csv(
        output_dir,
        TORNADO_FILE_NAME,
        results.tornado.iter().map(|bar| TornadoRow {
            parameter: bar.parameter.to_string(),
            low: bar.low,
            high: bar.high,
            swing: bar.swing(),
        }),
    )?;

    Ok(())
}

/// Write the baseline results to a TOML file plus the emissions and capex CSV files
pub fn write_baseline_results(output_dir: &Path, analysis: &BaselineAnalysis) -> Result<()> {
    let file_path = output_dir.join(BASELINE_FILE_NAME);
    let toml_str = toml::to_string(analysis).context("Could not serialise baseline results")?;
    fs::write(&file_path, toml_str)
        .with_context(|| format!("Could not write {}", file_path.display()))?;

    write_csv(
        output_dir,
        EMISSIONS_FILE_NAME,
        [
            EmissionsRow {
                pathway: "Hydrogen",
                annual_emissions: analysis.emissions.h2_annual,
            },
            EmissionsRow {
                pathway: "Diesel",
                annual_emissions: analysis.emissions.diesel_annual,
            },
        ],
    )?;

    let capex = &analysis.capex;
    write_csv(
        output_dir,
        CAPEX_FILE_NAME,
        [
            ("Electrolyser equipment", capex.electrolyser_equipment),
            ("Balance of plant", capex.electrolyser_bop),
            ("Refuelling stations", capex.hrs_total),
        ]
        .into_iter()
        .map(|(item, cost)| CapexRow { item, cost }),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{params, sweep_config};
    use crate::parameters::ParameterSet;
    use crate::sensitivity::SweepConfig;
    use itertools::Itertools;
    use rstest::rstest;
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use tempfile::tempdir;

    fn read_lines(file_path: &Path) -> Vec<String> {
        let file = File::open(file_path).unwrap();
        BufReader::new(file).lines().map(Result::unwrap).collect()
    }

    #[test]
    fn test_get_output_dir() {
        assert_eq!(
            get_output_dir(Path::new(DEFAULT_OUTPUT_ROOT), "baseline"),
            PathBuf::from("h2fleet_results/baseline")
        );
        assert_eq!(
            get_output_dir(Path::new("/tmp/fleet"), "high_carbon"),
            PathBuf::from("/tmp/fleet/high_carbon")
        );
    }

    #[test]
    fn test_get_scenario_name() {
        assert_eq!(
            get_scenario_name(Path::new("scenarios/high_carbon.toml")).unwrap(),
            "high_carbon"
        );
    }

    #[test]
    fn test_create_output_directory_new_and_empty() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing empty directories are reused
        assert!(!create_output_directory(&output_dir, false).unwrap());
    }

    #[test]
    fn test_create_output_directory_non_empty() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("stale.csv");
        fs::write(&file_path, "old").unwrap();

        assert!(create_output_directory(dir.path(), false).is_err());
        assert!(file_path.exists());

        assert!(create_output_directory(dir.path(), true).unwrap());
        assert!(dir.path().is_dir());
        assert!(!file_path.exists());
    }

    #[rstest]
    fn test_write_sensitivity_results(params: ParameterSet, sweep_config: SweepConfig) {
        let results = SensitivityResults::run(&params, &sweep_config).unwrap();
        let dir = tempdir().unwrap();
        write_sensitivity_results(dir.path(), &results).unwrap();

        let lines = read_lines(&dir.path().join(LCOH_FILE_NAME));
        assert_eq!(
            lines[0],
            "electricity_price,electricity,capex,opex,stack_replacement,transport,hrs_opex,\
            production,total"
        );
        assert_eq!(lines.len(), 1 + 5);
        assert!(lines[1].starts_with("20.0,"));

        let lines = read_lines(&dir.path().join(HEATMAP_FILE_NAME));
        assert_eq!(lines.len(), 1 + 16);

        let lines = read_lines(&dir.path().join(TORNADO_FILE_NAME));
        assert_eq!(lines[0], "parameter,low,high,swing");
        assert_eq!(lines.len(), 1 + 7);

        for file_name in [ANNUAL_COST_FILE_NAME, BREAKEVEN_FILE_NAME, FINANCIALS_FILE_NAME] {
            assert!(dir.path().join(file_name).is_file());
        }
    }

    #[rstest]
    fn test_write_baseline_results(params: ParameterSet) {
        let analysis = BaselineAnalysis::run(&params).unwrap();
        let dir = tempdir().unwrap();
        write_baseline_results(dir.path(), &analysis).unwrap();

        let toml_str = fs::read_to_string(dir.path().join(BASELINE_FILE_NAME)).unwrap();
        let value: toml::Table = toml::from_str(&toml_str).unwrap();
        assert!(
            ["demand", "capex", "emissions", "lcoh", "annual_costs", "financials"]
                .iter()
                .all(|key| value.contains_key(*key))
        );

        let lines = read_lines(&dir.path().join(CAPEX_FILE_NAME));
        assert_eq!(
            lines.iter().skip(1).map(|line| line.split(',').next().unwrap()).collect_vec(),
            ["Electrolyser equipment", "Balance of plant", "Refuelling stations"]
        );

        let lines = read_lines(&dir.path().join(EMISSIONS_FILE_NAME));
        assert_eq!(lines[0], "pathway,annual_emissions");
        assert_eq!(lines.len(), 3);
    }
}
