//! Code related to the bundled scenarios and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::scenario::Scenario;
use crate::settings::Settings;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, File, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the bundled scenarios.
static SCENARIOS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/scenarios");

/// The bundled scenario run when no scenario file is given, unless the settings name another
pub const DEFAULT_SCENARIO: &str = "baseline";

/// The available subcommands for managing bundled scenarios.
#[derive(Subcommand)]
pub enum ScenarioSubcommands {
    /// List available scenarios.
    List,
    /// Provide information about the specified scenario.
    Info {
        /// The name of the scenario.
        name: String,
    },
    /// Extract a scenario file so it can be edited.
    Extract {
        /// The name of the scenario to extract.
        name: String,
        /// The destination for the scenario file.
        new_path: Option<PathBuf>,
    },
    /// Run a bundled scenario.
    Run {
        /// The name of the scenario to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ScenarioSubcommands {
    /// Execute the supplied scenario subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_scenario_list_command(),
            Self::Info { name } => handle_scenario_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_scenario_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_scenario_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// Names of the bundled scenarios, in alphabetical order
pub fn scenario_names() -> Vec<&'static str> {
    let mut names: Vec<_> = SCENARIOS_DIR
        .files()
        .filter_map(|file| file.path().file_stem()?.to_str())
        .collect();
    names.sort_unstable();

    names
}

/// Get the file for the named bundled scenario
fn get_scenario_file(name: &str) -> Result<&'static File<'static>> {
    SCENARIOS_DIR
        .get_file(format!("{name}.toml"))
        .with_context(|| format!("Scenario not found: {name}"))
}

/// Load and validate the named bundled scenario
pub fn load_bundled_scenario(name: &str) -> Result<Scenario> {
    let contents = get_scenario_file(name)?
        .contents_utf8()
        .context("Scenario file is not UTF-8 encoded")?;

    Scenario::from_toml_str(contents).with_context(|| format!("Invalid bundled scenario: {name}"))
}

/// Handle the `scenario list` command.
fn handle_scenario_list_command() {
    for name in scenario_names() {
        println!("{name}");
    }
}

/// Handle the `scenario info` command.
fn handle_scenario_info_command(name: &str) -> Result<()> {
    let scenario = load_bundled_scenario(name)?;
    println!("{}", scenario.description.trim());

    Ok(())
}

/// Handle the `scenario extract` command
fn handle_scenario_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let default_dest = PathBuf::from(format!("{name}.toml"));
    extract_scenario(name, dest.unwrap_or(&default_dest))
}

/// Extract the specified scenario to a new file
fn extract_scenario(name: &str, new_path: &Path) -> Result<()> {
    let file = get_scenario_file(name)?;

    ensure!(
        !new_path.exists(),
        "Destination {} already exists",
        new_path.display()
    );

    fs::write(new_path, file.contents())
        .with_context(|| format!("Could not write {}", new_path.display()))?;

    Ok(())
}

/// Handle the `scenario run` command.
pub fn handle_scenario_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let scenario_path = temp_dir.path().join(format!("{name}.toml"));
    extract_scenario(name, &scenario_path)?;
    handle_run_command(Some(&scenario_path), opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSet;
    use crate::sensitivity::SweepConfig;
    use crate::units::{MoneyPerLitre, MoneyPerTonne};
    use tempfile::tempdir;

    #[test]
    fn test_scenario_names() {
        assert_eq!(
            scenario_names(),
            ["baseline", "high_carbon", "stressed_diesel"]
        );
    }

    #[test]
    fn test_bundled_scenarios_are_valid() {
        for name in scenario_names() {
            load_bundled_scenario(name).unwrap();
        }
    }

    #[test]
    fn test_baseline_scenario_matches_defaults() {
        let scenario = load_bundled_scenario(DEFAULT_SCENARIO).unwrap();
        assert_eq!(scenario.parameters, ParameterSet::default());
        assert_eq!(scenario.sensitivity, SweepConfig::default());
    }

    #[test]
    fn test_bundled_scenario_overrides() {
        let scenario = load_bundled_scenario("stressed_diesel").unwrap();
        assert_eq!(scenario.parameters.diesel_price, MoneyPerLitre(2.0));

        let scenario = load_bundled_scenario("high_carbon").unwrap();
        assert_eq!(scenario.parameters.carbon_price, MoneyPerTonne(150.0));
    }

    #[test]
    fn test_unknown_scenario() {
        assert_eq!(
            load_bundled_scenario("nonexistent").unwrap_err().to_string(),
            "Scenario not found: nonexistent"
        );
    }

    #[test]
    fn test_extract_scenario() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("mine.toml");
        extract_scenario("high_carbon", &dest).unwrap();
        assert_eq!(
            Scenario::from_path(&dest).unwrap(),
            load_bundled_scenario("high_carbon").unwrap()
        );

        // Won't overwrite
        assert!(extract_scenario("high_carbon", &dest).is_err());
    }
}
