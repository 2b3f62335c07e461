//! Program settings, read from `settings.toml` in the user's config directory.
//!
//! Every setting is optional. Settings are checked when loaded, so a typo in the log level or
//! default scenario is reported before any work is done.
use crate::cli::scenario::{DEFAULT_SCENARIO, scenario_names};
use crate::get_h2fleet_config_dir;
use crate::input::{input_err_msg, read_toml};
use crate::log::{DEFAULT_LOG_LEVEL, parse_log_level};
use crate::output::DEFAULT_OUTPUT_ROOT;
use anyhow::{Context, Result, ensure};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# Program settings for h2fleet
# Every setting is shown with its default value. Uncomment a line to change it.
";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_h2fleet_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Log level: off, error, warn, info, debug or trace
    pub log_level: String,
    /// Whether to overwrite existing results folders
    pub overwrite: bool,
    /// Folder in which each scenario's results folder is created
    pub results_dir: PathBuf,
    /// Bundled scenario run by `h2fleet run` when no scenario file is given
    pub default_scenario: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            results_dir: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            default_scenario: DEFAULT_SCENARIO.to_string(),
        }
    }
}

impl Settings {
    /// Read the settings file, using default settings if there isn't one
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read and check settings from `file_path`, falling back to defaults if there is no file
    pub fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let settings: Settings = read_toml(file_path)?;
        settings
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(settings)
    }

    /// Check that every setting has a usable value
    pub fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;
        ensure!(
            scenario_names().contains(&self.default_scenario.as_str()),
            "Unknown bundled scenario: {}",
            self.default_scenario
        );
        ensure!(
            !self.results_dir.as_os_str().is_empty(),
            "results_dir must not be empty"
        );

        Ok(())
    }

    /// The contents of a settings file with every setting commented out and documented
    pub fn default_file_contents() -> Result<String> {
        let defaults = toml::Table::try_from(Settings::default())
            .context("Could not convert settings to TOML")?;

        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for (field, value) in &defaults {
            let docs = Settings::get_field_docs(field)
                .with_context(|| format!("Missing doc comment for setting {field}"))?;
            write!(&mut out, "\n# {docs}\n# {field} = {value}\n")?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(
            &file_path,
            "log_level = \"warn\"\nresults_dir = \"/data/fleet\"\ndefault_scenario = \"high_carbon\"\n",
        )
        .unwrap();

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                overwrite: false,
                results_dir: PathBuf::from("/data/fleet"),
                default_scenario: "high_carbon".to_string(),
            }
        );
    }

    #[test]
    fn test_settings_load_from_path_invalid() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);

        fs::write(&file_path, "log_level = \"loud\"\n").unwrap();
        let err = Settings::load_from_path(&file_path).unwrap_err();
        assert_eq!(err.root_cause().to_string(), "Unknown log level: loud");

        fs::write(&file_path, "default_scenario = \"nowhere\"\n").unwrap();
        let err = Settings::load_from_path(&file_path).unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "Unknown bundled scenario: nowhere"
        );

        // Unknown settings are rejected
        fs::write(&file_path, "debug_model = true\n").unwrap();
        assert!(Settings::load_from_path(&file_path).is_err());
    }

    #[test]
    fn test_default_settings_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents().unwrap();
        assert!(contents.starts_with(DEFAULT_SETTINGS_FILE_HEADER));
        assert!(contents.contains("# log_level = \"info\""));
        assert!(contents.contains("# overwrite = false"));
        assert!(contents.contains("# results_dir = \"h2fleet_results\""));
        assert!(contents.contains("# default_scenario = \"baseline\""));
        assert!(contents.contains("# Whether to overwrite existing results folders"));
    }

    #[test]
    fn test_default_file_contents_parses_as_defaults() {
        let settings: Settings =
            toml::from_str(&Settings::default_file_contents().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
