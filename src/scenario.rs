//! Scenario files: a parameter set and sweep configuration read from TOML.
use crate::input::{input_err_msg, read_toml};
use crate::parameters::ParameterSet;
use crate::sensitivity::SweepConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A complete scenario.
///
/// Every section is optional. Missing values take their baseline defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Free-text description of the scenario
    pub description: String,
    /// Techno-economic parameters
    pub parameters: ParameterSet,
    /// Sweep ranges for sensitivity analysis
    pub sensitivity: SweepConfig,
}

impl Scenario {
    /// Read and validate a scenario file
    pub fn from_path(file_path: &Path) -> Result<Self> {
        let scenario: Scenario = read_toml(file_path)?;
        scenario
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(scenario)
    }

    /// Parse and validate a scenario from TOML text
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(toml_str).context("Could not parse scenario")?;
        scenario.validate()?;

        Ok(scenario)
    }

    /// Check that parameters and sweep ranges are valid
    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;
        self.sensitivity.validate()
    }
}
