//! The `settings` subcommands.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for managing the settings file
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the path of the settings file
    Path,
    /// Print the settings currently in effect
    Show,
    /// Print a documented settings file with every setting at its default value
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        let file_path = get_settings_file_path();
        match self {
            Self::Edit => edit_settings_file(&file_path),
            Self::Path => {
                println!("{}", file_path.display());
                Ok(())
            }
            Self::Show => {
                print!("{}", effective_settings(&file_path)?);
                Ok(())
            }
            Self::DumpDefault => {
                print!("{}", Settings::default_file_contents()?);
                Ok(())
            }
        }
    }
}

/// Write a documented default settings file to `file_path` unless one is already there.
///
/// # Returns
///
/// Whether a new file was written
fn write_default_settings_file(file_path: &Path) -> Result<bool> {
    if file_path.is_file() {
        return Ok(false);
    }

    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    fs::write(file_path, Settings::default_file_contents()?)
        .with_context(|| format!("Failed to write settings file: {}", file_path.display()))?;

    Ok(true)
}

/// Open the settings file for editing, then check that the edited file can be loaded
fn edit_settings_file(file_path: &Path) -> Result<()> {
    if write_default_settings_file(file_path)? {
        println!("Created settings file: {}", file_path.display());
    }

    edit::edit_file(file_path)
        .with_context(|| format!("Could not open {} in an editor", file_path.display()))?;
    Settings::load_from_path(file_path).context("The edited settings file is invalid")?;

    Ok(())
}

/// The settings loaded from `file_path` (or the defaults), as TOML
fn effective_settings(file_path: &Path) -> Result<String> {
    let settings = Settings::load_from_path(file_path)?;
    toml::to_string(&settings).context("Could not convert settings to TOML")
}
