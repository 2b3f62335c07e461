//! Common functionality for h2fleet, a techno-economic model of converting a diesel bus fleet to
//! hydrogen fuel cells.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod analysis;
pub mod cli;
pub mod demand;
pub mod economics;
pub mod emissions;
pub mod finance;
pub mod infrastructure;
pub mod input;
pub mod log;
pub mod output;
pub mod parameters;
pub mod report;
pub mod scenario;
pub mod sensitivity;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// On Linux, this will be `~/.config/h2fleet`. If the platform has no config directory, the
/// current directory is used instead.
pub fn get_h2fleet_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("h2fleet");

    path
}
