//! The command line interface for h2fleet.
use crate::analysis::BaselineAnalysis;
use crate::log;
use crate::output::{
    create_output_directory, get_output_dir, get_scenario_name, write_baseline_results,
    write_sensitivity_results,
};
use crate::report::format_summary;
use crate::scenario::Scenario;
use crate::sensitivity::SensitivityResults;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod scenario;
use scenario::{ScenarioSubcommands, handle_scenario_run_command};
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for h2fleet.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the analysis for a scenario.
    Run {
        /// Path to the scenario file. The bundled baseline scenario is used if omitted.
        scenario: Option<PathBuf>,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage bundled scenarios.
    Scenario {
        /// The available subcommands for managing bundled scenarios.
        #[command(subcommand)]
        subcommand: ScenarioSubcommands,
    },
    /// Validate a scenario file.
    Validate {
        /// Path to the scenario file.
        scenario: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { scenario, opts } => handle_run_command(scenario.as_deref(), &opts, None),
            Self::Scenario { subcommand } => subcommand.execute(),
            Self::Validate { scenario } => handle_validate_command(&scenario, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start h2fleet
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ h2fleet --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
///
/// Without a scenario file, the bundled scenario named by the `default_scenario` setting is run.
pub fn handle_run_command(
    scenario_path: Option<&Path>,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    let Some(scenario_path) = scenario_path else {
        let name = settings.default_scenario.clone();
        return handle_scenario_run_command(&name, opts, Some(settings));
    };

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(&settings.results_dir, get_scenario_name(scenario_path)?);
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(&settings.log_level), Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the scenario to run
    let scenario = Scenario::from_path(scenario_path).context("Failed to load scenario.")?;
    info!("Loaded scenario from {}", scenario_path.display());
    if !scenario.description.is_empty() {
        info!("{}", scenario.description.trim());
    }
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder was overwritten");
    }

    run_analysis(&scenario, output_path)?;
    info!("Analysis complete!");

    Ok(())
}

/// Run the baseline analysis and every sweep, writing the results to `output_path`
fn run_analysis(scenario: &Scenario, output_path: &Path) -> Result<()> {
    let params = &scenario.parameters;

    let analysis = BaselineAnalysis::run(params).context("Baseline analysis failed.")?;
    println!("{}", format_summary(params, &analysis)?);
    write_baseline_results(output_path, &analysis).context("Failed to write baseline results.")?;

    let results = SensitivityResults::run(params, &scenario.sensitivity)
        .context("Sensitivity analysis failed.")?;
    write_sensitivity_results(output_path, &results)
        .context("Failed to write sensitivity results.")?;

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    // Load/validate the scenario
    Scenario::from_path(scenario_path).context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}
