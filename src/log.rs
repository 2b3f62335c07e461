//! Program logging.
//!
//! Console messages are split between stdout (info and below) and stderr (warnings and errors).
//! The `run` commands also keep a pair of log files in the output directory, so that a results
//! folder records how it was produced. Engine modules log at `debug`, so the files always hold at
//! least the `info` progress messages regardless of the console level.
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, Output};
use log::{Level, LevelFilter, Metadata};
use std::env;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::OnceLock;

/// Set once the global logger has been installed
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used when neither the environment nor the settings file gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level in the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "H2FLEET_LOG_LEVEL";

/// The file name for the log file containing messages about the ordinary operation of h2fleet
pub const LOG_INFO_FILE_NAME: &str = "h2fleet_info.log";

/// The file name for the log file containing warnings and error messages
pub const LOG_ERROR_FILE_NAME: &str = "h2fleet_error.log";

/// Module paths in log targets are shown relative to the crate
const TARGET_PREFIX: &str = "h2fleet::";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// A destination for log messages
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sink {
    Stdout,
    Stderr,
    InfoFile,
    ErrorFile,
}

impl Sink {
    /// Whether messages of this severity are written to the sink
    fn accepts(self, metadata: &Metadata) -> bool {
        let is_problem = metadata.level() <= Level::Warn;
        match self {
            Self::Stdout | Self::InfoFile => !is_problem,
            Self::Stderr | Self::ErrorFile => is_problem,
        }
    }

    /// The most verbose level written to the sink when the user has asked for `requested`
    fn level(self, requested: LevelFilter) -> LevelFilter {
        match self {
            Self::Stdout | Self::Stderr => requested,
            Self::InfoFile => requested.max(LevelFilter::Info),
            Self::ErrorFile => LevelFilter::Warn,
        }
    }

    /// Log files are kept alongside results, so their timestamps carry the date
    fn timestamp_format(self) -> &'static str {
        match self {
            Self::Stdout | Self::Stderr => "%H:%M:%S",
            Self::InfoFile | Self::ErrorFile => "%Y-%m-%d %H:%M:%S",
        }
    }

    /// Level colours, for console sinks attached to a terminal
    fn colours(self) -> Option<ColoredLevelConfig> {
        let is_terminal = match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
            Self::InfoFile | Self::ErrorFile => false,
        };

        is_terminal.then(|| {
            ColoredLevelConfig::new()
                .error(Color::Red)
                .warn(Color::Yellow)
                .info(Color::Green)
                .debug(Color::Blue)
                .trace(Color::Magenta)
        })
    }

    /// Build the dispatcher which formats and writes this sink's messages to `output`
    fn dispatch(self, requested: LevelFilter, output: impl Into<Output>) -> Dispatch {
        let colours = self.colours();
        Dispatch::new()
            .filter(move |metadata| self.accepts(metadata))
            .level(self.level(requested))
            .format(move |out, message, record| {
                let timestamp = Local::now().format(self.timestamp_format());
                let target = short_target(record.target());
                match colours {
                    Some(colours) => out.finish(format_args!(
                        "[{timestamp} {} {target}] {message}",
                        colours.color(record.level())
                    )),
                    None => out.finish(format_args!(
                        "[{timestamp} {} {target}] {message}",
                        record.level()
                    )),
                }
            })
            .chain(output)
    }
}

/// Strip the crate name from a log target (`h2fleet::finance` becomes `finance`)
fn short_target(target: &str) -> &str {
    target.strip_prefix(TARGET_PREFIX).unwrap_or(target)
}

/// Convert a log level name (case insensitive) to a [`LevelFilter`]
pub(crate) fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    Ok(match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    })
}

/// Pick the log level: the environment variable wins over the settings file, which wins over
/// [`DEFAULT_LOG_LEVEL`]
fn choose_log_level(from_env: Option<&str>, from_settings: Option<&str>) -> Result<LevelFilter> {
    parse_log_level(from_env.or(from_settings).unwrap_or(DEFAULT_LOG_LEVEL))
}

/// Create (or truncate) a log file in `dir`
fn create_log_file(dir: &Path, file_name: &str) -> Result<File> {
    let file_path = dir.join(file_name);
    File::create(&file_path)
        .with_context(|| format!("Could not create log file {}", file_path.display()))
}

/// Install the global logger.
///
/// # Arguments
///
/// * `log_level_from_settings` - The level given in `settings.toml`, if any. The
///   `H2FLEET_LOG_LEVEL` environment variable takes precedence over it.
/// * `log_dir` - Directory in which to write log files. Without one, only the console is used.
pub fn init(log_level_from_settings: Option<&str>, log_dir: Option<&Path>) -> Result<()> {
    let from_env = env::var(LOG_LEVEL_ENV_VAR).ok();
    let level = choose_log_level(from_env.as_deref(), log_level_from_settings)?;

    let mut dispatch = Dispatch::new()
        .chain(Sink::Stdout.dispatch(level, io::stdout()))
        .chain(Sink::Stderr.dispatch(level, io::stderr()));
    if let Some(log_dir) = log_dir {
        dispatch = dispatch
            .chain(Sink::InfoFile.dispatch(level, create_log_file(log_dir, LOG_INFO_FILE_NAME)?))
            .chain(Sink::ErrorFile.dispatch(level, create_log_file(log_dir, LOG_ERROR_FILE_NAME)?));
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow!("Logger already initialised"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::MetadataBuilder;
    use rstest::rstest;

    fn metadata(level: Level) -> Metadata<'static> {
        MetadataBuilder::new().level(level).target("h2fleet").build()
    }

    #[rstest]
    #[case("off", LevelFilter::Off)]
    #[case("error", LevelFilter::Error)]
    #[case("WARN", LevelFilter::Warn)]
    #[case("Info", LevelFilter::Info)]
    #[case("debug", LevelFilter::Debug)]
    #[case("trace", LevelFilter::Trace)]
    fn test_parse_log_level(#[case] level: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(level).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_unknown() {
        assert_eq!(
            parse_log_level("verbose").unwrap_err().to_string(),
            "Unknown log level: verbose"
        );
    }

    #[rstest]
    #[case(Some("debug"), Some("warn"), LevelFilter::Debug)]
    #[case(None, Some("warn"), LevelFilter::Warn)]
    #[case(None, None, LevelFilter::Info)]
    fn test_choose_log_level(
        #[case] from_env: Option<&str>,
        #[case] from_settings: Option<&str>,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(choose_log_level(from_env, from_settings).unwrap(), expected);
    }

    #[test]
    fn test_choose_log_level_invalid_env() {
        // A bad environment variable isn't papered over by a good setting
        assert!(choose_log_level(Some("loud"), Some("info")).is_err());
    }

    #[rstest]
    #[case(Level::Error, false, true)]
    #[case(Level::Warn, false, true)]
    #[case(Level::Info, true, false)]
    #[case(Level::Debug, true, false)]
    #[case(Level::Trace, true, false)]
    fn test_sink_accepts(#[case] level: Level, #[case] info: bool, #[case] problem: bool) {
        let metadata = metadata(level);
        assert_eq!(Sink::Stdout.accepts(&metadata), info);
        assert_eq!(Sink::InfoFile.accepts(&metadata), info);
        assert_eq!(Sink::Stderr.accepts(&metadata), problem);
        assert_eq!(Sink::ErrorFile.accepts(&metadata), problem);
    }

    #[rstest]
    #[case(LevelFilter::Off, LevelFilter::Off, LevelFilter::Info)]
    #[case(LevelFilter::Warn, LevelFilter::Warn, LevelFilter::Info)]
    #[case(LevelFilter::Debug, LevelFilter::Debug, LevelFilter::Debug)]
    fn test_sink_level(
        #[case] requested: LevelFilter,
        #[case] console: LevelFilter,
        #[case] info_file: LevelFilter,
    ) {
        assert_eq!(Sink::Stdout.level(requested), console);
        assert_eq!(Sink::Stderr.level(requested), console);
        assert_eq!(Sink::InfoFile.level(requested), info_file);
        assert_eq!(Sink::ErrorFile.level(requested), LevelFilter::Warn);
    }

    #[test]
    fn test_file_sinks_are_never_coloured() {
        assert!(Sink::InfoFile.colours().is_none());
        assert!(Sink::ErrorFile.colours().is_none());
    }

    #[rstest]
    #[case("h2fleet::finance", "finance")]
    #[case("h2fleet::economics::appraisal", "economics::appraisal")]
    #[case("h2fleet", "h2fleet")]
    fn test_short_target(#[case] target: &str, #[case] expected: &str) {
        assert_eq!(short_target(target), expected);
    }

    #[test]
    fn test_create_log_file() {
        let dir = tempfile::tempdir().unwrap();
        create_log_file(dir.path(), LOG_INFO_FILE_NAME).unwrap();
        assert!(dir.path().join(LOG_INFO_FILE_NAME).is_file());

        let missing = dir.path().join("missing");
        assert!(create_log_file(&missing, LOG_ERROR_FILE_NAME).is_err());
    }
}
