//! Provides the main entry point to the program.
use h2fleet::cli::run_cli;
use h2fleet::log::is_logger_initialised;
use human_panic::setup_panic;
use log::error;

fn main() {
    setup_panic!();

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
