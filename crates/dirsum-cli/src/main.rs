use dirsum_core::logging;

mod cli;

use crate::cli::{CliCommand, Outcome};

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // state directory is not writable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args() {
        Ok(Outcome::Clean) => {}
        Ok(Outcome::Failures) => std::process::exit(2),
        Err(err) => {
            tracing::error!("command failed: {:#}", err);
            eprintln!("dirsum error: {:#}", err);
            std::process::exit(1);
        }
    }
}
