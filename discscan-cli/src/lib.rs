// discscan-cli/src/lib.rs
//
// Library portion of the discscan CLI application.
// Contains argument definitions, logging setup and the run entry point.

pub mod cli;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, usage_exit_code};

use clap::Parser;
use discscan_core::{EXIT_OK, EXIT_OTHER, run_scan};
use log::{debug, error};
use std::ffi::OsString;
use std::io::{self, Write};

/// Parses `args`, runs the report on stdout and returns the process exit code.
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = usage_exit_code(&err);
            // Help and version go to stdout, usage errors to stderr.
            let _ = err.print();
            return code;
        }
    };

    if cli.source {
        return match io::stdout().write_all(cli::SOURCE_PLACEHOLDER.as_bytes()) {
            Ok(()) => EXIT_OK,
            Err(_) => EXIT_OTHER,
        };
    }

    logging::init(cli.verbose);
    let config = cli.to_config();
    debug!("{config:?}");

    let mut stdout = io::stdout().lock();
    match run_scan(&config, &mut stdout) {
        Ok(summary) => {
            debug!(
                "{} titles, {} streams, longest {}",
                summary.titles, summary.streams, summary.longest
            );
            EXIT_OK
        }
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}
