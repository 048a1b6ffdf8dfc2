// ============================================================================
// discscan-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger Initialisation
//
// Log records go to stderr as `level: message`, keeping stdout for the
// report itself. The level follows the `-v` count:
// - 0: warn (errors and warnings only)
// - 1: info (progress notes such as the disc being searched)
// - 2: debug
// - 3 and more: trace
//
// RUST_LOG, when set, overrides the level derived from `-v`.

use log::LevelFilter;
use std::io::Write;

/// Log level for a verbosity count.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize the logger for discscan.
///
/// Calling it again (as tests driving `run` do) keeps the first logger.
pub fn init(verbosity: u8) {
    let level = level_for_verbosity(verbosity);
    let result = env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {}",
                record.level().as_str().to_ascii_lowercase(),
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .try_init();

    if result.is_ok() {
        log::debug!("logger initialized with level {level}");
    }
}
