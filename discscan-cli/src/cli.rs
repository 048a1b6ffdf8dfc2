// discscan-cli/src/cli.rs
//
// Defines the command-line argument structure using clap, and maps clap's
// usage errors onto the exit codes the tool reports.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser};
use discscan_core::ScanConfig;
use discscan_core::config::DEFAULT_MINIMUM_SECS;
use std::path::PathBuf;

/// Exit code for an unknown short option.
pub const EXIT_UNKNOWN_SHORT: i32 = 1;
/// Exit code for an unknown long option.
pub const EXIT_UNKNOWN_LONG: i32 = 2;
/// Exit code for every other argument error.
pub const EXIT_BAD_ARGUMENT: i32 = 3;

/// Printed by `--source`.
pub const SOURCE_PLACEHOLDER: &str =
    "\n/* #@@# FILE #@@# discscan/* */\ndiscscan source not included in this build.\n";

// Build details come from build.rs.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DISCSCAN_BUILD_PROFILE"),
    " build, ",
    env!("DISCSCAN_BUILD_TARGET"),
    ")\nbuilt ",
    env!("DISCSCAN_BUILD_DATE"),
    "\nsource ",
    env!("CARGO_MANIFEST_DIR"),
    "\nnative VIDEO_TS/BDMV navigators"
);

const OUTPUT_HELP: &str = "\
Output:
  This program scans a dvd or bluray and writes one line per item:
    ID      <disc id>
    NAME    <disc name>
    TITLE <n> DURATION <secs.ms> <hh:mm:ss.ms> CHAPTERS <secs.ms> <hh:mm:ss.ms> ...
    SUB <n> <id> <lang>
    AUDIO <n> <id> <lang>
    LONGEST <n>";

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "discscan",
    version,
    long_version = LONG_VERSION,
    about = "discscan: list titles, chapters and streams of a DVD or Blu-ray",
    after_help = OUTPUT_HELP
)]
pub struct Cli {
    /// Device or disc directory to scan
    #[arg(
        value_name = "DEVICE",
        long_help = "Device or disc directory to scan. Defaults to /dev/sr0 (/dev/rdisk1 on macOS)."
    )]
    pub device: Option<PathBuf>,

    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Minimum title duration in seconds; shorter titles are not listed
    #[arg(short, long, value_name = "SECONDS", default_value_t = DEFAULT_MINIMUM_SECS)]
    pub minimum: u64,

    /// Show source
    #[arg(short, long)]
    pub source: bool,
}

impl Cli {
    /// Builds the scan configuration from the parsed arguments.
    pub fn to_config(&self) -> ScanConfig {
        let config = ScanConfig::new()
            .with_minimum_secs(self.minimum)
            .with_verbosity(self.verbose);
        match &self.device {
            Some(device) => config.with_device(device),
            None => config,
        }
    }
}

/// Exit code for a failed `try_parse`: 0 for help and version output, 1 for
/// an unknown short option, 2 for an unknown long option, 3 otherwise.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        ErrorKind::UnknownArgument => match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(arg)) if arg.starts_with("--") => EXIT_UNKNOWN_LONG,
            Some(ContextValue::String(arg)) if arg.starts_with('-') => EXIT_UNKNOWN_SHORT,
            _ => EXIT_BAD_ARGUMENT,
        },
        _ => EXIT_BAD_ARGUMENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("discscan").chain(args.iter().copied()))
    }

    fn exit_code(args: &[&str]) -> i32 {
        usage_exit_code(&parse(args).unwrap_err())
    }

    #[test]
    fn no_arguments_uses_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.device, None);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.minimum, 0);
        assert!(!cli.source);
        assert_eq!(cli.to_config(), ScanConfig::default());
    }

    #[test]
    fn bundled_short_options() {
        let cli = parse(&["-vvm", "600", "/mnt/disc"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.minimum, 600);
        assert_eq!(cli.device, Some(PathBuf::from("/mnt/disc")));

        let cli = parse(&["-vm5"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.minimum, 5);
    }

    #[test]
    fn long_options() {
        let cli = parse(&["--verbose", "--minimum", "90", "--", "-odd-name"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.minimum, 90);
        assert_eq!(cli.device, Some(PathBuf::from("-odd-name")));
    }

    #[test]
    fn config_carries_every_option() {
        let config = parse(&["-v", "-m", "42", "/dev/sr1"]).unwrap().to_config();
        assert_eq!(
            config,
            ScanConfig::new()
                .with_device("/dev/sr1")
                .with_minimum_secs(42)
                .with_verbosity(1)
        );
    }

    #[test]
    fn unknown_options_map_to_their_codes() {
        assert_eq!(exit_code(&["-x"]), EXIT_UNKNOWN_SHORT);
        assert_eq!(exit_code(&["--bogus"]), EXIT_UNKNOWN_LONG);
    }

    #[test]
    fn malformed_arguments_exit_with_three() {
        assert_eq!(exit_code(&["-m", "ten"]), EXIT_BAD_ARGUMENT);
        assert_eq!(exit_code(&["-m"]), EXIT_BAD_ARGUMENT);
        assert_eq!(exit_code(&["/dev/sr0", "/dev/sr1"]), EXIT_BAD_ARGUMENT);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        assert_eq!(exit_code(&["-h"]), 0);
        assert_eq!(exit_code(&["--version"]), 0);
    }

    #[test]
    fn long_version_carries_build_details() {
        assert!(LONG_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(LONG_VERSION.contains(concat!("built ", env!("DISCSCAN_BUILD_DATE"))));
        assert!(LONG_VERSION.contains(env!("DISCSCAN_BUILD_TARGET")));
        assert!(LONG_VERSION.contains(concat!("source ", env!("CARGO_MANIFEST_DIR"))));
    }
}
