// discscan-cli/src/main.rs
//
// Entry point of the `discscan` binary. Everything but the process exit
// lives in the library half of the crate (see lib.rs) so the integration
// tests can drive it.

use std::process;

fn main() {
    process::exit(discscan_cli::run(std::env::args_os()));
}
