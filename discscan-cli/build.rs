// discscan-cli/build.rs
//
// Stamps the binary with the build date, profile and target shown by
// `--version`. SOURCE_DATE_EPOCH pins the date for reproducible builds.

use chrono::{DateTime, Utc};
use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let built = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);

    println!(
        "cargo:rustc-env=DISCSCAN_BUILD_DATE={}",
        built.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "cargo:rustc-env=DISCSCAN_BUILD_PROFILE={}",
        env::var("PROFILE").unwrap_or_default()
    );
    println!(
        "cargo:rustc-env=DISCSCAN_BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
}
