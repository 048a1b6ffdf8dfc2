// ============================================================================
// discscan-core/src/report/mod.rs
// ============================================================================
//
// REPORTING: Disc Report Entry Point
//
// `run_scan` resolves the configured device to a readable disc tree, picks
// the reporter for its layout and writes the report lines to the given
// writer. Log records go through the `log` facade, never to `out`.
//
// KEY COMPONENTS:
// - dvd: report over a `DvdNavigator`
// - bluray: report over a `BlurayNavigator`
// - format: the fixed report line shapes

pub mod bluray;
pub mod dvd;
pub mod format;

use crate::config::ScanConfig;
use crate::detection::{DiscKind, detect_disc_kind};
use crate::device::resolve_device;
use crate::error::ScanResult;
use log::debug;
use std::io::Write;

pub use bluray::{report_bluray, scan_bluray};
pub use dvd::{report_dvd, scan_dvd};

/// What a finished report contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of TITLE lines written.
    pub titles: usize,
    /// Number of SUB and AUDIO lines written.
    pub streams: usize,
    /// Ordinal of the longest listed title, 0 when none was listed.
    pub longest: u32,
}

/// Scans the configured disc and writes its report to `out`.
pub fn run_scan<W: Write>(config: &ScanConfig, out: &mut W) -> ScanResult<ScanSummary> {
    let device = config.effective_device();
    let path = resolve_device(device);
    let kind = detect_disc_kind(&path);
    debug!("scanning {} as {kind}", path.display());

    let summary = match kind {
        DiscKind::Dvd => report_dvd(&path, config, out)?,
        DiscKind::Bluray => report_bluray(&path, config, out)?,
    };
    out.flush()?;
    Ok(summary)
}
