//! Disc layout detection.
//!
//! A path holding `BDMV/index.bdmv` is treated as a Blu-ray disc, anything
//! else as a DVD. This is a presence check only; a misclassified path simply
//! fails to open in the selected navigator.

use log::debug;
use std::fmt;
use std::path::Path;

/// Marker file, relative to the disc root, that identifies a Blu-ray layout.
pub const BDMV_MARKER: &str = "BDMV/index.bdmv";

/// The two disc layouts the reporters understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscKind {
    Dvd,
    Bluray,
}

impl fmt::Display for DiscKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscKind::Dvd => write!(f, "dvd"),
            DiscKind::Bluray => write!(f, "bluray"),
        }
    }
}

/// Selects the reporter for `path` by probing for the Blu-ray marker file.
#[must_use]
pub fn detect_disc_kind(path: &Path) -> DiscKind {
    let marker = path.join(BDMV_MARKER);
    let kind = if marker.exists() {
        DiscKind::Bluray
    } else {
        DiscKind::Dvd
    };
    debug!("{} -> {} layout", marker.display(), kind);
    kind
}
