// ============================================================================
// discscan-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for Disc Scanning
//
// Every fallible operation in the core returns `ScanResult<T>`. The variants
// distinguish the open failure (its own process exit code) from every other
// navigation failure.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit status for a completed report.
pub const EXIT_OK: i32 = 0;
/// Process exit status when the disc could not be opened.
pub const EXIT_OPEN: i32 = 1;
/// Process exit status for any other disc processing failure.
pub const EXIT_OTHER: i32 = 2;

/// Custom error types for discscan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error opening {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("invalid IFO data: {0}")]
    Ifo(String),

    #[error("playlist error: {0}")]
    Playlist(String),

    #[error("navigation error: {0}")]
    Navigation(String),
}

impl ScanError {
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScanError::Open {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Maps the error onto the exit status the CLI reports.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::Open { .. } => EXIT_OPEN,
            _ => EXIT_OTHER,
        }
    }
}

/// Result type for discscan operations
pub type ScanResult<T> = std::result::Result<T, ScanError>;
