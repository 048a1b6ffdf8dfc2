// ============================================================================
// discscan-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Scan Configuration Record
//
// `ScanConfig` is built by consumers of the library (like discscan-cli) and
// passed to `run_scan`. It carries the device to scan, the minimum title
// duration filter and the verbosity level.

use std::path::{Path, PathBuf};

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default minimum title duration in seconds. Zero disables the filter.
pub const DEFAULT_MINIMUM_SECS: u64 = 0;

/// Default verbosity level.
pub const DEFAULT_VERBOSITY: u8 = 0;

/// Device scanned when no path is given on macOS.
pub const DEFAULT_DEVICE_MACOS: &str = "/dev/rdisk1";

/// Device scanned when no path is given on every other platform.
pub const DEFAULT_DEVICE_OTHER: &str = "/dev/sr0";

/// Returns the platform default device path.
#[must_use]
pub fn default_device() -> &'static Path {
    if cfg!(target_os = "macos") {
        Path::new(DEFAULT_DEVICE_MACOS)
    } else {
        Path::new(DEFAULT_DEVICE_OTHER)
    }
}

// ============================================================================
// SCAN CONFIGURATION
// ============================================================================

/// Configuration for one disc report.
///
/// # Examples
///
/// ```rust
/// use discscan_core::ScanConfig;
///
/// let config = ScanConfig::new()
///     .with_device("/mnt/movie")
///     .with_minimum_secs(600)
///     .with_verbosity(1);
/// assert_eq!(config.effective_device().to_str(), Some("/mnt/movie"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Device or directory to scan. `None` selects the platform default.
    pub device: Option<PathBuf>,

    /// Titles shorter than this many whole seconds are left out of the report.
    pub minimum_secs: u64,

    /// Verbosity level, incremented once per `-v`.
    pub verbosity: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            device: None,
            minimum_secs: DEFAULT_MINIMUM_SECS,
            verbosity: DEFAULT_VERBOSITY,
        }
    }
}

impl ScanConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[must_use]
    pub fn with_minimum_secs(mut self, minimum_secs: u64) -> Self {
        self.minimum_secs = minimum_secs;
        self
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// The configured device, or the platform default when none was given.
    #[must_use]
    pub fn effective_device(&self) -> &Path {
        self.device.as_deref().unwrap_or_else(|| default_device())
    }

    /// Whether a title of `duration_secs` whole seconds passes the filter.
    #[must_use]
    pub fn keeps_title(&self, duration_secs: u64) -> bool {
        duration_secs >= self.minimum_secs
    }
}
