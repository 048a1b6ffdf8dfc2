//! Core library for listing the titles, chapters and streams of a DVD or
//! Blu-ray disc.
//!
//! This crate provides disc layout detection, native navigators over a
//! mounted `VIDEO_TS` or `BDMV` tree, and the line-oriented report built from
//! them.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use discscan_core::{ScanConfig, run_scan};
//!
//! let config = ScanConfig::new()
//!     .with_device("/media/cdrom")
//!     .with_minimum_secs(600);
//!
//! let mut stdout = std::io::stdout().lock();
//! let summary = run_scan(&config, &mut stdout).unwrap();
//! eprintln!("longest title: {}", summary.longest);
//! ```

pub mod config;
pub mod detection;
pub mod device;
pub mod error;
pub mod nav;
pub mod report;
pub mod utils;

// Re-exports for public API
pub use config::{ScanConfig, default_device};
pub use detection::{DiscKind, detect_disc_kind};
pub use device::resolve_device;
pub use error::{EXIT_OK, EXIT_OPEN, EXIT_OTHER, ScanError, ScanResult};
pub use nav::{BlurayDisc, BlurayNavigator, DvdDisc, DvdNavigator, TitleChapters};
pub use report::{ScanSummary, run_scan};
pub use utils::{Millis, Ticks, path_tail};
