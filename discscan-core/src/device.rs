//! Device path resolution.
//!
//! The navigators read a mounted disc tree. When the configured path is a
//! device node (the default `/dev/sr0`, for instance) the mount table is
//! searched for it and the mount point is scanned instead.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Mount table consulted on Linux.
pub const MOUNT_TABLE: &str = "/proc/mounts";

/// Resolves `path` to a directory the navigators can read.
///
/// Directories are returned unchanged. For anything else the mount table is
/// consulted; if no mount point is found the original path is returned and
/// the navigator reports the open failure.
#[must_use]
pub fn resolve_device(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }

    match fs::read_to_string(MOUNT_TABLE) {
        Ok(table) => match find_mount_point(&table, path) {
            Some(mount_point) => {
                debug!("{} is mounted on {}", path.display(), mount_point.display());
                mount_point
            }
            None => {
                debug!("{} is not a mounted device", path.display());
                path.to_path_buf()
            }
        },
        Err(e) => {
            debug!("cannot read {MOUNT_TABLE}: {e}");
            path.to_path_buf()
        }
    }
}

/// Looks `device` up in a `/proc/mounts` formatted table.
///
/// Both the given path and its canonical form (device symlinks such as
/// `/dev/cdrom`) are compared against the first column.
#[must_use]
pub fn find_mount_point(table: &str, device: &Path) -> Option<PathBuf> {
    let canonical = fs::canonicalize(device).ok();

    table.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let source = PathBuf::from(unescape_mount_field(fields.next()?));
        let target = fields.next()?;
        let matches = source == device || canonical.as_deref() == Some(source.as_path());
        matches.then(|| PathBuf::from(unescape_mount_field(target)))
    })
}

/// Decodes the octal escapes (`\040` for space and friends) used in mount tables.
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_escape(&bytes[i + 1..i + 4]) {
            let value = (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
            decoded.push(value);
            i += 4;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3 && digits[0] <= b'3' && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}
