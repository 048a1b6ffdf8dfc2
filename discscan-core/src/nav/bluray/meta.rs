//! Blu-ray disc identity.
//!
//! The disc id is the SHA-1 digest of `AACS/Unit_Key_RO.inf`; the disc name
//! comes from the `name` element in the `urn:BDA:bdmv;discinfo` namespace of
//! the `BDMV/META/DL/bdmt_*.xml` disc library metadata, English first.

use log::debug;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};

const UNIT_KEY_FILE: [&str; 2] = ["AACS", "Unit_Key_RO.inf"];
const META_DIR: [&str; 3] = ["BDMV", "META", "DL"];
const PREFERRED_META: &str = "bdmt_eng.xml";
const DISCINFO_NS: &str = "urn:BDA:bdmv;discinfo";

/// Reads the disc id, if the disc carries AACS unit key data.
pub fn read_disc_id(root: &Path) -> Option<[u8; 20]> {
    let path = resolve_ci(root, &UNIT_KEY_FILE)?;
    match fs::read(&path) {
        Ok(data) => {
            let mut id = [0u8; 20];
            id.copy_from_slice(&Sha1::digest(&data));
            Some(id)
        }
        Err(e) => {
            debug!("cannot read {}: {e}", path.display());
            None
        }
    }
}

/// Reads the disc name from the disc library metadata, if present.
pub fn read_disc_name(root: &Path) -> Option<String> {
    let dir = resolve_ci(root, &META_DIR)?;
    let mut candidates: Vec<PathBuf> = fs::read_dir(&dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().to_ascii_lowercase())
                .is_some_and(|n| n.starts_with("bdmt_") && n.ends_with(".xml"))
        })
        .collect();
    candidates.sort_by_key(|path| {
        let is_preferred = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(PREFERRED_META));
        (!is_preferred, path.clone())
    });

    candidates.iter().find_map(|path| {
        let xml = fs::read_to_string(path).ok()?;
        extract_disc_name(&xml).or_else(|| {
            debug!("no disc name in {}", path.display());
            None
        })
    })
}

/// Text of the first discinfo `name` element of a bdmt document.
#[must_use]
pub fn extract_disc_name(xml: &str) -> Option<String> {
    let doc = match roxmltree::Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("malformed disc library metadata: {e}");
            return None;
        }
    };
    let name = doc
        .descendants()
        .find(|n| {
            n.is_element()
                && n.tag_name().namespace() == Some(DISCINFO_NS)
                && n.tag_name().name() == "name"
        })?
        .text()?
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Follows `components` below `root`, matching each name case-insensitively.
pub(crate) fn resolve_ci(root: &Path, components: &[&str]) -> Option<PathBuf> {
    let mut current = root.to_path_buf();
    for name in components {
        let exact = current.join(name);
        current = if exact.exists() {
            exact
        } else {
            fs::read_dir(&current)
                .ok()?
                .filter_map(Result::ok)
                .find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(name))?
                .path()
        };
    }
    Some(current)
}
