// ============================================================================
// discscan-core/src/nav/mod.rs
// ============================================================================
//
// DISC NAVIGATION: Navigator Traits and Native Implementations
//
// The reporters talk to a disc only through the `DvdNavigator` and
// `BlurayNavigator` traits. `DvdDisc` and `BlurayDisc` implement them by
// reading the navigation metadata of a mounted disc tree.
//
// KEY COMPONENTS:
// - dvd: VIDEO_TS IFO parsing, chapter timing, logical stream lookups
// - bluray: BDMV playlist enumeration, disc identity, clip stream tables

pub mod bluray;
pub mod dvd;

pub use bluray::{BlurayDisc, BlurayNavigator, BlurayTitleInfo, ClipInfo, DebugMask, DiscInfo, StreamInfo};
pub use dvd::{DvdDisc, DvdNavigator};

use crate::utils::Ticks;

/// Logical stream slots probed per kind on a DVD.
pub const STREAM_SLOTS: u8 = 32;

/// Returned by logical stream lookups for an inactive slot.
pub const STREAM_ABSENT: u8 = 0xff;

/// Returned by language lookups when the stream has no language.
pub const LANG_UNKNOWN: u16 = 0xffff;

/// Chapter start offsets and total duration of one title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleChapters {
    pub chapters: Vec<Ticks>,
    pub duration: Ticks,
}

/// Kind of a reported stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Subtitle,
    Audio,
}

/// Renders a two-byte DVD language code (`0x656e` -> `en`).
#[must_use]
pub fn lang_from_u16(code: u16) -> String {
    let [hi, lo] = code.to_be_bytes();
    [hi, lo].iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_language_codes() {
        assert_eq!(lang_from_u16(u16::from_be_bytes(*b"en")), "en");
        assert_eq!(lang_from_u16(u16::from_be_bytes(*b"fr")), "fr");
    }
}
