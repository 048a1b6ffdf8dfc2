// ============================================================================
// discscan-core/src/nav/bluray/mod.rs
// ============================================================================
//
// BLU-RAY NAVIGATION: BDMV Playlist Titles
//
// Titles on a Blu-ray are the movie playlists under BDMV/PLAYLIST. Each
// playlist is parsed with the `mpls` crate; its play items become the
// title's clips, its entry-point marks the chapters, and each play item's
// stream number table supplies the subtitle (PG) and audio streams.
//
// KEY COMPONENTS:
// - BlurayNavigator: the calls the Blu-ray reporter makes
// - BlurayDisc: native implementation over a mounted BDMV tree
// - DebugMask: verbosity mask read from BD_DEBUG_MASK

pub mod meta;

use crate::error::{ScanError, ScanResult};
use crate::utils::Ticks;
use log::{debug, warn};
use mpls::{MarkType, Mpls, Ref, StreamEntryRef, StreamRef, StreamType};
use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Environment variable holding the navigator debug mask.
pub const BD_DEBUG_MASK_ENV: &str = "BD_DEBUG_MASK";

/// Environment variable holding the AACS layer debug mask.
pub const AACS_DEBUG_MASK_ENV: &str = "AACS_DEBUG_MASK";

/// Playlists referencing one clip more often than this are menu loops, not titles.
const MAX_CLIP_REPEATS: usize = 2;

// ============================================================================
// DEBUG MASK
// ============================================================================

/// Debug output mask, in the bit layout of the `BD_DEBUG_MASK` variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMask(pub u32);

impl DebugMask {
    pub const FILE: u32 = 0x0004;
    pub const BLURAY: u32 = 0x0040;
    pub const DIR: u32 = 0x0080;
    pub const NAV: u32 = 0x0100;
    pub const CRIT: u32 = 0x0800;

    pub const SILENT: DebugMask = DebugMask(0);
    pub const LOW: DebugMask = DebugMask(Self::CRIT | Self::BLURAY);
    pub const HIGH: DebugMask = DebugMask(0xfffff);

    /// 0 is silent, 1 low, 2 and above high.
    #[must_use]
    pub fn for_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => Self::SILENT,
            1 => Self::LOW,
            _ => Self::HIGH,
        }
    }

    /// Parses `0x`-prefixed hex or decimal.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse(),
        };
        parsed.ok().map(DebugMask)
    }

    /// Mask from `BD_DEBUG_MASK`, silent when unset or malformed.
    #[must_use]
    pub fn from_env() -> Self {
        env::var(BD_DEBUG_MASK_ENV)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(self, flag: u32) -> bool {
        self.0 & flag != 0
    }

    #[must_use]
    pub fn to_env_value(self) -> String {
        format!("{:#x}", self.0)
    }
}

// ============================================================================
// NAVIGATOR INTERFACE
// ============================================================================

/// Disc identity record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscInfo {
    pub disc_id: Option<[u8; 20]>,
    pub disc_name: Option<String>,
}

/// One subtitle or audio stream of a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub coding_type: u8,
    pub pid: u16,
    /// ISO 639-2 code, empty when the stream carries none.
    pub lang: String,
}

/// Streams of one clip (play item) of a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipInfo {
    pub clip_id: String,
    pub pg_streams: Vec<StreamInfo>,
    pub audio_streams: Vec<StreamInfo>,
}

/// Everything reported about one Blu-ray title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlurayTitleInfo {
    pub index: u32,
    pub playlist: u32,
    pub duration: Ticks,
    /// Entry-point mark times on the stream clock.
    pub chapters: Vec<Ticks>,
    pub clips: Vec<ClipInfo>,
}

/// Operations the Blu-ray reporter performs on an open disc.
pub trait BlurayNavigator {
    fn disc_info(&self) -> ScanResult<DiscInfo>;

    /// Builds the relevant title list and returns its length.
    fn title_count(&mut self) -> ScanResult<u32>;

    /// Title `index` (0-based) of the list built by [`title_count`](Self::title_count).
    fn title_info(&self, index: u32) -> ScanResult<BlurayTitleInfo>;

    fn close(self) -> ScanResult<()>
    where
        Self: Sized;
}

// ============================================================================
// NATIVE BDMV NAVIGATOR
// ============================================================================

#[derive(Debug)]
struct Playlist {
    number: u32,
    mpls: Mpls,
}

/// A Blu-ray opened from its disc root (the directory holding `BDMV`).
#[derive(Debug)]
pub struct BlurayDisc {
    root: PathBuf,
    playlist_dir: PathBuf,
    mask: DebugMask,
    titles: Vec<Playlist>,
}

impl BlurayDisc {
    /// Opens the disc with the debug mask taken from the environment.
    pub fn open(path: &Path) -> ScanResult<Self> {
        Self::open_with_mask(path, DebugMask::from_env())
    }

    pub fn open_with_mask(path: &Path, mask: DebugMask) -> ScanResult<Self> {
        let playlist_dir = meta::resolve_ci(path, &["BDMV", "PLAYLIST"])
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| ScanError::open(path, "no BDMV/PLAYLIST directory found"))?;
        if mask.contains(DebugMask::BLURAY) {
            debug!("opened {} (debug mask {})", path.display(), mask.to_env_value());
        }

        Ok(Self {
            root: path.to_path_buf(),
            playlist_dir,
            mask,
            titles: Vec::new(),
        })
    }

    fn load_playlists(&self) -> ScanResult<Vec<Playlist>> {
        let mut numbered: Vec<(u32, PathBuf)> = fs::read_dir(&self.playlist_dir)?
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
                let number = name.strip_suffix(".mpls")?;
                (number.len() == 5).then_some(())?;
                Some((number.parse().ok()?, entry.path()))
            })
            .collect();
        numbered.sort();

        let mut playlists = Vec::with_capacity(numbered.len());
        for (number, path) in numbered {
            let parsed = File::open(&path)
                .map_err(ScanError::from)
                .and_then(|file| {
                    Mpls::from(file).map_err(|e| ScanError::Playlist(format!("{}: {e}", path.display())))
                });
            match parsed {
                Ok(mpls) => playlists.push(Playlist { number, mpls }),
                Err(e) if self.mask.contains(DebugMask::CRIT) => warn!("skipping playlist: {e}"),
                Err(e) => debug!("skipping playlist: {e}"),
            }
        }
        Ok(playlists)
    }

    fn nav_debug(&self, message: impl FnOnce() -> String) {
        if self.mask.contains(DebugMask::NAV) {
            debug!("{}", message());
        }
    }
}

impl BlurayNavigator for BlurayDisc {
    fn disc_info(&self) -> ScanResult<DiscInfo> {
        Ok(DiscInfo {
            disc_id: meta::read_disc_id(&self.root),
            disc_name: meta::read_disc_name(&self.root),
        })
    }

    fn title_count(&mut self) -> ScanResult<u32> {
        let playlists = self.load_playlists()?;
        let mut relevant: Vec<Playlist> = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            match filter_reason(&relevant, &playlist.mpls) {
                Some(reason) => {
                    self.nav_debug(|| format!("dropping {:05}.mpls: {reason}", playlist.number))
                }
                None => relevant.push(playlist),
            }
        }
        self.titles = relevant;
        u32::try_from(self.titles.len())
            .map_err(|_| ScanError::Navigation("title count out of range".to_string()))
    }

    fn title_info(&self, index: u32) -> ScanResult<BlurayTitleInfo> {
        let playlist = self
            .titles
            .get(index as usize)
            .ok_or_else(|| ScanError::Navigation(format!("no title with index {index}")))?;
        Ok(title_info_from(index, playlist.number, &playlist.mpls))
    }

    fn close(self) -> ScanResult<()> {
        self.nav_debug(|| format!("closed {}", self.root.display()));
        Ok(())
    }
}

/// Builds the title record of one playlist.
#[must_use]
pub fn title_info_from(index: u32, playlist: u32, mpls: &Mpls) -> BlurayTitleInfo {
    let play_items = &mpls.play_list.play_items;
    let duration = play_items
        .iter()
        .map(|item| u64::from(item.out_time.0.saturating_sub(item.in_time.0)) * 2)
        .sum();
    let chapters = mpls
        .marks
        .iter()
        .filter(|mark| matches!(mark.mark_type, MarkType::EntryPoint))
        .map(|mark| Ticks(u64::from(mark.time_stamp.0) * 2))
        .collect();
    let clips = play_items
        .iter()
        .map(|item| {
            let table = &item.stream_number_table;
            ClipInfo {
                clip_id: item.clip.file_name.clone(),
                pg_streams: table.primary_pgs_streams.iter().map(stream_info).collect(),
                audio_streams: table.primary_audio_streams.iter().map(stream_info).collect(),
            }
        })
        .collect();

    BlurayTitleInfo {
        index,
        playlist,
        duration: Ticks(duration),
        chapters,
        clips,
    }
}

fn stream_info(stream: &mpls::Stream) -> StreamInfo {
    let lang = match &stream.attrs.stream_type {
        StreamType::Audio(_, _, lang) | StreamType::Graphics(lang) | StreamType::Text(lang, _) => {
            lang.trim_matches(char::from(0)).to_string()
        }
        _ => String::new(),
    };
    let pid = match stream.entry.refs {
        StreamEntryRef::PlayItem(Ref::Stream(StreamRef(pid)))
        | StreamEntryRef::SubPathKind1(_, _, Ref::Stream(StreamRef(pid)))
        | StreamEntryRef::SubPathKind2(_, Ref::Stream(StreamRef(pid))) => pid,
        _ => 0,
    };
    StreamInfo {
        coding_type: stream.attrs.coding_type,
        pid,
        lang,
    }
}

/// Why a playlist is left out of the relevant title list, if it is.
fn filter_reason(kept: &[Playlist], candidate: &Mpls) -> Option<&'static str> {
    let items = &candidate.play_list.play_items;
    if items.is_empty() {
        return Some("no play items");
    }

    let mut uses: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *uses.entry(item.clip.file_name.as_str()).or_default() += 1;
    }
    if uses.values().any(|&n| n > MAX_CLIP_REPEATS) {
        return Some("repeated clip");
    }

    let signature = title_signature(candidate);
    if kept.iter().any(|p| title_signature(&p.mpls) == signature) {
        return Some("duplicate title");
    }
    None
}

/// Clip sequence with in/out times plus the chapter count.
fn title_signature(mpls: &Mpls) -> (Vec<(&str, u32, u32)>, usize) {
    let clips = mpls
        .play_list
        .play_items
        .iter()
        .map(|item| (item.clip.file_name.as_str(), item.in_time.0, item.out_time.0))
        .collect();
    (clips, mpls.marks.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_masks() {
        assert_eq!(DebugMask::for_verbosity(0), DebugMask::SILENT);
        assert_eq!(DebugMask::for_verbosity(1), DebugMask::LOW);
        assert_eq!(DebugMask::for_verbosity(2), DebugMask::HIGH);
        assert_eq!(DebugMask::for_verbosity(9), DebugMask::HIGH);
    }

    #[test]
    fn mask_round_trips_through_env_format() {
        assert_eq!(DebugMask::LOW.to_env_value(), "0x840");
        assert_eq!(DebugMask::parse("0x840"), Some(DebugMask::LOW));
        assert_eq!(DebugMask::parse("2112"), Some(DebugMask::LOW));
        assert_eq!(DebugMask::parse("bogus"), None);
    }

    #[test]
    fn low_mask_has_critical_but_not_nav() {
        assert!(DebugMask::LOW.contains(DebugMask::CRIT));
        assert!(!DebugMask::LOW.contains(DebugMask::NAV));
        assert!(DebugMask::HIGH.contains(DebugMask::NAV));
    }

    #[test]
    fn open_without_playlists_fails_with_open_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("BDMV")).unwrap();
        let err = BlurayDisc::open_with_mask(dir.path(), DebugMask::SILENT).unwrap_err();
        assert!(matches!(err, ScanError::Open { .. }));
    }
}
