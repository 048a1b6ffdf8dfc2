//! DVD navigation.
//!
//! `DvdNavigator` is the set of calls the DVD reporter makes: open-time
//! settings, disc identity, title/chapter enumeration and the logical stream
//! lookups of the title being played. `DvdDisc` answers them from the IFO
//! files of a `VIDEO_TS` directory.

pub mod ifo;

use crate::error::{ScanError, ScanResult};
use crate::nav::{LANG_UNKNOWN, STREAM_ABSENT, TitleChapters};
use crate::utils::Ticks;
use ifo::{Pgc, TitleEntry, VmgIfo, VtsIfo};
use log::{debug, trace};
use std::fs;
use std::path::{Path, PathBuf};

const VIDEO_TS_DIR: &str = "VIDEO_TS";
const VMG_IFO: &str = "VIDEO_TS.IFO";
const VMG_BUP: &str = "VIDEO_TS.BUP";

/// Operations the DVD reporter performs on an open disc.
pub trait DvdNavigator {
    /// Enables or disables read-ahead caching.
    fn set_readahead(&mut self, enabled: bool) -> ScanResult<()>;

    /// Disc title string, when the disc carries one.
    fn title_string(&self) -> Option<String>;

    /// Disc serial string, when the disc carries one.
    fn serial_string(&self) -> Option<String>;

    fn number_of_titles(&self) -> ScanResult<u32>;

    /// Chapter start offsets and total duration of `title` (1-based).
    fn describe_title_chapters(&self, title: u32) -> ScanResult<TitleChapters>;

    /// Positions playback at the start of `title`, making its streams current.
    fn play_title(&mut self, title: u32) -> ScanResult<()>;

    /// Sub-picture stream for logical slot `slot`, or [`STREAM_ABSENT`].
    fn spu_logical_stream(&self, slot: u8) -> u8;

    /// Language of sub-picture stream `stream`, or [`LANG_UNKNOWN`].
    fn spu_stream_to_lang(&self, stream: u8) -> u16;

    /// Whether the audio lookups below are available.
    fn supports_audio(&self) -> bool {
        true
    }

    /// Audio stream for logical slot `slot`, or [`STREAM_ABSENT`].
    fn audio_logical_stream(&self, slot: u8) -> u8;

    /// Language of audio stream `stream`, or [`LANG_UNKNOWN`].
    fn audio_stream_to_lang(&self, stream: u8) -> u16;

    fn stop(&mut self) -> ScanResult<()>;

    /// Releases the disc.
    fn close(self) -> ScanResult<()>
    where
        Self: Sized;
}

// ============================================================================
// NATIVE IFO NAVIGATOR
// ============================================================================

/// Title currently positioned for playback.
#[derive(Debug)]
struct Playing {
    title: u32,
    vts: VtsIfo,
    pgc: usize,
}

/// A DVD opened from its `VIDEO_TS` directory.
#[derive(Debug)]
pub struct DvdDisc {
    video_ts: PathBuf,
    vmg: VmgIfo,
    readahead: bool,
    playing: Option<Playing>,
}

impl DvdDisc {
    /// Opens the disc rooted at `path`, which may be the disc root or the
    /// `VIDEO_TS` directory itself.
    pub fn open(path: &Path) -> ScanResult<Self> {
        let video_ts = locate_video_ts(path)
            .ok_or_else(|| ScanError::open(path, "no VIDEO_TS directory found"))?;
        let vmg = read_ifo(&video_ts, VMG_IFO, VMG_BUP, ifo::parse_vmg)
            .map_err(|e| ScanError::open(path, e.to_string()))?;
        debug!(
            "opened {} with {} titles",
            video_ts.display(),
            vmg.titles.len()
        );

        Ok(Self {
            video_ts,
            vmg,
            readahead: true,
            playing: None,
        })
    }

    fn title_entry(&self, title: u32) -> ScanResult<&TitleEntry> {
        (title as usize)
            .checked_sub(1)
            .and_then(|i| self.vmg.titles.get(i))
            .ok_or_else(|| ScanError::Navigation(format!("no title {title} on disc")))
    }

    fn load_vts(&self, title_set: u8) -> ScanResult<VtsIfo> {
        let ifo_name = format!("VTS_{title_set:02}_0.IFO");
        let bup_name = format!("VTS_{title_set:02}_0.BUP");
        trace!("loading {ifo_name} (readahead {})", self.readahead);
        read_ifo(&self.video_ts, &ifo_name, &bup_name, ifo::parse_vts)
    }

    fn playing_pgc(&self) -> Option<(&VtsIfo, &Pgc)> {
        let playing = self.playing.as_ref()?;
        Some((&playing.vts, playing.vts.pgcs.get(playing.pgc)?))
    }
}

impl DvdNavigator for DvdDisc {
    fn set_readahead(&mut self, enabled: bool) -> ScanResult<()> {
        self.readahead = enabled;
        Ok(())
    }

    fn title_string(&self) -> Option<String> {
        (!self.vmg.provider_id.is_empty()).then(|| self.vmg.provider_id.clone())
    }

    fn serial_string(&self) -> Option<String> {
        self.vmg
            .pos_code
            .iter()
            .any(|&b| b != 0)
            .then(|| hex::encode(self.vmg.pos_code))
    }

    fn number_of_titles(&self) -> ScanResult<u32> {
        u32::try_from(self.vmg.titles.len())
            .map_err(|_| ScanError::Navigation("title count out of range".to_string()))
    }

    fn describe_title_chapters(&self, title: u32) -> ScanResult<TitleChapters> {
        let entry = *self.title_entry(title)?;
        let vts = self.load_vts(entry.title_set)?;
        chapter_starts(&vts, &entry)
    }

    fn play_title(&mut self, title: u32) -> ScanResult<()> {
        let entry = *self.title_entry(title)?;
        let vts = self.load_vts(entry.title_set)?;
        let first_part = (entry.vts_title as usize)
            .checked_sub(1)
            .and_then(|i| vts.titles.get(i))
            .and_then(|parts| parts.first())
            .ok_or_else(|| ScanError::Navigation(format!("title {title} has no parts")))?;
        let pgc = (first_part.pgcn as usize)
            .checked_sub(1)
            .filter(|&i| i < vts.pgcs.len())
            .ok_or_else(|| {
                ScanError::Navigation(format!(
                    "title {title} refers to missing program chain {}",
                    first_part.pgcn
                ))
            })?;
        debug!("playing title {title} (title set {}, pgc {})", entry.title_set, pgc + 1);
        self.playing = Some(Playing { title, vts, pgc });
        Ok(())
    }

    fn spu_logical_stream(&self, slot: u8) -> u8 {
        self.playing_pgc()
            .and_then(|(vts, pgc)| pgc.subp_stream(slot as usize, vts.aspect))
            .unwrap_or(STREAM_ABSENT)
    }

    fn spu_stream_to_lang(&self, stream: u8) -> u16 {
        match self.playing_pgc() {
            Some((vts, _)) => attr_lang(vts.subp_attrs.get(stream as usize)),
            None => LANG_UNKNOWN,
        }
    }

    fn audio_logical_stream(&self, slot: u8) -> u8 {
        self.playing_pgc()
            .and_then(|(_, pgc)| pgc.audio_stream(slot as usize))
            .unwrap_or(STREAM_ABSENT)
    }

    fn audio_stream_to_lang(&self, stream: u8) -> u16 {
        match self.playing_pgc() {
            Some((vts, _)) => attr_lang(vts.audio_attrs.get(stream as usize)),
            None => LANG_UNKNOWN,
        }
    }

    fn stop(&mut self) -> ScanResult<()> {
        if let Some(playing) = self.playing.take() {
            debug!("stopped title {}", playing.title);
        }
        Ok(())
    }

    fn close(self) -> ScanResult<()> {
        debug!("closed {}", self.video_ts.display());
        Ok(())
    }
}

fn attr_lang(attr: Option<&ifo::StreamAttr>) -> u16 {
    match attr {
        Some(attr) if attr.lang_type == 1 => attr.lang_code,
        _ => LANG_UNKNOWN,
    }
}

/// Computes chapter start offsets of a title from its part-of-title table.
///
/// Each chapter starts where the cells of the previous chapters end. Only
/// the first cell of an angle block contributes playing time.
pub fn chapter_starts(vts: &VtsIfo, entry: &TitleEntry) -> ScanResult<TitleChapters> {
    let parts = (entry.vts_title as usize)
        .checked_sub(1)
        .and_then(|i| vts.titles.get(i))
        .ok_or_else(|| {
            ScanError::Navigation(format!("title set has no title {}", entry.vts_title))
        })?;

    let mut length = 0u64;
    let mut chapters = Vec::with_capacity(parts.len());
    for (i, part) in parts.iter().take(entry.parts as usize).enumerate() {
        let pgc = (part.pgcn as usize)
            .checked_sub(1)
            .and_then(|p| vts.pgcs.get(p))
            .ok_or_else(|| {
                ScanError::Navigation(format!(
                    "chapter {} refers to missing program chain {}",
                    i + 1,
                    part.pgcn
                ))
            })?;
        let program = (part.pgn as usize)
            .checked_sub(1)
            .filter(|&p| p < pgc.program_map.len())
            .ok_or_else(|| {
                ScanError::Navigation(format!(
                    "chapter {} refers to missing program {}",
                    i + 1,
                    part.pgn
                ))
            })?;

        let first_cell = pgc.program_map[program] as usize;
        let end_cell = pgc
            .program_map
            .get(program + 1)
            .map(|&cell| cell as usize)
            .unwrap_or(pgc.cells.len() + 1)
            .max(first_cell + 1);

        chapters.push(Ticks(length));
        for cell_nr in first_cell..end_cell {
            let cell = cell_nr
                .checked_sub(1)
                .and_then(|c| pgc.cells.get(c))
                .ok_or_else(|| {
                    ScanError::Navigation(format!("chapter {} refers to missing cell {cell_nr}", i + 1))
                })?;
            if !cell.is_alternate_angle() {
                length += cell.playback_time.to_ticks().0;
            }
        }
    }

    if chapters.is_empty() {
        return Err(ScanError::Navigation("title has no chapters".to_string()));
    }

    Ok(TitleChapters {
        chapters,
        duration: Ticks(length),
    })
}

/// Finds the `VIDEO_TS` directory for a disc root or the directory itself.
fn locate_video_ts(path: &Path) -> Option<PathBuf> {
    if !path.is_dir() {
        return None;
    }
    if let Some(dir) = find_entry(path, VIDEO_TS_DIR).filter(|p| p.is_dir()) {
        return Some(dir);
    }
    find_entry(path, VMG_IFO).map(|_| path.to_path_buf())
}

/// Case-insensitive lookup of `name` inside `dir`.
fn find_entry(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.exists() {
        return Some(exact);
    }
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(name))
        .map(|entry| entry.path())
}

/// Reads and parses an IFO file, falling back to its `.BUP` backup copy.
fn read_ifo<T>(
    dir: &Path,
    ifo_name: &str,
    bup_name: &str,
    parse: fn(&[u8]) -> ScanResult<T>,
) -> ScanResult<T> {
    let primary = find_entry(dir, ifo_name)
        .ok_or_else(|| ScanError::Ifo(format!("{ifo_name} not found in {}", dir.display())))
        .and_then(|path| Ok(fs::read(path)?))
        .and_then(|data| parse(&data));

    match primary {
        Ok(parsed) => Ok(parsed),
        Err(primary_err) => {
            let Some(backup) = find_entry(dir, bup_name) else {
                return Err(primary_err);
            };
            debug!("{ifo_name} unusable ({primary_err}), trying {bup_name}");
            parse(&fs::read(backup)?)
        }
    }
}
