//! DVD-Video information file (IFO) parsing.
//!
//! Only the tables needed for title, chapter and stream reporting are read:
//!
//! - VMGI: title search pointer table (TT_SRPT), provider id, POS code
//! - VTSI: part-of-title table (VTS_PTT_SRPT), program chain table
//!   (VTS_PGCIT), video attributes, audio and sub-picture stream attributes
//!
//! All multi-byte fields are big-endian. Table pointers in the header are
//! sector numbers relative to the start of the file.

use crate::error::{ScanError, ScanResult};
use crate::utils::Ticks;

/// Size of one DVD sector in bytes.
pub const SECTOR_SIZE: usize = 2048;

pub const VMG_MAGIC: &[u8; 12] = b"DVDVIDEO-VMG";
pub const VTS_MAGIC: &[u8; 12] = b"DVDVIDEO-VTS";

const VMG_PROVIDER_ID: usize = 0x40;
const VMG_POS_CODE: usize = 0x60;
const VMG_TT_SRPT: usize = 0xC4;

const VTS_PTT_SRPT: usize = 0xC8;
const VTS_PGCIT: usize = 0xCC;
const VTS_VIDEO_ATTR: usize = 0x200;
const VTS_AUDIO_COUNT: usize = 0x203;
const VTS_AUDIO_ATTRS: usize = 0x204;
const VTS_SUBP_COUNT: usize = 0x255;
const VTS_SUBP_ATTRS: usize = 0x256;

const MAX_AUDIO_STREAMS: usize = 8;
const MAX_SUBP_STREAMS: usize = 32;

const CELL_PLAYBACK_SIZE: usize = 24;

pub const BLOCK_TYPE_ANGLE_BLOCK: u8 = 1;
pub const BLOCK_MODE_FIRST_CELL: u8 = 1;

// ============================================================================
// TYPES
// ============================================================================

/// Video manager information (`VIDEO_TS.IFO`).
#[derive(Debug, Clone)]
pub struct VmgIfo {
    pub provider_id: String,
    pub pos_code: [u8; 8],
    pub titles: Vec<TitleEntry>,
}

/// One entry of the title search pointer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleEntry {
    pub angles: u8,
    pub parts: u16,
    pub title_set: u8,
    pub vts_title: u8,
}

/// Display aspect ratio of a title set's video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayAspect {
    #[default]
    Standard,
    Wide,
}

impl DisplayAspect {
    /// Decodes bits 2-3 of the first video attribute byte (`11` = 16:9).
    #[must_use]
    pub fn from_video_attr(attr: u16) -> Self {
        if (attr >> 10) & 0x03 == 3 {
            Self::Wide
        } else {
            Self::Standard
        }
    }
}

/// Video title set information (`VTS_nn_0.IFO`).
#[derive(Debug, Clone, Default)]
pub struct VtsIfo {
    /// Parts of each VTS title, indexed by `vts_title - 1`.
    pub titles: Vec<Vec<PartOfTitle>>,
    pub aspect: DisplayAspect,
    pub pgcs: Vec<Pgc>,
    pub audio_attrs: Vec<StreamAttr>,
    pub subp_attrs: Vec<StreamAttr>,
}

/// A chapter entry: program `pgn` of program chain `pgcn` (both 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartOfTitle {
    pub pgcn: u16,
    pub pgn: u16,
}

/// Program chain.
#[derive(Debug, Clone)]
pub struct Pgc {
    pub playback_time: DvdTime,
    pub audio_control: [u16; 8],
    pub subp_control: [u32; 32],
    /// Entry cell number (1-based) of each program.
    pub program_map: Vec<u8>,
    pub cells: Vec<Cell>,
}

impl Pgc {
    /// Sub-picture stream number of `slot` for video shown at `aspect`, or
    /// `None` when the slot is disabled. Wide video uses the wide field.
    #[must_use]
    pub fn subp_stream(&self, slot: usize, aspect: DisplayAspect) -> Option<u8> {
        let control = *self.subp_control.get(slot)?;
        if control & 0x8000_0000 == 0 {
            return None;
        }
        let shift = match aspect {
            DisplayAspect::Standard => 24,
            DisplayAspect::Wide => 16,
        };
        Some(((control >> shift) & 0x1f) as u8)
    }

    /// Audio stream number of `slot`, or `None` when the slot is disabled.
    #[must_use]
    pub fn audio_stream(&self, slot: usize) -> Option<u8> {
        let control = *self.audio_control.get(slot)?;
        (control & 0x8000 != 0).then_some(((control >> 8) & 0x07) as u8)
    }
}

/// Cell playback information, reduced to what chapter timing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub block_mode: u8,
    pub block_type: u8,
    pub playback_time: DvdTime,
}

impl Cell {
    /// Cells of an angle block other than its first do not add playing time.
    #[must_use]
    pub fn is_alternate_angle(&self) -> bool {
        self.block_type == BLOCK_TYPE_ANGLE_BLOCK && self.block_mode != BLOCK_MODE_FIRST_CELL
    }
}

/// Language attributes of an audio or sub-picture stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamAttr {
    /// 1 when `lang_code` holds an ISO 639 code.
    pub lang_type: u8,
    pub lang_code: u16,
}

/// BCD encoded playback time. The top two bits of `frame_u` carry the
/// frame rate (`11` = 30 fps, `01` = 25 fps).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DvdTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub frame_u: u8,
}

impl DvdTime {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            hour: bytes[0],
            minute: bytes[1],
            second: bytes[2],
            frame_u: bytes[3],
        }
    }

    /// Converts to 90 kHz ticks.
    #[must_use]
    pub fn to_ticks(self) -> Ticks {
        let bcd = |v: u8| u64::from(v >> 4) * 10 + u64::from(v & 0x0f);
        let mut ticks = bcd(self.hour) * 3600 * 90_000;
        ticks += bcd(self.minute) * 60 * 90_000;
        ticks += bcd(self.second) * 90_000;
        let frames = u64::from((self.frame_u & 0x30) >> 4) * 10 + u64::from(self.frame_u & 0x0f);
        ticks += if self.frame_u & 0x80 != 0 {
            frames * 3000
        } else {
            frames * 3600
        };
        Ticks(ticks)
    }
}

// ============================================================================
// BYTE ACCESS
// ============================================================================

/// Bounds-checked big-endian reads over an IFO buffer.
struct IfoBytes<'a> {
    data: &'a [u8],
    name: &'static str,
}

impl<'a> IfoBytes<'a> {
    fn slice(&self, offset: usize, len: usize) -> ScanResult<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| {
                ScanError::Ifo(format!(
                    "{}: {len} bytes at {offset:#x} exceed file size {:#x}",
                    self.name,
                    self.data.len()
                ))
            })
    }

    fn u8(&self, offset: usize) -> ScanResult<u8> {
        Ok(self.slice(offset, 1)?[0])
    }

    fn u16(&self, offset: usize) -> ScanResult<u16> {
        let b = self.slice(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&self, offset: usize) -> ScanResult<u32> {
        let b = self.slice(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn time(&self, offset: usize) -> ScanResult<DvdTime> {
        let b = self.slice(offset, 4)?;
        Ok(DvdTime::from_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn sector_pointer(&self, offset: usize) -> ScanResult<usize> {
        let sector = self.u32(offset)? as usize;
        if sector == 0 {
            return Err(ScanError::Ifo(format!(
                "{}: missing table pointer at {offset:#x}",
                self.name
            )));
        }
        Ok(sector * SECTOR_SIZE)
    }

    fn expect_magic(&self, magic: &[u8; 12]) -> ScanResult<()> {
        if self.slice(0, magic.len())? != magic {
            return Err(ScanError::Ifo(format!(
                "{}: missing {} identifier",
                self.name,
                String::from_utf8_lossy(magic)
            )));
        }
        Ok(())
    }
}

// ============================================================================
// VMGI
// ============================================================================

/// Parses `VIDEO_TS.IFO`.
pub fn parse_vmg(data: &[u8]) -> ScanResult<VmgIfo> {
    let ifo = IfoBytes {
        data,
        name: "VIDEO_TS.IFO",
    };
    ifo.expect_magic(VMG_MAGIC)?;

    let provider_id = String::from_utf8_lossy(ifo.slice(VMG_PROVIDER_ID, 32)?)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();
    let mut pos_code = [0u8; 8];
    pos_code.copy_from_slice(ifo.slice(VMG_POS_CODE, 8)?);

    let table = ifo.sector_pointer(VMG_TT_SRPT)?;
    let count = ifo.u16(table)? as usize;
    let mut titles = Vec::with_capacity(count);
    for i in 0..count {
        let entry = table + 8 + i * 12;
        titles.push(TitleEntry {
            angles: ifo.u8(entry + 1)?,
            parts: ifo.u16(entry + 2)?,
            title_set: ifo.u8(entry + 6)?,
            vts_title: ifo.u8(entry + 7)?,
        });
    }

    Ok(VmgIfo {
        provider_id,
        pos_code,
        titles,
    })
}

// ============================================================================
// VTSI
// ============================================================================

/// Parses `VTS_nn_0.IFO`.
pub fn parse_vts(data: &[u8]) -> ScanResult<VtsIfo> {
    let ifo = IfoBytes {
        data,
        name: "VTS IFO",
    };
    ifo.expect_magic(VTS_MAGIC)?;

    let titles = parse_ptt_table(&ifo, ifo.sector_pointer(VTS_PTT_SRPT)?)?;
    let pgcs = parse_pgc_table(&ifo, ifo.sector_pointer(VTS_PGCIT)?)?;

    let aspect = DisplayAspect::from_video_attr(ifo.u16(VTS_VIDEO_ATTR)?);

    let audio_count = (ifo.u8(VTS_AUDIO_COUNT)? as usize).min(MAX_AUDIO_STREAMS);
    let audio_attrs = (0..audio_count)
        .map(|i| -> ScanResult<StreamAttr> {
            let at = VTS_AUDIO_ATTRS + i * 8;
            Ok(StreamAttr {
                lang_type: (ifo.u8(at)? >> 2) & 0x03,
                lang_code: ifo.u16(at + 2)?,
            })
        })
        .collect::<ScanResult<Vec<_>>>()?;

    let subp_count = (ifo.u8(VTS_SUBP_COUNT)? as usize).min(MAX_SUBP_STREAMS);
    let subp_attrs = (0..subp_count)
        .map(|i| -> ScanResult<StreamAttr> {
            let at = VTS_SUBP_ATTRS + i * 6;
            Ok(StreamAttr {
                lang_type: ifo.u8(at)? & 0x03,
                lang_code: ifo.u16(at + 2)?,
            })
        })
        .collect::<ScanResult<Vec<_>>>()?;

    Ok(VtsIfo {
        titles,
        aspect,
        pgcs,
        audio_attrs,
        subp_attrs,
    })
}

fn parse_ptt_table(ifo: &IfoBytes<'_>, table: usize) -> ScanResult<Vec<Vec<PartOfTitle>>> {
    let count = ifo.u16(table)? as usize;
    let last_byte = ifo.u32(table + 4)? as usize;
    let offsets = (0..count)
        .map(|i| -> ScanResult<usize> { Ok(ifo.u32(table + 8 + i * 4)? as usize) })
        .collect::<ScanResult<Vec<_>>>()?;

    let mut titles = Vec::with_capacity(count);
    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(last_byte + 1);
        if end < start {
            return Err(ScanError::Ifo(format!(
                "VTS_PTT_SRPT: title {} ends before it starts",
                i + 1
            )));
        }
        let parts = (0..(end - start) / 4)
            .map(|p| -> ScanResult<PartOfTitle> {
                let at = table + start + p * 4;
                Ok(PartOfTitle {
                    pgcn: ifo.u16(at)?,
                    pgn: ifo.u16(at + 2)?,
                })
            })
            .collect::<ScanResult<Vec<_>>>()?;
        titles.push(parts);
    }
    Ok(titles)
}

fn parse_pgc_table(ifo: &IfoBytes<'_>, table: usize) -> ScanResult<Vec<Pgc>> {
    let count = ifo.u16(table)? as usize;
    (0..count)
        .map(|i| -> ScanResult<Pgc> {
            let offset = ifo.u32(table + 8 + i * 8 + 4)? as usize;
            parse_pgc(ifo, table + offset)
        })
        .collect()
}

fn parse_pgc(ifo: &IfoBytes<'_>, pgc: usize) -> ScanResult<Pgc> {
    let program_count = ifo.u8(pgc + 0x02)? as usize;
    let cell_count = ifo.u8(pgc + 0x03)? as usize;
    let playback_time = ifo.time(pgc + 0x04)?;

    let mut audio_control = [0u16; 8];
    for (i, control) in audio_control.iter_mut().enumerate() {
        *control = ifo.u16(pgc + 0x0C + i * 2)?;
    }
    let mut subp_control = [0u32; 32];
    for (i, control) in subp_control.iter_mut().enumerate() {
        *control = ifo.u32(pgc + 0x1C + i * 4)?;
    }

    let program_map = match ifo.u16(pgc + 0xE6)? as usize {
        0 => Vec::new(),
        offset => ifo.slice(pgc + offset, program_count)?.to_vec(),
    };

    let cells = match ifo.u16(pgc + 0xE8)? as usize {
        0 => Vec::new(),
        offset => (0..cell_count)
            .map(|i| -> ScanResult<Cell> {
                let at = pgc + offset + i * CELL_PLAYBACK_SIZE;
                let flags = ifo.u8(at)?;
                Ok(Cell {
                    block_mode: flags >> 6,
                    block_type: (flags >> 4) & 0x03,
                    playback_time: ifo.time(at + 4)?,
                })
            })
            .collect::<ScanResult<Vec<_>>>()?,
    };

    Ok(Pgc {
        playback_time,
        audio_control,
        subp_control,
        program_map,
        cells,
    })
}
