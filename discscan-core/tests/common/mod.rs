// Fixture builders shared by the integration tests: synthetic VIDEO_TS and
// BDMV trees written into a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;

const SECTOR: usize = 2048;

/// 45 kHz clock ticks per second, as used by MPLS time stamps.
pub const MPLS_TICKS_PER_SECOND: u32 = 45_000;

// ============================================================================
// DVD
// ============================================================================

/// Video attribute word of a PAL 16:9 MPEG-2 title set.
pub const VIDEO_ATTR_WIDE: u16 = 0x4C01;

/// One DVD title: one program (chapter) per entry, each a single cell.
#[derive(Debug, Clone, Default)]
pub struct DvdTitle {
    pub chapter_secs: Vec<u32>,
    /// `vts_video_attr`; zero is MPEG-1 NTSC 4:3.
    pub video_attr: u16,
    pub subtitles: Vec<Option<&'static str>>,
    pub audio: Vec<Option<&'static str>>,
}

impl DvdTitle {
    pub fn new(chapter_secs: &[u32]) -> Self {
        Self {
            chapter_secs: chapter_secs.to_vec(),
            ..Self::default()
        }
    }

    /// Adds a sub-picture stream; `None` leaves its language unspecified.
    pub fn subtitle(mut self, lang: Option<&'static str>) -> Self {
        self.subtitles.push(lang);
        self
    }

    pub fn audio(mut self, lang: Option<&'static str>) -> Self {
        self.audio.push(lang);
        self
    }

    pub fn widescreen(mut self) -> Self {
        self.video_attr = VIDEO_ATTR_WIDE;
        self
    }
}

/// Writes `VIDEO_TS/VIDEO_TS.IFO` plus one title set per title under `root`.
pub fn write_dvd(root: &Path, provider_id: &str, titles: &[DvdTitle]) -> io::Result<()> {
    let video_ts = root.join("VIDEO_TS");
    fs::create_dir_all(&video_ts)?;
    fs::write(video_ts.join("VIDEO_TS.IFO"), vmg_ifo(provider_id, titles))?;
    for (i, title) in titles.iter().enumerate() {
        fs::write(video_ts.join(format!("VTS_{:02}_0.IFO", i + 1)), vts_ifo(title))?;
    }
    Ok(())
}

fn put_u16(data: &mut [u8], at: usize, value: u16) {
    data[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

fn put_u32(data: &mut [u8], at: usize, value: u32) {
    data[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn bcd(value: u32) -> u8 {
    (((value / 10) << 4) | (value % 10)) as u8
}

/// BCD playback time at 25 fps, zero frames.
fn dvd_time(secs: u32) -> [u8; 4] {
    [bcd(secs / 3600), bcd((secs / 60) % 60), bcd(secs % 60), 0x40]
}

fn vmg_ifo(provider_id: &str, titles: &[DvdTitle]) -> Vec<u8> {
    let mut data = vec![0u8; 2 * SECTOR];
    data[..12].copy_from_slice(b"DVDVIDEO-VMG");
    let provider = provider_id.as_bytes();
    data[0x40..0x40 + provider.len()].copy_from_slice(provider);
    put_u32(&mut data, 0xC4, 1);

    let table = SECTOR;
    put_u16(&mut data, table, titles.len() as u16);
    put_u32(&mut data, table + 4, (8 + 12 * titles.len() - 1) as u32);
    for (i, title) in titles.iter().enumerate() {
        let entry = table + 8 + i * 12;
        data[entry + 1] = 1;
        put_u16(&mut data, entry + 2, title.chapter_secs.len() as u16);
        data[entry + 6] = (i + 1) as u8;
        data[entry + 7] = 1;
    }
    data
}

fn vts_ifo(title: &DvdTitle) -> Vec<u8> {
    let chapters = title.chapter_secs.len();
    let mut data = vec![0u8; 3 * SECTOR + 0x130 + 24 * chapters + 16];
    data[..12].copy_from_slice(b"DVDVIDEO-VTS");
    put_u32(&mut data, 0xC8, 1);
    put_u32(&mut data, 0xCC, 2);

    put_u16(&mut data, 0x200, title.video_attr);
    data[0x203] = title.audio.len() as u8;
    for (i, lang) in title.audio.iter().enumerate() {
        let at = 0x204 + i * 8;
        if let Some(lang) = lang {
            data[at] = 1 << 2;
            data[at + 2..at + 4].copy_from_slice(lang.as_bytes());
        }
    }
    data[0x255] = title.subtitles.len() as u8;
    for (i, lang) in title.subtitles.iter().enumerate() {
        let at = 0x256 + i * 6;
        if let Some(lang) = lang {
            data[at] = 1;
            data[at + 2..at + 4].copy_from_slice(lang.as_bytes());
        }
    }

    // Part-of-title table: one VTS title, chapter k is program k of PGC 1.
    let ptt = SECTOR;
    put_u16(&mut data, ptt, 1);
    put_u32(&mut data, ptt + 4, (12 + 4 * chapters - 1) as u32);
    put_u32(&mut data, ptt + 8, 12);
    for k in 0..chapters {
        put_u16(&mut data, ptt + 12 + 4 * k, 1);
        put_u16(&mut data, ptt + 14 + 4 * k, (k + 1) as u16);
    }

    // Program chain table with a single PGC.
    let pgcit = 2 * SECTOR;
    put_u16(&mut data, pgcit, 1);
    put_u32(&mut data, pgcit + 12, 16);
    let pgc = pgcit + 16;
    data[pgc + 2] = chapters as u8;
    data[pgc + 3] = chapters as u8;
    let total: u32 = title.chapter_secs.iter().sum();
    data[pgc + 4..pgc + 8].copy_from_slice(&dvd_time(total));
    for i in 0..title.audio.len().min(8) {
        put_u16(&mut data, pgc + 0x0C + 2 * i, 0x8000 | ((i as u16) << 8));
    }
    // Wide titles only fill the wide field, so reading the 4:3 field
    // yields stream 0 for every slot.
    for i in 0..title.subtitles.len().min(32) {
        let field = if title.video_attr == VIDEO_ATTR_WIDE { 16 } else { 24 };
        put_u32(&mut data, pgc + 0x1C + 4 * i, 0x8000_0000 | ((i as u32) << field));
    }
    put_u16(&mut data, pgc + 0xE6, 0xF0);
    put_u16(&mut data, pgc + 0xE8, 0x130);
    for (k, &secs) in title.chapter_secs.iter().enumerate() {
        data[pgc + 0xF0 + k] = (k + 1) as u8;
        let cell = pgc + 0x130 + 24 * k;
        data[cell + 4..cell + 8].copy_from_slice(&dvd_time(secs));
    }
    data
}

// ============================================================================
// BLU-RAY
// ============================================================================

/// One play item of a playlist. Times are on the 45 kHz clock.
#[derive(Debug, Clone)]
pub struct BdClip {
    pub name: &'static str,
    pub in_time: u32,
    pub out_time: u32,
    pub pg_langs: Vec<&'static str>,
    pub audio_langs: Vec<&'static str>,
}

impl BdClip {
    /// A clip playing `secs` seconds from a ten-minute stream offset.
    pub fn new(name: &'static str, secs: u32) -> Self {
        let start = 600 * MPLS_TICKS_PER_SECOND;
        Self {
            name,
            in_time: start,
            out_time: start + secs * MPLS_TICKS_PER_SECOND,
            pg_langs: Vec::new(),
            audio_langs: Vec::new(),
        }
    }

    /// Adds a PG stream; `"\0\0\0"` leaves its language unspecified.
    pub fn subtitle(mut self, lang: &'static str) -> Self {
        self.pg_langs.push(lang);
        self
    }

    pub fn audio(mut self, lang: &'static str) -> Self {
        self.audio_langs.push(lang);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct BdPlaylist {
    pub clips: Vec<BdClip>,
    /// Entry-point marks as (play item, 45 kHz time stamp).
    pub marks: Vec<(u16, u32)>,
}

impl BdPlaylist {
    /// A playlist of the given clips with one entry mark at the start of each.
    pub fn new(clips: Vec<BdClip>) -> Self {
        let marks = clips
            .iter()
            .enumerate()
            .map(|(i, clip)| (i as u16, clip.in_time))
            .collect();
        Self { clips, marks }
    }

    pub fn mark(mut self, play_item: u16, secs_into_clip: u32) -> Self {
        let start = self.clips[play_item as usize].in_time;
        self.marks
            .push((play_item, start + secs_into_clip * MPLS_TICKS_PER_SECOND));
        self
    }
}

/// Disc-level files of a Blu-ray fixture.
#[derive(Debug, Clone, Default)]
pub struct BdDisc {
    pub name: Option<&'static str>,
    pub unit_key: Option<&'static [u8]>,
    /// Playlists as (file number, contents).
    pub playlists: Vec<(u32, BdPlaylist)>,
}

/// Writes a BDMV tree for `disc` under `root`.
pub fn write_bluray(root: &Path, disc: &BdDisc) -> io::Result<()> {
    let bdmv = root.join("BDMV");
    let playlist_dir = bdmv.join("PLAYLIST");
    fs::create_dir_all(&playlist_dir)?;
    fs::write(bdmv.join("index.bdmv"), b"INDX0200")?;

    for (number, playlist) in &disc.playlists {
        fs::write(playlist_dir.join(format!("{number:05}.mpls")), mpls_bytes(playlist))?;
    }
    if let Some(name) = disc.name {
        let meta = bdmv.join("META").join("DL");
        fs::create_dir_all(&meta)?;
        fs::write(
            meta.join("bdmt_eng.xml"),
            format!(
                "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                 <disclib xmlns=\"urn:BDA:bdmv;disclib\" xmlns:di=\"urn:BDA:bdmv;discinfo\">\
                 <di:discinfo><di:title><di:name>{name}</di:name></di:title></di:discinfo>\
                 </disclib>\n"
            ),
        )?;
    }
    if let Some(key) = disc.unit_key {
        let aacs = root.join("AACS");
        fs::create_dir_all(&aacs)?;
        fs::write(aacs.join("Unit_Key_RO.inf"), key)?;
    }
    Ok(())
}

fn with_u16_len(body: Vec<u8>) -> Vec<u8> {
    let mut out = (body.len() as u16).to_be_bytes().to_vec();
    out.extend(body);
    out
}

fn with_u32_len(body: Vec<u8>) -> Vec<u8> {
    let mut out = (body.len() as u32).to_be_bytes().to_vec();
    out.extend(body);
    out
}

fn stream(pid: u16, attrs: &[u8]) -> Vec<u8> {
    let mut out = vec![3, 0x01];
    out.extend(pid.to_be_bytes());
    out.push(attrs.len() as u8);
    out.extend(attrs);
    out
}

fn play_item(clip: &BdClip) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(clip.name.as_bytes());
    body.extend(b"M2TS");
    body.extend([0, 0]); // flags, single angle
    body.push(0); // stc id
    body.extend(clip.in_time.to_be_bytes());
    body.extend(clip.out_time.to_be_bytes());
    body.extend([0u8; 8]); // user operation mask
    body.push(0); // random access flag
    body.extend([0u8; 3]); // still mode

    let mut stn = vec![0, 0];
    stn.extend([
        1,
        clip.audio_langs.len() as u8,
        clip.pg_langs.len() as u8,
        0,
        0,
        0,
        0,
        0,
    ]);
    stn.extend([0u8; 4]);
    stn.extend(stream(0x1011, &[0x1B, 0x61]));
    for (i, lang) in clip.audio_langs.iter().enumerate() {
        let mut attrs = vec![0x81, 0x31];
        attrs.extend(lang.as_bytes());
        stn.extend(stream(0x1100 + i as u16, &attrs));
    }
    for (i, lang) in clip.pg_langs.iter().enumerate() {
        let mut attrs = vec![0x90];
        attrs.extend(lang.as_bytes());
        stn.extend(stream(0x1200 + i as u16, &attrs));
    }
    body.extend(with_u16_len(stn));
    with_u16_len(body)
}

/// Serialises a playlist in the MPLS layout.
pub fn mpls_bytes(playlist: &BdPlaylist) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(b"MPLS0200");
    out.extend([0u8; 8]); // playlist and mark addresses
    out.extend([0u8; 4]); // no extension data
    out.extend([0u8; 20]);

    // AppInfoPlayList: reserved, playback type, count, UO mask, flags
    let mut app_info = vec![0, 1, 0, 0];
    app_info.extend([0u8; 8]);
    app_info.extend([0, 0]);
    out.extend(with_u32_len(app_info));

    let mut list = vec![0, 0];
    list.extend((playlist.clips.len() as u16).to_be_bytes());
    list.extend(0u16.to_be_bytes());
    for clip in &playlist.clips {
        list.extend(play_item(clip));
    }
    out.extend(with_u32_len(list));

    let mut marks = (playlist.marks.len() as u16).to_be_bytes().to_vec();
    for &(item, ts) in &playlist.marks {
        marks.extend([0, 1]);
        marks.extend(item.to_be_bytes());
        marks.extend(ts.to_be_bytes());
        marks.extend([0xff, 0xff]);
        marks.extend(0u32.to_be_bytes());
    }
    out.extend(with_u32_len(marks));
    out
}
