// ============================================================================
// discscan-core/src/report/dvd.rs
// ============================================================================
//
// DVD REPORT: Titles, Chapters and Streams of a DVD
//
// Lists every title passing the minimum duration filter, then the subtitle
// and audio streams of the longest one. Only the open failure and the
// title-table lookups end the report early; per-title failures are logged
// and the title is skipped.

use super::{ScanSummary, format};
use crate::config::ScanConfig;
use crate::error::ScanResult;
use crate::nav::{
    DvdDisc, DvdNavigator, LANG_UNKNOWN, STREAM_ABSENT, STREAM_SLOTS, StreamKind, lang_from_u16,
};
use crate::utils::{Millis, path_tail};
use log::{debug, error, info, trace};
use std::io::Write;
use std::path::Path;

/// Opens the DVD at `path` and writes its report to `out`.
pub fn report_dvd<W: Write>(
    path: &Path,
    config: &ScanConfig,
    out: &mut W,
) -> ScanResult<ScanSummary> {
    info!("searching titles on dvd {}...", path.display());
    let disc = DvdDisc::open(path)?;
    scan_dvd(disc, path, config, out)
}

/// Writes the report of an already opened DVD. The navigator is closed
/// before returning, whatever the outcome.
pub fn scan_dvd<N: DvdNavigator, W: Write>(
    mut nav: N,
    path: &Path,
    config: &ScanConfig,
    out: &mut W,
) -> ScanResult<ScanSummary> {
    let result = list_titles(&mut nav, path, config, out);
    if let Err(e) = nav.close() {
        error!("closing dvd: {e}");
    }
    result
}

fn list_titles<N: DvdNavigator, W: Write>(
    nav: &mut N,
    path: &Path,
    config: &ScanConfig,
    out: &mut W,
) -> ScanResult<ScanSummary> {
    nav.set_readahead(false)?;

    let tail = path_tail(path);
    let id = nav.serial_string().unwrap_or_else(|| tail.clone());
    let name = nav.title_string().unwrap_or(tail);
    format::write_id(out, &id)?;
    format::write_name(out, &name)?;

    let count = nav.number_of_titles()?;
    debug!("{count} titles on disc");

    let mut summary = ScanSummary::default();
    let mut longest: Option<(u32, Millis)> = None;
    for title in 1..=count {
        let described = match nav.describe_title_chapters(title) {
            Ok(described) if !described.chapters.is_empty() => described,
            Ok(_) => {
                error!("title {title}: no chapters");
                continue;
            }
            Err(e) => {
                error!("title {title}: {e}");
                continue;
            }
        };

        let duration = described.duration.to_millis();
        if !config.keeps_title(duration.secs()) {
            debug!("title {title} shorter than {}s, skipped", config.minimum_secs);
            continue;
        }
        if longest.is_none_or(|(_, best)| duration > best) {
            longest = Some((title, duration));
        }
        format::write_title(out, title, described.duration, &described.chapters)?;
        summary.titles += 1;
    }

    summary.longest = longest.map_or(0, |(title, _)| title);
    format::write_longest(out, summary.longest)?;

    if longest.is_some() {
        summary.streams = list_streams(nav, summary.longest, out)?;
    }
    Ok(summary)
}

/// Lists the subtitle and audio streams of `title`, returning how many were written.
fn list_streams<N: DvdNavigator, W: Write>(
    nav: &mut N,
    title: u32,
    out: &mut W,
) -> ScanResult<usize> {
    if let Err(e) = nav.play_title(title) {
        error!("playing title {title}: {e}");
        return Ok(0);
    }

    let mut written = 0;
    for slot in 0..STREAM_SLOTS {
        let stream = nav.spu_logical_stream(slot);
        if stream == STREAM_ABSENT {
            continue;
        }
        let lang = nav.spu_stream_to_lang(stream);
        if lang == LANG_UNKNOWN {
            trace!("subtitle stream {stream} has no language");
            continue;
        }
        format::write_stream(out, StreamKind::Subtitle, title, stream.into(), &lang_from_u16(lang))?;
        written += 1;
    }

    if nav.supports_audio() {
        for slot in 0..STREAM_SLOTS {
            let stream = nav.audio_logical_stream(slot);
            if stream == STREAM_ABSENT {
                continue;
            }
            let lang = nav.audio_stream_to_lang(stream);
            if lang == LANG_UNKNOWN {
                trace!("audio stream {stream} has no language");
                continue;
            }
            format::write_stream(out, StreamKind::Audio, title, stream.into(), &lang_from_u16(lang))?;
            written += 1;
        }
    } else {
        info!("audio stream listing is not supported by this navigator");
    }

    if let Err(e) = nav.stop() {
        error!("stopping playback: {e}");
    }
    Ok(written)
}
