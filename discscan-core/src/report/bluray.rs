// ============================================================================
// discscan-core/src/report/bluray.rs
// ============================================================================
//
// BLU-RAY REPORT: Playlist Titles and Clip Streams
//
// Lists every relevant title passing the minimum duration filter, with
// chapters on the absolute stream clock, then the subtitle and audio
// streams of each listed title's clips.

use super::{ScanSummary, format};
use crate::config::ScanConfig;
use crate::error::ScanResult;
use crate::nav::bluray::{AACS_DEBUG_MASK_ENV, BD_DEBUG_MASK_ENV};
use crate::nav::{BlurayDisc, BlurayNavigator, BlurayTitleInfo, DebugMask, StreamInfo, StreamKind};
use crate::utils::{Millis, path_tail};
use log::{debug, error, info, trace};
use std::env;
use std::io::Write;
use std::path::Path;

/// Opens the Blu-ray at `path` and writes its report to `out`.
///
/// Sets `BD_DEBUG_MASK` and `AACS_DEBUG_MASK` from the configured verbosity
/// first, so this must run before any other thread is started.
pub fn report_bluray<W: Write>(
    path: &Path,
    config: &ScanConfig,
    out: &mut W,
) -> ScanResult<ScanSummary> {
    set_debug_masks(DebugMask::for_verbosity(config.verbosity));
    info!("searching titles on bluray {}...", path.display());
    let disc = BlurayDisc::open(path)?;
    scan_bluray(disc, path, config, out)
}

fn set_debug_masks(mask: DebugMask) {
    let value = mask.to_env_value();
    debug!("{BD_DEBUG_MASK_ENV}={value} {AACS_DEBUG_MASK_ENV}={value}");
    // SAFETY: the scanner is single-threaded and nothing reads the
    // environment concurrently while the masks are written.
    unsafe {
        env::set_var(BD_DEBUG_MASK_ENV, &value);
        env::set_var(AACS_DEBUG_MASK_ENV, &value);
    }
}

/// Writes the report of an already opened Blu-ray. The navigator is closed
/// before returning, whatever the outcome.
pub fn scan_bluray<N: BlurayNavigator, W: Write>(
    mut nav: N,
    path: &Path,
    config: &ScanConfig,
    out: &mut W,
) -> ScanResult<ScanSummary> {
    let result = list_titles(&mut nav, path, config, out);
    if let Err(e) = nav.close() {
        error!("closing bluray: {e}");
    }
    result
}

fn list_titles<N: BlurayNavigator, W: Write>(
    nav: &mut N,
    path: &Path,
    config: &ScanConfig,
    out: &mut W,
) -> ScanResult<ScanSummary> {
    let tail = path_tail(path);
    let info = nav.disc_info().unwrap_or_else(|e| {
        error!("reading disc info: {e}");
        Default::default()
    });
    let id = info.disc_id.map(hex::encode).unwrap_or_else(|| tail.clone());
    let name = info.disc_name.unwrap_or(tail);
    format::write_id(out, &id)?;
    format::write_name(out, &name)?;

    let count = nav.title_count()?;
    debug!("{count} relevant titles on disc");

    let mut summary = ScanSummary::default();
    let mut longest: Option<(u32, Millis)> = None;
    let mut listed: Vec<(u32, BlurayTitleInfo)> = Vec::new();
    for index in 0..count {
        let title = match nav.title_info(index) {
            Ok(title) => title,
            Err(e) => {
                error!("title index {index}: {e}");
                continue;
            }
        };
        let ordinal = index + 1;

        let duration = title.duration.to_millis();
        if !config.keeps_title(duration.secs()) {
            debug!(
                "title {ordinal} ({:05}.mpls) shorter than {}s, skipped",
                title.playlist, config.minimum_secs
            );
            continue;
        }
        if longest.is_none_or(|(_, best)| duration > best) {
            longest = Some((ordinal, duration));
        }
        format::write_title(out, ordinal, title.duration, &title.chapters)?;
        summary.titles += 1;
        listed.push((ordinal, title));
    }

    for (ordinal, title) in &listed {
        for clip in &title.clips {
            summary.streams += write_streams(out, StreamKind::Subtitle, *ordinal, &clip.pg_streams)?;
            summary.streams += write_streams(out, StreamKind::Audio, *ordinal, &clip.audio_streams)?;
        }
    }

    summary.longest = longest.map_or(0, |(ordinal, _)| ordinal);
    format::write_longest(out, summary.longest)?;
    Ok(summary)
}

/// Writes one line per stream with a language, indexed within its clip.
fn write_streams<W: Write>(
    out: &mut W,
    kind: StreamKind,
    ordinal: u32,
    streams: &[StreamInfo],
) -> ScanResult<usize> {
    let mut written = 0;
    for (index, stream) in (0u32..).zip(streams) {
        if stream.lang.is_empty() {
            trace!("title {ordinal}: stream pid {:#06x} has no language", stream.pid);
            continue;
        }
        format::write_stream(out, kind, ordinal, index, &stream.lang)?;
        written += 1;
    }
    Ok(written)
}
