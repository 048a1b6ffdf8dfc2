//! Report line formatting.
//!
//! Numeric fields are right-aligned with a leading sign space, the way a
//! `% 3d` printf conversion renders them: `1` becomes `"  1"` in a width of
//! three, `1000` becomes `" 1000"`.

use crate::nav::StreamKind;
use crate::utils::Ticks;
use std::fmt;
use std::io::{self, Write};

const ORDINAL_WIDTH: usize = 3;
const SECONDS_WIDTH: usize = 9;
const STREAM_FIELD_WIDTH: usize = 2;

/// A number printed with a leading space and right-aligned to a width.
struct Padded {
    value: u64,
    width: usize,
}

impl fmt::Display for Padded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spaced = format!(" {}", self.value);
        write!(f, "{spaced:>width$}", width = self.width)
    }
}

fn padded(value: impl Into<u64>, width: usize) -> Padded {
    Padded {
        value: value.into(),
        width,
    }
}

pub fn write_id<W: Write>(out: &mut W, id: &str) -> io::Result<()> {
    writeln!(out, "ID      {id}")
}

pub fn write_name<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "NAME    {name}")
}

/// Writes one `TITLE` line: ordinal, duration, then every chapter start.
pub fn write_title<W: Write>(
    out: &mut W,
    ordinal: u32,
    duration: Ticks,
    chapters: &[Ticks],
) -> io::Result<()> {
    let ms = duration.to_millis();
    write!(
        out,
        "TITLE {} DURATION {}.{:03} {} CHAPTERS",
        padded(ordinal, ORDINAL_WIDTH),
        padded(ms.secs(), SECONDS_WIDTH),
        ms.subsec_millis(),
        ms.clock_display()
    )?;
    for chapter in chapters {
        let ms = chapter.to_millis();
        write!(out, " {} {}", ms.seconds_display(), ms.clock_display())?;
    }
    writeln!(out)
}

/// Writes one `SUB` or `AUDIO` line.
pub fn write_stream<W: Write>(
    out: &mut W,
    kind: StreamKind,
    title: u32,
    stream: u32,
    lang: &str,
) -> io::Result<()> {
    let tag = match kind {
        StreamKind::Subtitle => "SUB",
        StreamKind::Audio => "AUDIO",
    };
    writeln!(
        out,
        "{tag} {} {} {lang}",
        padded(title, STREAM_FIELD_WIDTH),
        padded(stream, STREAM_FIELD_WIDTH)
    )
}

pub fn write_longest<W: Write>(out: &mut W, ordinal: u32) -> io::Result<()> {
    writeln!(out, "LONGEST {ordinal}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn title_line_layout() {
        let line = render(|out| {
            write_title(
                out,
                1,
                Ticks(90_000 * 3725 + 3600),
                &[Ticks(0), Ticks(90_000 * 600)],
            )
        });
        assert_eq!(
            line,
            "TITLE   1 DURATION      3725.040 01:02:05.040 CHAPTERS \
             0.000 00:00:00.000 600.000 00:10:00.000\n"
        );
    }

    #[test]
    fn wide_values_keep_leading_space() {
        let line = render(|out| write_title(out, 100, Ticks(0), &[]));
        assert_eq!(line, "TITLE  100 DURATION         0.000 00:00:00.000 CHAPTERS\n");
        let line = render(|out| write_stream(out, StreamKind::Audio, 12, 3, "fr"));
        assert_eq!(line, "AUDIO  12  3 fr\n");
    }

    #[test]
    fn stream_lines() {
        let sub = render(|out| write_stream(out, StreamKind::Subtitle, 2, 0, "en"));
        assert_eq!(sub, "SUB  2  0 en\n");
        let audio = render(|out| write_stream(out, StreamKind::Audio, 1, 1, "eng"));
        assert_eq!(audio, "AUDIO  1  1 eng\n");
    }

    #[test]
    fn identity_and_longest_lines() {
        assert_eq!(render(|out| write_id(out, "sr0")), "ID      sr0\n");
        assert_eq!(render(|out| write_name(out, "MOVIE")), "NAME    MOVIE\n");
        assert_eq!(render(|out| write_longest(out, 0)), "LONGEST 0\n");
    }
}
